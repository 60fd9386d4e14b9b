//! Sidecar commit: persist the buffer as a text artifact, document untouched.

use crate::commit::strategy::{CommitOutcome, CommitStrategy};
use crate::error::{HwpError, HwpResult};
use crate::session::DocumentSession;
use std::fs;
use std::path::{Path, PathBuf};

/// Commits by writing `<stem>_modified.txt` plus an untouched
/// `<stem>_original_backup.hwp` copy of the document.
///
/// This is the honest fallback when round-trip fidelity of the binary
/// container cannot be guaranteed: the report is durable, the original is
/// preserved, and nothing destructive happens.
#[derive(Debug, Clone, Default)]
pub struct SidecarCommit {
    /// Base path the artifact names derive from; defaults to the document.
    output: Option<PathBuf>,
}

impl SidecarCommit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives artifact names from `base` instead of the document path.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            output: Some(base.into()),
        }
    }

    fn sibling(base: &Path, suffix: &str) -> PathBuf {
        let stem = base
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        base.with_file_name(format!("{}{}", stem, suffix))
    }
}

impl CommitStrategy for SidecarCommit {
    fn commit(&mut self, session: &mut DocumentSession, buffer: &str) -> HwpResult<CommitOutcome> {
        let original = session.path()?.to_path_buf();
        let base = self.output.clone().unwrap_or_else(|| original.clone());

        let sidecar = Self::sibling(&base, "_modified.txt");
        let backup = Self::sibling(&base, "_original_backup.hwp");

        fs::write(&sidecar, buffer).map_err(|e| HwpError::Save {
            path: sidecar.clone(),
            message: e.to_string(),
        })?;

        fs::copy(&original, &backup).map_err(|e| HwpError::Save {
            path: backup.clone(),
            message: e.to_string(),
        })?;

        Ok(CommitOutcome {
            sidecar: Some(sidecar),
            backup: Some(backup),
            destructive: false,
            ..Default::default()
        })
    }

    fn name(&self) -> &str {
        "sidecar"
    }

    fn is_destructive(&self) -> bool {
        false
    }
}
