//! Recreate commit: delete the document body and reinsert the full buffer.

use crate::commit::strategy::{CommitOutcome, CommitStrategy};
use crate::error::{HwpError, HwpResult};
use crate::session::{AutomationCommand, DocumentSession};
use std::path::PathBuf;

/// Commits by recreating the document: `SelectAll -> Delete -> Insert ->
/// Save`.
///
/// A failed `Delete` stops before `Insert` and leaves the document
/// undeleted. A failed `Insert` after a successful `Delete` leaves the
/// document empty; that window is surfaced as `PartialCommit` and the
/// session is marked as needing recovery so callers can warn the operator
/// instead of reporting generic failure.
#[derive(Debug, Clone, Default)]
pub struct RecreateCommit {
    output: Option<PathBuf>,
}

impl RecreateCommit {
    /// Saves the recreated document in place.
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves the recreated document to `path` instead.
    pub fn save_as(path: impl Into<PathBuf>) -> Self {
        Self {
            output: Some(path.into()),
        }
    }
}

impl CommitStrategy for RecreateCommit {
    fn commit(&mut self, session: &mut DocumentSession, buffer: &str) -> HwpResult<CommitOutcome> {
        session.run(AutomationCommand::SelectAll)?;

        // A failed delete leaves the document unmodified; stop here.
        session.run(AutomationCommand::Delete)?;

        // From this point until insert succeeds, the only copy of the
        // content is the in-memory buffer.
        if let Err(err) = session.insert_text(buffer) {
            session.mark_needs_recovery();
            return Err(HwpError::PartialCommit {
                completed: "select-all, delete".to_string(),
                message: format!("insert failed, document left empty: {}", err),
            });
        }

        session.save(self.output.as_deref())?;

        let saved_to = match &self.output {
            Some(path) => path.clone(),
            None => session.path()?.to_path_buf(),
        };
        Ok(CommitOutcome {
            saved_to: Some(saved_to),
            destructive: true,
            ..Default::default()
        })
    }

    fn name(&self) -> &str {
        "recreate"
    }

    fn is_destructive(&self) -> bool {
        true
    }
}
