//! Snapshot text extraction via selection, copy, and the system clipboard.
//!
//! The clipboard is process-wide shared mutable state. The only safeguard
//! is scoped acquisition: open, read, release on every path. Another
//! process grabbing the clipboard during the window is an unrecoverable
//! race reported as `ClipboardUnavailable`, never retried here.

use crate::error::{HwpError, HwpResult};
use crate::extract::TextExtractor;
use crate::session::{AutomationCommand, DocumentSession};

/// Scoped access to a text clipboard.
pub trait ClipboardAccess {
    /// Opens the clipboard, reads its text payload, and releases the
    /// handle on every path, including errors.
    fn read_text(&mut self) -> HwpResult<String>;
}

/// The host system clipboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardAccess for SystemClipboard {
    fn read_text(&mut self) -> HwpResult<String> {
        // The handle lives only for this call; drop releases it even when
        // the read fails.
        let mut clipboard = arboard::Clipboard::new().map_err(|e| HwpError::ClipboardUnavailable {
            reason: format!("cannot open system clipboard: {}", e),
        })?;

        let text = clipboard
            .get_text()
            .map_err(|e| HwpError::ClipboardUnavailable {
                reason: format!("cannot read clipboard text: {}", e),
            })?;

        if text.is_empty() {
            return Err(HwpError::ClipboardUnavailable {
                reason: "clipboard is empty".to_string(),
            });
        }
        Ok(text)
    }
}

/// Text extractor that snapshots the document through select-all/copy.
///
/// Requires an `Opened` session on a live automation backend. The selection
/// is cancelled after the copy: a later delete-based commit must not act on
/// a full-document selection left behind by extraction.
pub struct SnapshotExtractor<C: ClipboardAccess> {
    clipboard: C,
}

impl SnapshotExtractor<SystemClipboard> {
    pub fn new() -> Self {
        Self {
            clipboard: SystemClipboard::new(),
        }
    }
}

impl Default for SnapshotExtractor<SystemClipboard> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ClipboardAccess> SnapshotExtractor<C> {
    /// Uses a custom clipboard, e.g. an in-memory one for tests.
    pub fn with_clipboard(clipboard: C) -> Self {
        Self { clipboard }
    }
}

impl<C: ClipboardAccess> TextExtractor for SnapshotExtractor<C> {
    fn extract(&mut self, session: &mut DocumentSession) -> HwpResult<String> {
        session.run(AutomationCommand::SelectAll)?;
        session.run(AutomationCommand::Copy)?;
        session.run(AutomationCommand::CancelSelection)?;
        self.clipboard.read_text()
    }

    fn name(&self) -> &str {
        "snapshot"
    }
}
