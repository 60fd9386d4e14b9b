//! Commit strategy trait and outcome types.

use crate::error::HwpResult;
use crate::session::DocumentSession;
use std::path::PathBuf;

/// Artifacts produced by a commit.
#[derive(Debug, Clone, Default)]
pub struct CommitOutcome {
    /// Where the document itself was persisted, if it was.
    pub saved_to: Option<PathBuf>,

    /// Sidecar text artifact holding the modified buffer.
    pub sidecar: Option<PathBuf>,

    /// Untouched copy of the original document.
    pub backup: Option<PathBuf>,

    /// Whether the strategy deleted document content before reinserting it.
    pub destructive: bool,
}

/// Strategy for making a modified text buffer durable.
///
/// Both concrete strategies require the session to be in the `Opened`
/// state; the session enforces that per operation.
pub trait CommitStrategy {
    /// Commits `buffer` for the session's open document.
    fn commit(&mut self, session: &mut DocumentSession, buffer: &str) -> HwpResult<CommitOutcome>;

    /// Human-readable strategy name.
    fn name(&self) -> &str;

    /// Whether this strategy deletes document content before reinserting.
    fn is_destructive(&self) -> bool;
}
