//! Error types for HWP document text replacement.
//!
//! Every failure carries enough context (pattern text, counts, file paths)
//! for an operator to diagnose without re-running the operation. Extraction
//! and planning failures are recoverable at the caller; a partial destructive
//! commit is escalated as its own variant because the document may be left in
//! an intermediate state requiring manual recovery.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for HWP operations.
pub type HwpResult<T> = Result<T, HwpError>;

/// Comprehensive error type for all HWP operations.
#[derive(Debug)]
pub enum HwpError {
    /// The external automation backend cannot be reached.
    Connection { backend: String, message: String },

    /// A named automation command failed mid-session.
    Automation { command: String, message: String },

    /// The structural container could not be opened or walked.
    Extraction { path: PathBuf, reason: String },

    /// The system clipboard could not be opened, or held no text.
    ClipboardUnavailable { reason: String },

    /// Empty or otherwise unusable search pattern.
    InvalidPattern { reason: String },

    /// A planning pass matched nothing; the buffer is unchanged.
    NoReplacementsMade { patterns: usize },

    /// A destructive commit failed after partial mutation. The document
    /// may be in a corrupted intermediate state.
    PartialCommit { completed: String, message: String },

    /// Operation attempted outside the session state that permits it.
    InvalidState { operation: String, state: String },

    /// Persisting the document or its sidecar artifacts failed.
    Save { path: PathBuf, message: String },

    /// Filesystem error outside the save path.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for HwpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection { backend, message } => {
                write!(f, "cannot reach {} backend: {}", backend, message)
            }
            Self::Automation { command, message } => {
                write!(f, "automation command '{}' failed: {}", command, message)
            }
            Self::Extraction { path, reason } => {
                write!(
                    f,
                    "text extraction failed for '{}': {}",
                    path.display(),
                    reason
                )
            }
            Self::ClipboardUnavailable { reason } => {
                write!(f, "clipboard unavailable: {}", reason)
            }
            Self::InvalidPattern { reason } => {
                write!(f, "invalid pattern: {}", reason)
            }
            Self::NoReplacementsMade { patterns } => {
                write!(
                    f,
                    "no replacements made ({} pattern(s) tried, none matched)",
                    patterns
                )
            }
            Self::PartialCommit { completed, message } => {
                write!(
                    f,
                    "commit failed after destructive steps [{}]: {}",
                    completed, message
                )
            }
            Self::InvalidState { operation, state } => {
                write!(
                    f,
                    "operation '{}' not permitted in session state '{}'",
                    operation, state
                )
            }
            Self::Save { path, message } => {
                write!(f, "save failed for '{}': {}", path.display(), message)
            }
            Self::Io { path, source } => {
                write!(f, "IO error for path '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for HwpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
