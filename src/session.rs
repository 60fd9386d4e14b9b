//! Automation session lifecycle over an opaque document backend.
//!
//! The external word-processor application is reached through the
//! [`AutomationBackend`] capability trait, with one concrete adapter per
//! backend chosen at construction time. [`DocumentSession`] wraps a backend
//! and enforces the lifecycle
//! `Disconnected -> Connecting -> Connected -> Opening -> Opened`; any
//! operation attempted outside the state that permits it fails with
//! `InvalidState` rather than silently no-opping.
//!
//! All calls are synchronous and blocking. Callers must serialize operations
//! against a given session; there is no internal locking.

use crate::error::{HwpError, HwpResult};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Lifecycle state of a document session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
    Opening,
    Opened,
    /// A destructive commit deleted content and failed to reinsert it.
    /// The session refuses further operations until reconnected.
    NeedsRecovery,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Opening => "opening",
            Self::Opened => "opened",
            Self::NeedsRecovery => "needs-recovery",
        };
        f.write_str(name)
    }
}

/// Named commands the automation backend understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomationCommand {
    SelectAll,
    Copy,
    /// Clears the current selection without modifying the document.
    CancelSelection,
    Delete,
}

impl AutomationCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectAll => "select-all",
            Self::Copy => "copy",
            Self::CancelSelection => "cancel-selection",
            Self::Delete => "delete",
        }
    }
}

/// Opaque capability over an external word-processor backend.
///
/// Implementations adapt one concrete backend (a live automation session,
/// or the filesystem-only [`OfflineBackend`]). The core never branches on
/// backend identity; it only calls through this trait.
pub trait AutomationBackend {
    fn connect(&mut self) -> HwpResult<()>;

    fn open(&mut self, path: &Path) -> HwpResult<()>;

    /// Runs a named editing command against the open document.
    fn run(&mut self, command: AutomationCommand) -> HwpResult<()>;

    /// Inserts text at the current caret position.
    fn insert_text(&mut self, text: &str) -> HwpResult<()>;

    /// Saves in place, or to `path` when given.
    fn save(&mut self, path: Option<&Path>) -> HwpResult<()>;

    fn page_count(&mut self) -> HwpResult<usize>;

    /// Releases this session's handle. Never terminates the external
    /// application process, which may be shared across callers.
    fn disconnect(&mut self);

    fn name(&self) -> &str;
}

/// A document session: one backend, one open document, one logical caller.
pub struct DocumentSession {
    backend: Box<dyn AutomationBackend>,
    state: SessionState,
    path: Option<PathBuf>,
}

impl DocumentSession {
    /// Creates a session over `backend`, initially disconnected.
    pub fn new(backend: Box<dyn AutomationBackend>) -> Self {
        Self {
            backend,
            state: SessionState::Disconnected,
            path: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Connects to the backend. Only valid from `Disconnected`.
    pub fn connect(&mut self) -> HwpResult<()> {
        if self.state != SessionState::Disconnected {
            return Err(self.invalid_state("connect"));
        }
        self.state = SessionState::Connecting;
        match self.backend.connect() {
            Ok(()) => {
                self.state = SessionState::Connected;
                Ok(())
            }
            Err(err) => {
                self.state = SessionState::Disconnected;
                Err(err)
            }
        }
    }

    /// Opens `path`. Requires `Connected` and an existing file.
    pub fn open(&mut self, path: &Path) -> HwpResult<()> {
        if self.state != SessionState::Connected {
            return Err(self.invalid_state("open"));
        }
        if !path.exists() {
            return Err(HwpError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "document file does not exist",
                ),
            });
        }

        self.state = SessionState::Opening;
        match self.backend.open(path) {
            Ok(()) => {
                self.state = SessionState::Opened;
                self.path = Some(path.to_path_buf());
                Ok(())
            }
            Err(err) => {
                self.state = SessionState::Connected;
                Err(err)
            }
        }
    }

    /// Path of the opened document.
    pub fn path(&self) -> HwpResult<&Path> {
        self.require_opened("document-path")?;
        // Opened implies a stored path.
        self.path.as_deref().ok_or_else(|| HwpError::InvalidState {
            operation: "document-path".to_string(),
            state: self.state.to_string(),
        })
    }

    /// Runs a named command. Requires `Opened`.
    pub fn run(&mut self, command: AutomationCommand) -> HwpResult<()> {
        self.require_opened(command.name())?;
        self.backend.run(command)
    }

    /// Inserts text at the caret. Requires `Opened`.
    pub fn insert_text(&mut self, text: &str) -> HwpResult<()> {
        self.require_opened("insert-text")?;
        self.backend.insert_text(text)
    }

    /// Saves the document in place, or to `path`. Requires `Opened`.
    pub fn save(&mut self, path: Option<&Path>) -> HwpResult<()> {
        self.require_opened("save")?;
        self.backend.save(path)
    }

    pub fn page_count(&mut self) -> HwpResult<usize> {
        self.require_opened("page-count")?;
        self.backend.page_count()
    }

    /// Marks the session as holding a document in an unsafe intermediate
    /// state after a partial destructive commit.
    pub fn mark_needs_recovery(&mut self) {
        self.state = SessionState::NeedsRecovery;
    }

    /// Releases the session handle from any state. The external application
    /// process stays alive.
    pub fn disconnect(&mut self) {
        self.backend.disconnect();
        self.state = SessionState::Disconnected;
        self.path = None;
    }

    fn require_opened(&self, operation: &str) -> HwpResult<()> {
        if self.state == SessionState::Opened {
            Ok(())
        } else {
            Err(self.invalid_state(operation))
        }
    }

    fn invalid_state(&self, operation: &str) -> HwpError {
        HwpError::InvalidState {
            operation: operation.to_string(),
            state: self.state.to_string(),
        }
    }
}

/// Filesystem-only backend for hosts without a live automation session.
///
/// Opening checks the file on disk; editing commands are unsupported and
/// fail with a `Connection` error. `save(Some(path))` copies the original
/// file, which is correct because this backend never mutates the document.
#[derive(Debug, Default)]
pub struct OfflineBackend {
    path: Option<PathBuf>,
}

impl OfflineBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn unsupported(&self, what: &str) -> HwpError {
        HwpError::Connection {
            backend: self.name().to_string(),
            message: format!("'{}' requires a live automation session", what),
        }
    }
}

impl AutomationBackend for OfflineBackend {
    fn connect(&mut self) -> HwpResult<()> {
        Ok(())
    }

    fn open(&mut self, path: &Path) -> HwpResult<()> {
        fs::metadata(path).map_err(|source| HwpError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    fn run(&mut self, command: AutomationCommand) -> HwpResult<()> {
        Err(self.unsupported(command.name()))
    }

    fn insert_text(&mut self, _text: &str) -> HwpResult<()> {
        Err(self.unsupported("insert-text"))
    }

    fn save(&mut self, path: Option<&Path>) -> HwpResult<()> {
        match (path, self.path.as_deref()) {
            // The document on disk is untouched; saving in place is a no-op.
            (None, _) => Ok(()),
            (Some(target), Some(original)) => {
                fs::copy(original, target).map_err(|e| HwpError::Save {
                    path: target.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(())
            }
            (Some(target), None) => Err(HwpError::Save {
                path: target.to_path_buf(),
                message: "no document open".to_string(),
            }),
        }
    }

    fn page_count(&mut self) -> HwpResult<usize> {
        Err(self.unsupported("page-count"))
    }

    fn disconnect(&mut self) {
        self.path = None;
    }

    fn name(&self) -> &str {
        "offline"
    }
}
