//! Text discovery and replacement for HWP word-processor documents.
//!
//! The document's text is only reachable through two incomplete channels:
//! a structural walk of the HWP compound-file container, and a
//! select-all/copy snapshot via an automation backend and the system
//! clipboard. This library flattens either channel into a linear text
//! buffer, locates literal patterns in it, plans batch replacements, and
//! commits the result through whichever strategy can persist it.
//!
//! # Architecture
//!
//! - [`extract`]: the two extraction channels and the buffer-divergence
//!   check between them
//! - [`domain`]: pure pattern location and replacement planning
//! - [`commit`]: commit strategies and the orchestrating [`RefillService`]
//! - [`session`]: automation session lifecycle over an opaque backend
//! - [`error`]: error taxonomy with operator-grade context
//!
//! # Quick Start
//!
//! ```no_run
//! use hwpfill::{DocumentSession, OfflineBackend, PatternMap, RefillService};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = DocumentSession::new(Box::new(OfflineBackend::new()));
//! session.connect()?;
//! session.open(Path::new("template.hwp"))?;
//!
//! let mut patterns = PatternMap::new();
//! patterns.insert("TE25****", "TE250235");
//! patterns.insert("yyyy. mm. dd.", "2025. 01. 15.");
//!
//! let mut service = RefillService::with_sidecar_strategy();
//! let (report, outcome) = service.refill(&mut session, &patterns)?;
//! println!("{} replacement(s) -> {:?}", report.total, outcome.sidecar);
//!
//! session.disconnect();
//! # Ok(())
//! # }
//! ```

pub mod commit;
pub mod domain;
pub mod error;
pub mod extract;
pub mod session;

// Re-exports for convenient access
pub use commit::{CommitOutcome, CommitStrategy, RecreateCommit, RefillService, SidecarCommit};
pub use domain::{find_all, plan, PatternMap, PatternOutcome, ReplacementReport};
pub use error::{HwpError, HwpResult};
pub use extract::{
    divergence, ClipboardAccess, Divergence, DocumentStats, ExtractorConfig, SnapshotExtractor,
    StructuralExtractor, SystemClipboard, TextExtractor,
};
pub use session::{
    AutomationBackend, AutomationCommand, DocumentSession, OfflineBackend, SessionState,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_constructors() {
        let _ = RefillService::with_sidecar_strategy();
        let _ = RefillService::with_recreate_strategy();
        let _ = RefillService::with_hybrid_strategy();
    }

    #[test]
    fn test_locate_and_plan_disagree_on_overlaps() {
        // Search reports overlapping hits; substitution consumes them.
        let offsets = find_all("aaa", "aa").unwrap();
        assert_eq!(offsets, vec![0, 1]);

        let mut patterns = PatternMap::new();
        patterns.insert("aa", "x");
        let (modified, report) = plan("aaa", &patterns).unwrap();
        assert_eq!(modified, "xa");
        assert_eq!(report.total, 1);
    }
}
