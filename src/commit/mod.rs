//! Commit strategies and the refill service.
//!
//! No single backend offers both reliable extraction and reliable
//! persistence, so [`RefillService`] composes one extraction channel with
//! one commit strategy. The named constructors mirror the workable
//! pairings; `new` accepts any combination.

pub mod recreate;
pub mod sidecar;
pub mod strategy;

pub use recreate::RecreateCommit;
pub use sidecar::SidecarCommit;
pub use strategy::{CommitOutcome, CommitStrategy};

use crate::domain::{find_all, plan, PatternMap, ReplacementReport};
use crate::error::{HwpError, HwpResult};
use crate::extract::{SnapshotExtractor, StructuralExtractor, TextExtractor};
use crate::session::DocumentSession;

/// High-level find/replace orchestration over one session.
///
/// Control flow per [`RefillService::refill`]: extract a text buffer, plan
/// the replacements (pure), then hand the modified buffer to the commit
/// strategy (side-effecting). A plan that changes nothing short-circuits
/// before the commit runs, because the destructive strategies delete
/// content before reinserting it.
pub struct RefillService {
    extractor: Box<dyn TextExtractor>,
    strategy: Box<dyn CommitStrategy>,
}

impl RefillService {
    /// Composes a custom extractor/strategy pair.
    pub fn new(extractor: Box<dyn TextExtractor>, strategy: Box<dyn CommitStrategy>) -> Self {
        Self {
            extractor,
            strategy,
        }
    }

    /// Structural walk + sidecar artifacts. Works without a live
    /// automation backend and never mutates the document.
    pub fn with_sidecar_strategy() -> Self {
        Self::new(
            Box::new(StructuralExtractor::new()),
            Box::new(SidecarCommit::new()),
        )
    }

    /// Clipboard snapshot + recreate commit. Requires a live automation
    /// backend for both channels.
    pub fn with_recreate_strategy() -> Self {
        Self::new(
            Box::new(SnapshotExtractor::new()),
            Box::new(RecreateCommit::new()),
        )
    }

    /// Structural walk for extraction, recreate commit for persistence.
    /// The pairing for backends whose clipboard channel is unreliable.
    pub fn with_hybrid_strategy() -> Self {
        Self::new(
            Box::new(StructuralExtractor::new()),
            Box::new(RecreateCommit::new()),
        )
    }

    /// Extracts, plans, and commits `patterns` against the open document.
    ///
    /// Patterns that match nothing are reported in the returned
    /// [`ReplacementReport`] without aborting the batch; a batch that
    /// matches nothing at all fails with `NoReplacementsMade` before any
    /// commit step runs.
    pub fn refill(
        &mut self,
        session: &mut DocumentSession,
        patterns: &PatternMap,
    ) -> HwpResult<(ReplacementReport, CommitOutcome)> {
        if patterns.is_empty() {
            return Err(HwpError::NoReplacementsMade { patterns: 0 });
        }

        let buffer = self.extractor.extract(session)?;
        let (modified, report) = plan(&buffer, patterns)?;
        let outcome = self.strategy.commit(session, &modified)?;
        Ok((report, outcome))
    }

    /// Extracts the text buffer through this service's channel.
    pub fn extract(&mut self, session: &mut DocumentSession) -> HwpResult<String> {
        self.extractor.extract(session)
    }

    /// Occurrence offsets of `pattern` in the extracted buffer
    /// (overlap-permitting, for search and display).
    pub fn locate(
        &mut self,
        session: &mut DocumentSession,
        pattern: &str,
    ) -> HwpResult<Vec<usize>> {
        let buffer = self.extractor.extract(session)?;
        find_all(&buffer, pattern)
    }
}
