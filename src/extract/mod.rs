//! Text extraction channels.
//!
//! Two incomplete channels produce the document's flattened text: the
//! structural container walk and the clipboard snapshot. Buffers from the
//! two are not guaranteed identical (whitespace and line breaks diverge);
//! the structural buffer is treated as canonical, and [`divergence`] lets
//! callers surface the disagreement instead of silently preferring one.

pub mod snapshot;
pub mod structural;

pub use snapshot::{ClipboardAccess, SnapshotExtractor, SystemClipboard};
pub use structural::{
    DocumentStats, ExtractorConfig, HwpContainer, StructuralEvent, StructuralExtractor,
};

use crate::error::HwpResult;
use crate::session::DocumentSession;

/// A channel that produces the document's flattened text.
pub trait TextExtractor {
    /// Extracts the text buffer for the session's open document.
    fn extract(&mut self, session: &mut DocumentSession) -> HwpResult<String>;

    /// Human-readable channel name.
    fn name(&self) -> &str;
}

/// Where two extraction channels first disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Divergence {
    /// Character offset of the first mismatching position.
    pub first_mismatch: usize,
    pub structural_len: usize,
    pub snapshot_len: usize,
}

/// Compares the two channels' buffers, returning `None` when identical.
pub fn divergence(structural: &str, snapshot: &str) -> Option<Divergence> {
    if structural == snapshot {
        return None;
    }
    let first_mismatch = structural
        .chars()
        .zip(snapshot.chars())
        .take_while(|(a, b)| a == b)
        .count();
    Some(Divergence {
        first_mismatch,
        structural_len: structural.chars().count(),
        snapshot_len: snapshot.chars().count(),
    })
}
