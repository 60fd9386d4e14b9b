//! Text-model domain logic.
//!
//! Pure operations over a flattened document text buffer: locating literal
//! patterns and planning batch replacements. Nothing here touches the
//! automation backend, the container, or the filesystem.
//!
//! Two deliberately different counting semantics live side by side:
//! [`locate::find_all`] reports overlapping occurrences (search/display call
//! sites), while [`plan::plan`] counts and substitutes non-overlapping
//! occurrences (the actual mutation).

pub mod locate;
pub mod plan;

pub use locate::find_all;
pub use plan::{plan, PatternMap, PatternOutcome, ReplacementReport};
