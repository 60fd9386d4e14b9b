//! Literal pattern location in a text buffer.

use crate::error::{HwpError, HwpResult};

/// Finds every occurrence of `pattern` in `buffer`, overlap-permitting.
///
/// Returns character offsets (not byte offsets) in strictly increasing
/// order. After a match at offset `p` the scan resumes at `p + 1`, so
/// adjacent matches of a self-overlapping pattern are all reported:
/// `find_all("aaa", "aa")` yields `[0, 1]`.
///
/// An empty pattern is a contract violation and fails with
/// [`HwpError::InvalidPattern`]. A buffer with no occurrences yields an
/// empty list, not an error.
pub fn find_all(buffer: &str, pattern: &str) -> HwpResult<Vec<usize>> {
    if pattern.is_empty() {
        return Err(HwpError::InvalidPattern {
            reason: "search pattern is empty".to_string(),
        });
    }

    let mut offsets = Vec::new();
    let mut char_offset = 0;
    let mut byte_start = 0;

    while let Some(rel) = buffer[byte_start..].find(pattern) {
        let at = byte_start + rel;
        char_offset += buffer[byte_start..at].chars().count();
        offsets.push(char_offset);

        // Resume one character past the match start to permit overlaps.
        let step = buffer[at..]
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(1);
        byte_start = at + step;
        char_offset += 1;
    }

    Ok(offsets)
}
