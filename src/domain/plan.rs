//! Batch replacement planning over a text buffer.

use crate::error::{HwpError, HwpResult};

/// An ordered mapping of find-literal to replace-literal.
///
/// Iteration order is significant: later patterns operate on the buffer
/// already modified by earlier ones, so overlapping patterns can interact.
/// Re-inserting an existing key updates its replacement in place without
/// changing its position.
#[derive(Debug, Clone, Default)]
pub struct PatternMap {
    entries: Vec<(String, String)>,
}

impl PatternMap {
    /// Creates an empty pattern map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a find/replace pair, or updates the replacement for an
    /// existing find-literal, keeping its original position.
    pub fn insert(&mut self, find: impl Into<String>, replace: impl Into<String>) {
        let find = find.into();
        let replace = replace.into();
        match self.entries.iter_mut().find(|(f, _)| *f == find) {
            Some(entry) => entry.1 = replace,
            None => self.entries.push((find, replace)),
        }
    }

    /// Iterates pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, r)| (f.as_str(), r.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for PatternMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (find, replace) in iter {
            map.insert(find, replace);
        }
        map
    }
}

/// Per-pattern outcome of a planning pass.
#[derive(Debug, Clone)]
pub struct PatternOutcome {
    pub find: String,
    pub replace: String,
    /// Occurrences replaced; 0 means the pattern was not found.
    pub count: usize,
}

impl PatternOutcome {
    pub fn found(&self) -> bool {
        self.count > 0
    }
}

/// Statistics about a planning pass, in pattern-map order.
#[derive(Debug, Clone, Default)]
pub struct ReplacementReport {
    pub outcomes: Vec<PatternOutcome>,
    pub total: usize,
}

impl ReplacementReport {
    /// Patterns that matched nothing. Reported individually even when the
    /// overall operation succeeds.
    pub fn not_found(&self) -> impl Iterator<Item = &PatternOutcome> {
        self.outcomes.iter().filter(|o| !o.found())
    }

    pub fn has_replacements(&self) -> bool {
        self.total > 0
    }
}

/// Computes the modified buffer and per-pattern counts for `patterns`.
///
/// Patterns are applied in map order. Each count is taken against the
/// buffer as already modified by the preceding patterns, using standard
/// non-overlapping left-to-right substitution. Patterns that match nothing
/// are reported with count 0 but do not abort the batch; partial success is
/// the normal case.
///
/// A pass that replaces nothing at all fails with
/// [`HwpError::NoReplacementsMade`] and leaves the buffer untouched, so
/// destructive commit strategies are never fed an unchanged buffer.
pub fn plan(buffer: &str, patterns: &PatternMap) -> HwpResult<(String, ReplacementReport)> {
    let mut current = buffer.to_string();
    let mut report = ReplacementReport::default();

    for (find, replace) in patterns.iter() {
        if find.is_empty() {
            return Err(HwpError::InvalidPattern {
                reason: "find-literal is empty".to_string(),
            });
        }

        let count = current.matches(find).count();
        if count > 0 {
            current = current.replace(find, replace);
        }

        report.total += count;
        report.outcomes.push(PatternOutcome {
            find: find.to_string(),
            replace: replace.to_string(),
            count,
        });
    }

    if !report.has_replacements() {
        return Err(HwpError::NoReplacementsMade {
            patterns: patterns.len(),
        });
    }

    Ok((current, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template_patterns() -> PatternMap {
        let mut map = PatternMap::new();
        map.insert("TE25****", "TE250235");
        map.insert("yyyy. mm. dd.", "2025. 01. 15.");
        map
    }

    #[test]
    fn test_template_fill_scenario() {
        let buffer = "Project TE25**** dated yyyy. mm. dd.";
        let (modified, report) = plan(buffer, &template_patterns()).unwrap();

        assert_eq!(modified, "Project TE250235 dated 2025. 01. 15.");
        assert_eq!(report.total, 2);
        assert_eq!(report.outcomes[0].count, 1);
        assert_eq!(report.outcomes[1].count, 1);
    }

    #[test]
    fn test_empty_map_fails_without_modifying_buffer() {
        let err = plan("untouched", &PatternMap::new()).unwrap_err();
        assert!(matches!(err, HwpError::NoReplacementsMade { patterns: 0 }));
    }

    #[test]
    fn test_not_found_pattern_reported_but_batch_succeeds() {
        let mut map = template_patterns();
        map.insert("NOTFOUND", "whatever");

        let buffer = "Project TE25**** dated yyyy. mm. dd.";
        let (_, report) = plan(buffer, &map).unwrap();

        assert_eq!(report.total, 2);
        let missing: Vec<&str> = report.not_found().map(|o| o.find.as_str()).collect();
        assert_eq!(missing, vec!["NOTFOUND"]);
    }

    #[test]
    fn test_second_pass_is_a_failed_noop() {
        let buffer = "Project TE25**** dated yyyy. mm. dd.";
        let patterns = template_patterns();
        let (modified, _) = plan(buffer, &patterns).unwrap();

        // Keys no longer occur in the once-modified buffer.
        let err = plan(&modified, &patterns).unwrap_err();
        assert!(matches!(err, HwpError::NoReplacementsMade { patterns: 2 }));
    }

    #[test]
    fn test_later_patterns_see_earlier_replacements() {
        let mut map = PatternMap::new();
        map.insert("ab", "bc");
        map.insert("bc", "done");

        let (modified, report) = plan("ab", &map).unwrap();
        assert_eq!(modified, "done");
        assert_eq!(report.total, 2);
    }

    #[test]
    fn test_counts_are_non_overlapping() {
        // The locator would report two overlapping hits here; substitution
        // counts only the single non-overlapping one.
        let mut map = PatternMap::new();
        map.insert("aa", "b");

        let (modified, report) = plan("aaa", &map).unwrap();
        assert_eq!(modified, "ba");
        assert_eq!(report.total, 1);
    }

    #[test]
    fn test_empty_find_literal_rejected() {
        let mut map = PatternMap::new();
        map.insert("", "value");
        let err = plan("text", &map).unwrap_err();
        assert!(matches!(err, HwpError::InvalidPattern { .. }));
    }

    #[test]
    fn test_insert_updates_existing_key_in_place() {
        let mut map = PatternMap::new();
        map.insert("a", "1");
        map.insert("b", "2");
        map.insert("a", "3");

        let pairs: Vec<(&str, &str)> = map.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }
}
