//! Selector matching
//!
//! A selector is either an exact node name or a pattern where `*` stands for
//! any run of characters (including none).

use std::collections::{HashMap, HashSet};

const WILDCARD: char = '*';

/// Whether a selector contains a wildcard
pub fn is_pattern(selector: &str) -> bool {
    selector.contains(WILDCARD)
}

/// Check whether a single selector matches a candidate name
pub fn matches(selector: &str, candidate: &str) -> bool {
    if !is_pattern(selector) {
        return selector == candidate;
    }

    let parts: Vec<&str> = selector.split(WILDCARD).collect();
    let first = parts[0];
    let last = parts[parts.len() - 1];

    let Some(mut remaining) = candidate.strip_prefix(first) else {
        return false;
    };
    let Some(body) = remaining.strip_suffix(last) else {
        return false;
    };
    remaining = body;

    // Inner fragments must appear in order, leftmost first
    for part in &parts[1..parts.len() - 1] {
        match remaining.find(part) {
            Some(pos) => remaining = &remaining[pos + part.len()..],
            None => return false,
        }
    }

    true
}

/// Return the candidates matched by at least one selector
///
/// Keeps candidate order and drops repeated candidates.
pub fn match_names<S, C>(selectors: &[S], candidates: &[C]) -> Vec<String>
where
    S: AsRef<str>,
    C: AsRef<str>,
{
    let mut seen = HashSet::new();

    candidates
        .iter()
        .map(AsRef::as_ref)
        .filter(|candidate| selectors.iter().any(|s| matches(s.as_ref(), candidate)))
        .filter(|candidate| seen.insert(*candidate))
        .map(str::to_string)
        .collect()
}

/// Candidate names with O(1) exact lookup
///
/// `resolve` gives the same answer as [`match_names`] over the indexed names,
/// as positions, without scanning for exact selectors.
#[derive(Debug, Clone)]
pub struct NameIndex<'a> {
    names: Vec<&'a str>,
    positions: HashMap<&'a str, usize>,
}

impl<'a> NameIndex<'a> {
    pub fn new<I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: Vec<&'a str> = names.into_iter().collect();
        let mut positions = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            positions.entry(*name).or_insert(i);
        }

        Self { names, positions }
    }

    pub fn names(&self) -> &[&'a str] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, position: usize) -> &'a str {
        self.names[position]
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Positions of the names matched by any selector, ascending
    pub fn resolve<S: AsRef<str>>(&self, selectors: &[S]) -> Vec<usize> {
        let mut matched: Vec<usize> = Vec::new();

        for selector in selectors.iter().map(AsRef::as_ref) {
            if is_pattern(selector) {
                matched.extend(
                    self.positions
                        .values()
                        .copied()
                        .filter(|&i| matches(selector, self.names[i])),
                );
            } else if let Some(i) = self.position(selector) {
                matched.push(i);
            }
        }

        matched.sort_unstable();
        matched.dedup();
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_selectors() {
        assert!(matches("orders", "orders"));
        assert!(!matches("orders", "orders_daily"));
        assert!(!matches("", "orders"));
    }

    #[test]
    fn prefix_and_suffix_wildcards() {
        assert!(matches("reporting_*", "reporting_daily"));
        assert!(matches("reporting_*", "reporting_"));
        assert!(!matches("reporting_*", "staging_daily"));

        assert!(matches("*_daily", "reporting_daily"));
        assert!(!matches("*_daily", "reporting_weekly"));

        assert!(matches("*", "anything"));
        assert!(matches("*", ""));
    }

    #[test]
    fn inner_wildcards() {
        assert!(matches("stg_*_v2", "stg_orders_v2"));
        assert!(!matches("stg_*_v2", "stg_orders_v3"));
        assert!(matches("a*b*c", "axxbyyc"));
        assert!(!matches("a*b*c", "axxcyyb"));
    }

    #[test]
    fn prefix_and_suffix_do_not_overlap() {
        assert!(!matches("ab*ba", "aba"));
        assert!(matches("ab*ba", "abba"));
        assert!(!matches("a*a", "a"));
    }

    #[test]
    fn match_preserves_candidate_order() {
        let candidates = ["c", "reporting_b", "a", "reporting_a"];
        let matched = match_names(&["reporting_*", "a"], &candidates);
        assert_eq!(matched, vec!["reporting_b", "a", "reporting_a"]);
    }

    #[test]
    fn match_has_no_duplicates() {
        let matched = match_names(&["a", "a*", "*"], &["a", "ab", "a"]);
        assert_eq!(matched, vec!["a", "ab"]);
    }

    #[test]
    fn unmatched_pattern_is_empty_not_error() {
        let matched = match_names(&["missing_*"], &["a", "b"]);
        assert!(matched.is_empty());

        let none: [&str; 0] = [];
        assert!(match_names(&none, &["a"]).is_empty());
    }

    #[test]
    fn index_resolve_agrees_with_match_names() {
        let candidates = ["stg_b", "core", "stg_a", "report_x", "stg_b"];
        let index = NameIndex::new(candidates.iter().copied());
        let selectors = ["report_*", "core", "stg_*", "nope"];

        let resolved: Vec<&str> = index.resolve(&selectors).into_iter().map(|i| index.name(i)).collect();
        assert_eq!(resolved, match_names(&selectors, &candidates));
    }

    #[test]
    fn index_lookup() {
        let index = NameIndex::new(["a", "b"]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.position("b"), Some(1));
        assert_eq!(index.position("c"), None);
        assert!(index.resolve(&["c*"]).is_empty());
    }
}
