//! Fuzzy narrowing of the entry list by name.
//!
//! Matching is a case-insensitive subsequence test with diacritics folded away
//! on both sides, so `cafe` finds `Café` and `café` finds `Cafe`. Results keep
//! the collection's order; nothing is ranked.

use crate::store::StoredEntry;
use nucleo_matcher::{
    chars,
    pattern::{Atom, AtomKind, CaseMatching, Normalization},
    Config, Matcher, Utf32Str,
};

/// Reusable matcher state for repeated filtering as the query changes.
pub struct FuzzyFilter {
    matcher: Matcher,
    buf: Vec<char>,
}

impl Default for FuzzyFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl FuzzyFilter {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
            buf: Vec::new(),
        }
    }

    /// True when every character of `query` occurs in `candidate`, in order.
    pub fn matches(&mut self, query: &str, candidate: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let atom = query_atom(query);
        let haystack = Utf32Str::new(candidate, &mut self.buf);
        atom.score(haystack, &mut self.matcher).is_some()
    }

    /// Keep the entries whose name matches `query`, in their original order.
    /// An empty query passes the whole collection through.
    pub fn filter<'a>(&mut self, query: &str, entries: &'a [StoredEntry]) -> Vec<&'a StoredEntry> {
        if query.is_empty() {
            return entries.iter().collect();
        }
        let atom = query_atom(query);
        let matcher = &mut self.matcher;
        let buf = &mut self.buf;
        entries
            .iter()
            .filter(|stored| {
                let haystack = Utf32Str::new(stored.name(), buf);
                atom.score(haystack, matcher).is_some()
            })
            .collect()
    }
}

// Whitespace in the query is literal: the whole query is one subsequence.
// `Normalization::Smart` stops folding the haystack once the needle holds an
// accented char, so the needle is folded first.
fn query_atom(query: &str) -> Atom {
    let folded: String = query.chars().map(chars::normalize).collect();
    Atom::new(
        &folded,
        CaseMatching::Ignore,
        Normalization::Smart,
        AtomKind::Fuzzy,
        false,
    )
}
