//! Per-symbol candidate lists, filtered against the target
//!
//! A candidate that does not occur verbatim in the target can never be part of
//! a match: a concrete value is substituted as literal text, so the whole
//! candidate must appear contiguously somewhere in the target. Dropping such
//! candidates before the search starts never changes the outcome.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Symbol, Template};

/// Candidates for one symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateList {
    /// The symbol appears in no template and is never branched on
    Unused,
    /// Filtered candidates in input order (may be empty)
    Candidates(Vec<String>),
}

impl CandidateList {
    pub fn as_slice(&self) -> &[String] {
        match self {
            CandidateList::Unused => &[],
            CandidateList::Candidates(list) => list,
        }
    }

    pub fn is_unused(&self) -> bool {
        matches!(self, CandidateList::Unused)
    }
}

/// Candidate lists for every symbol known to a problem
#[derive(Debug, Clone, Default)]
pub struct CandidateStore {
    lists: BTreeMap<Symbol, CandidateList>,
    filtered_out: usize,
}

impl CandidateStore {
    /// Build the store for `templates` over `target`.
    ///
    /// Symbols in `raw` that no template mentions are marked unused. Template
    /// symbols absent from `raw` get an empty list, which makes the search
    /// fail at that symbol.
    pub fn build(
        target: &str,
        templates: &[Template],
        raw: &BTreeMap<Symbol, Vec<String>>,
    ) -> Self {
        let participating: BTreeSet<Symbol> =
            templates.iter().flat_map(|t| t.symbols()).collect();

        let mut lists = BTreeMap::new();
        let mut filtered_out = 0;

        for (&sym, candidates) in raw {
            if participating.contains(&sym) {
                let kept = filter_candidates(target, candidates);
                filtered_out += candidates.len() - kept.len();
                lists.insert(sym, CandidateList::Candidates(kept));
            } else {
                lists.insert(sym, CandidateList::Unused);
            }
        }

        for sym in participating {
            lists
                .entry(sym)
                .or_insert_with(|| CandidateList::Candidates(Vec::new()));
        }

        Self {
            lists,
            filtered_out,
        }
    }

    pub fn get(&self, sym: Symbol) -> Option<&CandidateList> {
        self.lists.get(&sym)
    }

    /// Candidates for `sym`; empty for unused or unknown symbols
    pub fn candidates(&self, sym: Symbol) -> &[String] {
        self.lists.get(&sym).map_or(&[], CandidateList::as_slice)
    }

    pub fn is_participating(&self, sym: Symbol) -> bool {
        matches!(self.lists.get(&sym), Some(CandidateList::Candidates(_)))
    }

    /// Participating symbols in canonical order
    pub fn participating(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.lists
            .iter()
            .filter(|(_, list)| !list.is_unused())
            .map(|(&sym, _)| sym)
    }

    /// Every symbol the store knows about, in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &CandidateList)> {
        self.lists.iter().map(|(&sym, list)| (sym, list))
    }

    /// Participating symbols left without any candidate after filtering
    pub fn empty_symbols(&self) -> Vec<Symbol> {
        self.lists
            .iter()
            .filter(|(_, list)| matches!(list, CandidateList::Candidates(c) if c.is_empty()))
            .map(|(&sym, _)| sym)
            .collect()
    }

    /// Number of raw candidates dropped by filtering
    pub fn filtered_out(&self) -> usize {
        self.filtered_out
    }

    /// Upper bound on full assignments (product of list sizes), saturating
    pub fn search_space_size(&self) -> u128 {
        self.participating()
            .map(|sym| self.candidates(sym).len() as u128)
            .fold(1u128, |acc, n| acc.saturating_mul(n))
    }
}

/// Keep candidates that are non-empty and occur in `target`, dropping repeats.
pub fn filter_candidates(target: &str, candidates: &[String]) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !candidate.is_empty() && target.contains(candidate.as_str()) && !kept.contains(candidate)
        {
            kept.push(candidate.clone());
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(c: char) -> Symbol {
        Symbol::new(c).unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn templates(items: &[&str]) -> Vec<Template> {
        items.iter().map(|t| Template::parse(t).unwrap()).collect()
    }

    #[test]
    fn test_filter_candidates() {
        let kept = filter_candidates("catdog", &strings(&["cat", "xyz", "dog", "cat", ""]));
        assert_eq!(kept, strings(&["cat", "dog"]));
    }

    #[test]
    fn test_build_marks_unused_symbols() {
        let mut raw = BTreeMap::new();
        raw.insert(sym('A'), strings(&["cat"]));
        raw.insert(sym('Z'), strings(&["anything"]));

        let store = CandidateStore::build("catdog", &templates(&["Adog"]), &raw);

        assert!(store.is_participating(sym('A')));
        assert!(!store.is_participating(sym('Z')));
        assert_eq!(store.get(sym('Z')), Some(&CandidateList::Unused));
        assert!(store.candidates(sym('Z')).is_empty());
        assert_eq!(store.participating().collect::<Vec<_>>(), vec![sym('A')]);
        assert_eq!(store.iter().count(), 2);
    }

    #[test]
    fn test_build_counts_filtered() {
        let mut raw = BTreeMap::new();
        raw.insert(sym('B'), strings(&["pig", "cow"]));

        let store = CandidateStore::build("catdog", &templates(&["Bdog"]), &raw);

        assert_eq!(store.filtered_out(), 2);
        assert_eq!(store.empty_symbols(), vec![sym('B')]);
        assert_eq!(store.search_space_size(), 0);
    }

    #[test]
    fn test_missing_template_symbol_gets_empty_list() {
        let store = CandidateStore::build("abc", &templates(&["AB"]), &BTreeMap::new());

        assert!(store.is_participating(sym('A')));
        assert!(store.is_participating(sym('B')));
        assert_eq!(store.empty_symbols(), vec![sym('A'), sym('B')]);
    }

    #[test]
    fn test_search_space_size() {
        let mut raw = BTreeMap::new();
        raw.insert(sym('A'), strings(&["a", "b", "c"]));
        raw.insert(sym('B'), strings(&["a", "b"]));
        raw.insert(sym('C'), strings(&["q"]));

        let store = CandidateStore::build("abc", &templates(&["AB"]), &raw);
        assert_eq!(store.search_space_size(), 6);
    }
}
