//! A complete problem instance: target, distinct templates and candidates

use std::collections::BTreeMap;

use super::symbol::Symbol;
use super::template::Template;
use crate::search::candidate::CandidateStore;
use crate::search::result::Solution;

/// Read-only input to a search.
///
/// Templates are deduplicated (first occurrence kept) and candidate lists are
/// already filtered against the target when the problem is built.
#[derive(Debug, Clone)]
pub struct Problem {
    target: String,
    templates: Vec<Template>,
    candidates: CandidateStore,
}

impl Problem {
    /// Build a problem from raw input.
    ///
    /// `raw_candidates` maps each symbol that had a candidate line to its
    /// candidates in input order. Symbols missing from every template become
    /// "not used"; template symbols missing from the map get an empty list.
    pub fn new<I>(
        target: impl Into<String>,
        templates: I,
        raw_candidates: &BTreeMap<Symbol, Vec<String>>,
    ) -> Self
    where
        I: IntoIterator<Item = Template>,
    {
        let target = target.into();

        let mut distinct: Vec<Template> = Vec::new();
        for template in templates {
            if !distinct.contains(&template) {
                distinct.push(template);
            }
        }

        let candidates = CandidateStore::build(&target, &distinct, raw_candidates);

        Self {
            target,
            templates: distinct,
            candidates,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn candidates(&self) -> &CandidateStore {
        &self.candidates
    }

    /// Check a solution directly: every template, fully substituted, must be
    /// a substring of the target.
    pub fn verify(&self, solution: &Solution) -> bool {
        self.templates.iter().all(|template| {
            solution
                .substitute(template)
                .is_some_and(|text| self.target.contains(&text))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(c: char) -> Symbol {
        Symbol::new(c).unwrap()
    }

    fn raw(entries: &[(char, &[&str])]) -> BTreeMap<Symbol, Vec<String>> {
        entries
            .iter()
            .map(|(c, cands)| (sym(*c), cands.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_templates_deduplicated_in_order() {
        let templates = ["Adog", "cat", "Adog", "B"]
            .iter()
            .map(|t| Template::parse(t).unwrap());
        let problem = Problem::new(
            "catdog",
            templates,
            &raw(&[('A', &["cat"]), ('B', &["dog"])]),
        );

        let texts: Vec<_> = problem.templates().iter().map(Template::as_str).collect();
        assert_eq!(texts, vec!["Adog", "cat", "B"]);
    }

    #[test]
    fn test_candidates_filtered_on_build() {
        let problem = Problem::new(
            "catdog",
            [Template::parse("Adog").unwrap()],
            &raw(&[('A', &["cat", "xyz"])]),
        );

        assert_eq!(problem.candidates().candidates(sym('A')), &["cat".to_string()]);
        assert_eq!(problem.target(), "catdog");
    }
}
