//! Depth-first backtracking search
//!
//! The algorithm:
//! 1. Start with every participating symbol unassigned (a wildcard run)
//! 2. At every state, ask the oracle whether all templates can still match;
//!    if not, the whole subtree is pruned
//! 3. Pick the first unassigned symbol in canonical order; if there is none,
//!    the state is a solution
//! 4. Try each of the symbol's candidates in stored order, recursing after
//!    each and undoing it on failure
//!
//! Symbol order and candidate order are fixed, so the first solution found is
//! deterministic.

use log::{debug, info, trace};
use std::time::Instant;

use crate::model::Problem;
use crate::oracle::Oracle;
use crate::search::assignment::Assignment;
use crate::search::config::{Algorithm, SearchConfig};
use crate::search::result::{SearchResult, SearchStatistics, Solution};
use crate::search::SearchAlgorithm;

/// How a walk over a subtree ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkOutcome {
    /// A complete satisfying assignment
    Found(Solution),
    /// Every branch below was tried and failed
    Exhausted,
    /// The abort check fired before the subtree was finished
    Aborted,
}

/// One depth-first walk, sharing an oracle and statistics across its nodes.
///
/// `should_abort` is consulted only when the walk is about to branch on a new
/// symbol.
pub struct Walk<'a, 't> {
    problem: &'a Problem,
    oracle: &'a mut Oracle<'t>,
    statistics: &'a mut SearchStatistics,
    should_abort: &'a dyn Fn() -> bool,
}

impl<'a, 't> Walk<'a, 't> {
    pub fn new(
        problem: &'a Problem,
        oracle: &'a mut Oracle<'t>,
        statistics: &'a mut SearchStatistics,
        should_abort: &'a dyn Fn() -> bool,
    ) -> Self {
        Self {
            problem,
            oracle,
            statistics,
            should_abort,
        }
    }

    /// Search the subtree rooted at `assignment`.
    ///
    /// On `Exhausted` and `Aborted` the assignment is restored to its state on
    /// entry.
    pub fn run(&mut self, assignment: &mut Assignment) -> WalkOutcome {
        let depth = assignment.assigned_count();
        self.visit(assignment, depth)
    }

    fn visit(&mut self, assignment: &mut Assignment, depth: usize) -> WalkOutcome {
        self.statistics.nodes_visited += 1;
        self.statistics.max_depth = self.statistics.max_depth.max(depth);

        if !self.oracle.satisfies(self.problem.templates(), assignment) {
            self.statistics.nodes_pruned += 1;
            return WalkOutcome::Exhausted;
        }

        let Some(sym) = assignment.next_unassigned() else {
            return assignment
                .to_solution()
                .map_or(WalkOutcome::Exhausted, WalkOutcome::Found);
        };

        if (self.should_abort)() {
            return WalkOutcome::Aborted;
        }

        let candidates = self.problem.candidates().candidates(sym);
        if candidates.is_empty() {
            debug!("symbol {} has no candidates left, branch fails", sym);
            return WalkOutcome::Exhausted;
        }

        for candidate in candidates {
            trace!("depth {}: trying {} = {}", depth, sym, candidate);
            assignment.set(sym, candidate.as_str());

            match self.visit(assignment, depth + 1) {
                WalkOutcome::Exhausted => {
                    self.statistics.backtracks += 1;
                    assignment.clear(sym);
                }
                WalkOutcome::Aborted => {
                    assignment.clear(sym);
                    return WalkOutcome::Aborted;
                }
                found @ WalkOutcome::Found(_) => return found,
            }
        }

        WalkOutcome::Exhausted
    }
}

/// Sequential backtracking search
pub struct BacktrackSearch {
    statistics: SearchStatistics,
}

impl BacktrackSearch {
    pub fn new() -> Self {
        Self {
            statistics: SearchStatistics::new(Algorithm::Backtrack),
        }
    }
}

impl Default for BacktrackSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchAlgorithm for BacktrackSearch {
    fn search(&mut self, problem: &Problem, config: &SearchConfig) -> SearchResult {
        self.reset();
        let start_time = Instant::now();
        let deadline = config.timeout.map(|t| start_time + t);
        self.statistics.candidates_filtered = problem.candidates().filtered_out();

        info!(
            "backtracking over {} templates, {} participating symbols (search space <= {})",
            problem.templates().len(),
            problem.candidates().participating().count(),
            problem.candidates().search_space_size()
        );
        let empty = problem.candidates().empty_symbols();
        if !empty.is_empty() {
            let names: Vec<String> = empty.iter().map(ToString::to_string).collect();
            debug!("no candidate of {} occurs in the target", names.join(", "));
        }

        let mut oracle = if config.use_cache {
            Oracle::new(problem.target())
        } else {
            Oracle::uncached(problem.target())
        };
        let mut assignment = Assignment::new(problem.candidates());
        let timed_out = || deadline.is_some_and(|d| Instant::now() >= d);

        let outcome =
            Walk::new(problem, &mut oracle, &mut self.statistics, &timed_out).run(&mut assignment);

        self.statistics.oracle = *oracle.statistics();
        self.statistics.elapsed_time = start_time.elapsed();
        info!(
            "search finished after {} nodes in {:.2?}",
            self.statistics.nodes_visited, self.statistics.elapsed_time
        );

        match outcome {
            WalkOutcome::Found(solution) => SearchResult::solved(solution, self.statistics.clone()),
            WalkOutcome::Exhausted => SearchResult::unsatisfiable(self.statistics.clone()),
            WalkOutcome::Aborted => {
                if config.verbose {
                    println!(
                        "Search timed out after {} nodes",
                        self.statistics.nodes_visited
                    );
                }
                SearchResult::timed_out(self.statistics.clone())
            }
        }
    }

    fn statistics(&self) -> SearchStatistics {
        self.statistics.clone()
    }

    fn reset(&mut self) {
        self.statistics = SearchStatistics::new(Algorithm::Backtrack);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Symbol, Template};
    use crate::search::result::SearchStatus;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn sym(c: char) -> Symbol {
        Symbol::new(c).unwrap()
    }

    fn problem(target: &str, templates: &[&str], raw: &[(char, &[&str])]) -> Problem {
        let raw: BTreeMap<Symbol, Vec<String>> = raw
            .iter()
            .map(|(c, cands)| (sym(*c), cands.iter().map(|s| s.to_string()).collect()))
            .collect();
        Problem::new(
            target,
            templates.iter().map(|t| Template::parse(t).unwrap()),
            &raw,
        )
    }

    fn run(problem: &Problem) -> SearchResult {
        BacktrackSearch::new().search(problem, &SearchConfig::default())
    }

    #[test]
    fn test_single_symbol_solution() {
        let p = problem("catdog", &["Adog"], &[('A', &["cat", "xyz"])]);
        let result = run(&p);

        let solution = result.solution().expect("should be satisfiable");
        assert_eq!(solution.get(sym('A')), Some("cat"));
        assert!(p.verify(solution));
    }

    #[test]
    fn test_empty_candidates_fail() {
        let p = problem("catdog", &["Bdog"], &[('B', &["pig", "cow"])]);
        let result = run(&p);

        assert_eq!(result.status, SearchStatus::Unsatisfiable);
        assert_eq!(result.statistics.candidates_filtered, 2);
    }

    #[test]
    fn test_wildcard_root_not_pruned() {
        let p = problem("abxycd", &["AxyB"], &[('A', &["b", "ab"]), ('B', &["cd", "c"])]);
        let result = run(&p);

        let solution = result.solution().unwrap();
        assert_eq!(solution.get(sym('A')), Some("b"));
        assert_eq!(solution.get(sym('B')), Some("cd"));
        // Root plus A=b plus B=cd
        assert_eq!(result.statistics.nodes_visited, 3);
        assert_eq!(result.statistics.nodes_pruned, 0);
    }

    #[test]
    fn test_backtracks_to_earlier_symbol() {
        // A=a, B=b gives "ab" but "abc" does not occur
        let p = problem(
            "abxbc",
            &["AB", "ABc"],
            &[('A', &["a", "x"]), ('B', &["b"])],
        );
        let result = run(&p);

        let solution = result.solution().unwrap();
        assert_eq!(solution.get(sym('A')), Some("x"));
        assert_eq!(solution.get(sym('B')), Some("b"));
        assert!(result.statistics.backtracks >= 1);
        assert!(p.verify(solution));
    }

    #[test]
    fn test_no_combination_satisfies() {
        let p = problem("abcd", &["AB"], &[('A', &["a", "c"]), ('B', &["a", "c"])]);
        let result = run(&p);
        assert_eq!(result.status, SearchStatus::Unsatisfiable);
        assert!(result.statistics.nodes_pruned > 0);
    }

    #[test]
    fn test_root_pruned_by_ground_template() {
        let p = problem("abc", &["zz", "A"], &[('A', &["a"])]);
        let result = run(&p);
        assert_eq!(result.status, SearchStatus::Unsatisfiable);
        assert_eq!(result.statistics.nodes_visited, 1);
        assert_eq!(result.statistics.nodes_pruned, 1);
    }

    #[test]
    fn test_no_templates_is_trivially_satisfiable() {
        let p = problem("abc", &[], &[('A', &["a"])]);
        let solution = run(&p).solution().cloned().unwrap();
        assert!(solution.is_unused(sym('A')));
    }

    #[test]
    fn test_unused_symbols_reported_unused() {
        let p = problem("catdog", &["Adog"], &[('A', &["cat"]), ('Q', &["zzz"])]);
        let result = run(&p);
        let solution = result.solution().unwrap();
        assert!(solution.is_unused(sym('Q')));
        assert_eq!(solution.len(), 2);
    }

    #[test]
    fn test_repeated_symbol_must_agree() {
        let p = problem("abab", &["AA"], &[('A', &["a", "ab"])]);
        let solution = run(&p).solution().cloned().unwrap();
        assert_eq!(solution.get(sym('A')), Some("ab"));
    }

    #[test]
    fn test_cache_does_not_change_result() {
        let p = problem(
            "thequickbrownfox",
            &["AquickB", "Bfox", "Cown"],
            &[
                ('A', &["he", "the", "t"]),
                ('B', &["br", "brown", "b"]),
                ('C', &["br", "b"]),
            ],
        );
        let cached = BacktrackSearch::new().search(&p, &SearchConfig::default());
        let uncached =
            BacktrackSearch::new().search(&p, &SearchConfig::default().with_cache(false));

        assert_eq!(cached.status, uncached.status);
        assert_eq!(uncached.statistics.oracle.cache_hits, 0);
    }

    #[test]
    fn test_deterministic() {
        let p = problem(
            "abcabcabc",
            &["AcB", "BC"],
            &[('A', &["ab", "b", "cab"]), ('B', &["a", "ab"]), ('C', &["bc", "c"])],
        );
        let first = run(&p);
        for _ in 0..5 {
            assert_eq!(run(&p).status, first.status);
        }
    }

    #[test]
    fn test_zero_timeout_aborts() {
        let p = problem("abxycd", &["AxyB"], &[('A', &["ab"]), ('B', &["cd"])]);
        let config = SearchConfig::default().with_timeout(Duration::ZERO);
        let result = BacktrackSearch::new().search(&p, &config);
        assert!(result.is_timed_out());
    }

    #[test]
    fn test_walk_restores_assignment_on_failure() {
        let p = problem("abcd", &["AB"], &[('A', &["a", "c"]), ('B', &["a", "c"])]);
        let mut oracle = Oracle::new(p.target());
        let mut stats = SearchStatistics::default();
        let never = || false;

        let mut assignment = Assignment::new(p.candidates());
        let initial = assignment.clone();
        let outcome = Walk::new(&p, &mut oracle, &mut stats, &never).run(&mut assignment);

        assert_eq!(outcome, WalkOutcome::Exhausted);
        assert_eq!(assignment, initial);
    }

    #[test]
    fn test_statistics_reset_between_searches() {
        let p = problem("catdog", &["Adog"], &[('A', &["cat"])]);
        let mut search = BacktrackSearch::new();
        search.search(&p, &SearchConfig::default());
        let first = search.statistics().nodes_visited;
        search.search(&p, &SearchConfig::default());
        assert_eq!(search.statistics().nodes_visited, first);
    }
}
