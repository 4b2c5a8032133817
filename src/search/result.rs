//! Search result types and statistics

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::model::{Symbol, Template, TemplatePart};
use crate::oracle::OracleStatistics;
use crate::search::config::Algorithm;

/// Text written for symbols that take part in no template
pub const UNUSED_MARKER: &str = "UNUSED";

/// Final value of one symbol in a solution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolutionValue {
    Value(String),
    Unused,
}

/// A satisfying assignment: every known symbol mapped to a concrete value or
/// marked unused
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    values: BTreeMap<Symbol, SolutionValue>,
}

impl Solution {
    pub fn new(values: BTreeMap<Symbol, SolutionValue>) -> Self {
        Self { values }
    }

    /// Concrete value of `sym`, if it has one
    pub fn get(&self, sym: Symbol) -> Option<&str> {
        match self.values.get(&sym) {
            Some(SolutionValue::Value(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn is_unused(&self, sym: Symbol) -> bool {
        matches!(self.values.get(&sym), Some(SolutionValue::Unused))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &SolutionValue)> {
        self.values.iter().map(|(&sym, value)| (sym, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fully substitute `template`; `None` if it uses a symbol without a value
    pub fn substitute(&self, template: &Template) -> Option<String> {
        let mut text = String::new();
        for part in template.parts() {
            match part {
                TemplatePart::Literal(literal) => text.push_str(literal),
                TemplatePart::Symbol(sym) => text.push_str(self.get(*sym)?),
            }
        }
        Some(text)
    }
}

/// One `symbol:value` line per symbol, in canonical order
impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (sym, value) in self.iter() {
            match value {
                SolutionValue::Value(text) => writeln!(f, "{}:{}", sym, text)?,
                SolutionValue::Unused => writeln!(f, "{}:{}", sym, UNUSED_MARKER)?,
            }
        }
        Ok(())
    }
}

/// How a search ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    /// A satisfying assignment was found
    Solved(Solution),
    /// The search space was exhausted
    Unsatisfiable,
    /// The configured timeout fired before the search finished
    TimedOut,
}

/// Result of a search operation
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub status: SearchStatus,
    pub statistics: SearchStatistics,
}

impl SearchResult {
    pub fn solved(solution: Solution, statistics: SearchStatistics) -> Self {
        Self {
            status: SearchStatus::Solved(solution),
            statistics,
        }
    }

    pub fn unsatisfiable(statistics: SearchStatistics) -> Self {
        Self {
            status: SearchStatus::Unsatisfiable,
            statistics,
        }
    }

    pub fn timed_out(statistics: SearchStatistics) -> Self {
        Self {
            status: SearchStatus::TimedOut,
            statistics,
        }
    }

    pub fn solution(&self) -> Option<&Solution> {
        match &self.status {
            SearchStatus::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn is_satisfiable(&self) -> bool {
        matches!(self.status, SearchStatus::Solved(_))
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self.status, SearchStatus::TimedOut)
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            SearchStatus::Solved(solution) => {
                writeln!(f, "Solution found:")?;
                for line in solution.to_string().lines() {
                    writeln!(f, "  {}", line)?;
                }
            }
            SearchStatus::Unsatisfiable => writeln!(f, "No solution exists.")?,
            SearchStatus::TimedOut => writeln!(f, "Search timed out.")?,
        }
        Ok(())
    }
}

/// Statistics from a search operation
#[derive(Debug, Clone, Default)]
pub struct SearchStatistics {
    /// Algorithm used for the search
    pub algorithm: Algorithm,
    /// Total time spent searching
    pub elapsed_time: Duration,
    /// Search states visited (each one gets a pruning check)
    pub nodes_visited: u64,
    /// States rejected by the pruning check
    pub nodes_pruned: u64,
    /// Candidate trials that were undone
    pub backtracks: u64,
    /// Deepest number of concrete symbols reached
    pub max_depth: usize,
    /// Raw candidates dropped before the search for not occurring in the target
    pub candidates_filtered: usize,
    /// Oracle counters
    pub oracle: OracleStatistics,
}

impl SearchStatistics {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Default::default()
        }
    }

    /// Fraction of visited states that were pruned (0.0 to 1.0)
    pub fn prune_rate(&self) -> f64 {
        if self.nodes_visited == 0 {
            0.0
        } else {
            self.nodes_pruned as f64 / self.nodes_visited as f64
        }
    }

    /// States visited per second
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.nodes_visited as f64 / secs
        }
    }

    /// Fold the counters of another (worker) search into this one.
    /// Elapsed time is left alone; the caller measures wall time.
    pub fn merge(&mut self, other: &SearchStatistics) {
        self.nodes_visited += other.nodes_visited;
        self.nodes_pruned += other.nodes_pruned;
        self.backtracks += other.backtracks;
        self.max_depth = self.max_depth.max(other.max_depth);
        self.oracle.merge(&other.oracle);
    }

    /// Format statistics as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Algorithm: {}\n", self.algorithm));
        s.push_str(&format!("Time: {:.2?}\n", self.elapsed_time));
        s.push_str(&format!("Nodes visited: {}\n", self.nodes_visited));
        s.push_str(&format!("Throughput: {:.0} nodes/sec\n", self.throughput()));
        s.push_str(&format!(
            "Nodes pruned: {} ({:.2}%)\n",
            self.nodes_pruned,
            self.prune_rate() * 100.0
        ));
        s.push_str(&format!("Backtracks: {}\n", self.backtracks));
        s.push_str(&format!("Max depth: {}\n", self.max_depth));
        s.push_str(&format!(
            "Candidates filtered: {}\n",
            self.candidates_filtered
        ));
        s.push_str(&format!("Oracle calls: {}\n", self.oracle.calls));
        s.push_str(&format!("Template checks: {}\n", self.oracle.template_checks));

        if self.oracle.cache_hits > 0 {
            s.push_str(&format!(
                "Cache hit rate: {:.2}%\n",
                self.oracle.hit_rate() * 100.0
            ));
        }

        s
    }
}
