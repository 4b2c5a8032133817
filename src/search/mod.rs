//! Search for a satisfying symbol assignment
//!
//! This module provides:
//! - Candidate lists filtered against the target
//! - The assignment explored by the search
//! - Backtracking: sequential depth-first search with pruning at every node
//! - Parallel: the same search with the first symbol's candidates spread
//!   over worker threads

pub mod assignment;
pub mod backtrack;
pub mod candidate;
pub mod config;
pub mod parallel;
pub mod result;

pub use assignment::{Assignment, Value};
pub use backtrack::BacktrackSearch;
pub use candidate::{CandidateList, CandidateStore};
pub use config::{Algorithm, SearchConfig};
pub use parallel::{ParallelConfig, ParallelResult, ParallelSearch, run_parallel_search};
pub use result::{SearchResult, SearchStatistics, SearchStatus, Solution, SolutionValue};

use crate::model::Problem;

/// Trait for algorithms that search for a satisfying assignment
pub trait SearchAlgorithm {
    /// Search for the first assignment under which every template occurs in
    /// the target
    ///
    /// # Arguments
    /// * `problem` - Target, distinct templates and filtered candidates
    /// * `config` - Search configuration parameters
    ///
    /// # Returns
    /// A SearchResult holding the solution (if any) and statistics
    fn search(&mut self, problem: &Problem, config: &SearchConfig) -> SearchResult;

    /// Get statistics from the most recent search
    fn statistics(&self) -> SearchStatistics;

    /// Reset the search state for a new search
    fn reset(&mut self);
}

/// Build the search selected by `config.algorithm`
pub fn create_search(
    config: &SearchConfig,
    parallel_config: &ParallelConfig,
) -> Box<dyn SearchAlgorithm> {
    match config.algorithm {
        Algorithm::Backtrack => Box::new(BacktrackSearch::new()),
        Algorithm::Parallel => Box::new(ParallelSearch::new(parallel_config.clone())),
    }
}

/// Solve `problem` with the algorithm selected in `config`
pub fn solve(problem: &Problem, config: &SearchConfig) -> SearchResult {
    create_search(config, &ParallelConfig::default()).search(problem, config)
}
