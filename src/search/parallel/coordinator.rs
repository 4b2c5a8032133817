//! Parallel search coordinator that manages worker threads.

use crate::model::{Problem, Symbol};
use crate::oracle::{Oracle, SharedCache};
use crate::search::SearchAlgorithm;
use crate::search::assignment::Assignment;
use crate::search::backtrack::{Walk, WalkOutcome};
use crate::search::config::{Algorithm, SearchConfig};
use crate::search::parallel::channel::{
    CoordinatorChannels, WorkerChannels, WorkerMessage, create_channels,
};
use crate::search::parallel::config::ParallelConfig;
use crate::search::result::{SearchResult, SearchStatistics, Solution};
use crossbeam_channel::RecvTimeoutError;
use log::{debug, error, info};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result from parallel search execution.
#[derive(Debug)]
pub struct ParallelResult {
    /// Overall result, with statistics aggregated from all workers.
    pub result: SearchResult,
    /// Per-worker statistics.
    pub worker_statistics: Vec<(usize, SearchStatistics)>,
}

/// Run parallel search with the given configuration.
///
/// The coordinator checks the root state itself, then hands each candidate of
/// the first symbol to the workers as a separate branch. The reported solution
/// is the one from the lowest-numbered successful branch, which is the same
/// solution the sequential search finds.
pub fn run_parallel_search(
    problem: &Problem,
    search_config: &SearchConfig,
    parallel_config: &ParallelConfig,
) -> ParallelResult {
    let start_time = Instant::now();
    let mut statistics = SearchStatistics::new(Algorithm::Parallel);
    statistics.candidates_filtered = problem.candidates().filtered_out();

    let empty = problem.candidates().empty_symbols();
    if !empty.is_empty() {
        let names: Vec<String> = empty.iter().map(ToString::to_string).collect();
        debug!("no candidate of {} occurs in the target", names.join(", "));
    }

    let cache = Arc::new(SharedCache::new(problem.target()));
    let share_cache = search_config.use_cache && parallel_config.share_cache;

    // Root state: every participating symbol unassigned
    let assignment = Assignment::new(problem.candidates());
    let root_ok = {
        let mut oracle = make_oracle(problem, &cache, search_config.use_cache, share_cache);
        let ok = oracle.satisfies(problem.templates(), &assignment);
        statistics.oracle.merge(oracle.statistics());
        ok
    };
    statistics.nodes_visited = 1;

    if !root_ok {
        statistics.nodes_pruned = 1;
        return finish(SearchResult::unsatisfiable, statistics, start_time, Vec::new());
    }

    let Some(first) = assignment.next_unassigned() else {
        return match assignment.to_solution() {
            Some(solution) => finish(
                |stats| SearchResult::solved(solution, stats),
                statistics,
                start_time,
                Vec::new(),
            ),
            None => finish(SearchResult::unsatisfiable, statistics, start_time, Vec::new()),
        };
    };

    let num_branches = problem.candidates().candidates(first).len();
    if num_branches == 0 {
        debug!("symbol {} has no candidates left, search fails at the root", first);
        return finish(SearchResult::unsatisfiable, statistics, start_time, Vec::new());
    }

    let num_workers = parallel_config.effective_workers(num_branches);
    info!(
        "parallel search: {} branches on symbol {} across {} workers",
        num_branches, first, num_workers
    );

    let (coordinator_channels, worker_channels) = create_channels(num_workers, num_branches);

    // Clone data for workers
    let problem = Arc::new(problem.clone());
    let search_config = Arc::new(search_config.clone());

    let worker_handles: Vec<_> = worker_channels
        .into_iter()
        .enumerate()
        .map(|(worker_id, channels)| {
            let problem = Arc::clone(&problem);
            let search_config = Arc::clone(&search_config);
            let cache = Arc::clone(&cache);

            std::thread::spawn(move || {
                run_worker(
                    worker_id,
                    &problem,
                    first,
                    &search_config,
                    &cache,
                    share_cache,
                    channels,
                )
            })
        })
        .collect();

    let deadline = search_config.timeout.map(|t| start_time + t);
    let outcome = run_coordinator(coordinator_channels, num_workers, deadline);

    for (worker_id, handle) in worker_handles.into_iter().enumerate() {
        if handle.join().is_err() {
            error!("worker {} panicked", worker_id);
        }
    }

    for (_, worker_stats) in &outcome.worker_statistics {
        statistics.merge(worker_stats);
    }

    let worker_statistics = outcome.worker_statistics;
    match outcome.solution {
        Some(solution) => finish(
            |stats| SearchResult::solved(solution, stats),
            statistics,
            start_time,
            worker_statistics,
        ),
        None if outcome.aborted_branches > 0 => {
            if search_config.verbose {
                println!(
                    "Search timed out with {} branches unfinished",
                    outcome.aborted_branches
                );
            }
            finish(
                SearchResult::timed_out,
                statistics,
                start_time,
                worker_statistics,
            )
        }
        None => finish(
            SearchResult::unsatisfiable,
            statistics,
            start_time,
            worker_statistics,
        ),
    }
}

fn finish(
    build: impl FnOnce(SearchStatistics) -> SearchResult,
    mut statistics: SearchStatistics,
    start_time: Instant,
    worker_statistics: Vec<(usize, SearchStatistics)>,
) -> ParallelResult {
    statistics.elapsed_time = start_time.elapsed();
    ParallelResult {
        result: build(statistics),
        worker_statistics,
    }
}

fn make_oracle<'c>(
    problem: &'c Problem,
    cache: &'c SharedCache,
    use_cache: bool,
    share_cache: bool,
) -> Oracle<'c> {
    if share_cache {
        Oracle::shared(cache)
    } else if use_cache {
        Oracle::new(problem.target())
    } else {
        Oracle::uncached(problem.target())
    }
}

/// What the coordinator collected from the workers.
struct CoordinatorOutcome {
    solution: Option<Solution>,
    aborted_branches: usize,
    worker_statistics: Vec<(usize, SearchStatistics)>,
}

/// Coordinator loop that receives messages from workers and aggregates results.
fn run_coordinator(
    channels: CoordinatorChannels,
    total_workers: usize,
    deadline: Option<Instant>,
) -> CoordinatorOutcome {
    let mut solutions: BTreeMap<usize, Solution> = BTreeMap::new();
    let mut aborted_branches = 0;
    let mut worker_statistics = Vec::new();
    let mut finished_count = 0;

    loop {
        if !channels.shared.should_stop() && deadline.is_some_and(|d| Instant::now() >= d) {
            debug!("deadline reached, stopping workers");
            channels.shared.signal_stop();
        }

        // Receive with timeout to allow periodic deadline checks
        match channels.from_workers.recv_timeout(Duration::from_millis(50)) {
            Ok(WorkerMessage::Solved {
                worker_id,
                branch,
                solution,
            }) => {
                debug!("worker {} solved branch {}", worker_id, branch);
                solutions.insert(branch, solution);
            }
            Ok(WorkerMessage::Exhausted { worker_id, branch }) => {
                debug!("worker {} exhausted branch {}", worker_id, branch);
            }
            Ok(WorkerMessage::Aborted { worker_id, branch }) => {
                debug!("worker {} abandoned branch {}", worker_id, branch);
                // A superseded branch does not matter once a lower one is solved
                if channels.shared.best_branch().is_none_or(|best| best > branch) {
                    aborted_branches += 1;
                }
            }
            Ok(WorkerMessage::Finished {
                worker_id,
                statistics,
            }) => {
                worker_statistics.push((worker_id, statistics));
                finished_count += 1;
                if finished_count >= total_workers {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                // All senders dropped, we're done
                break;
            }
        }
    }

    worker_statistics.sort_by_key(|(worker_id, _)| *worker_id);

    CoordinatorOutcome {
        solution: solutions.into_values().next(),
        aborted_branches,
        worker_statistics,
    }
}

/// Worker function: pull branches from the queue and search each one.
fn run_worker(
    worker_id: usize,
    problem: &Problem,
    first: Symbol,
    config: &SearchConfig,
    cache: &SharedCache,
    share_cache: bool,
    channels: WorkerChannels,
) {
    let mut oracle = make_oracle(problem, cache, config.use_cache, share_cache);
    let mut statistics = SearchStatistics::new(Algorithm::Backtrack);
    let candidates = problem.candidates().candidates(first);
    let shared = Arc::clone(&channels.shared);

    for branch in channels.branches.iter() {
        let message = if shared.is_superseded(branch) {
            WorkerMessage::Aborted { worker_id, branch }
        } else {
            let mut assignment = Assignment::new(problem.candidates());
            assignment.set(first, candidates[branch].as_str());

            let abort = || shared.is_superseded(branch);
            let outcome =
                Walk::new(problem, &mut oracle, &mut statistics, &abort).run(&mut assignment);

            match outcome {
                WalkOutcome::Found(solution) => {
                    shared.try_update(branch);
                    WorkerMessage::Solved {
                        worker_id,
                        branch,
                        solution,
                    }
                }
                WalkOutcome::Exhausted => {
                    statistics.backtracks += 1;
                    WorkerMessage::Exhausted { worker_id, branch }
                }
                WalkOutcome::Aborted => WorkerMessage::Aborted { worker_id, branch },
            }
        };
        let _ = channels.to_coordinator.send(message);
    }

    statistics.oracle = *oracle.statistics();
    let _ = channels.to_coordinator.send(WorkerMessage::Finished {
        worker_id,
        statistics,
    });
}

/// Parallel search as a [`SearchAlgorithm`].
pub struct ParallelSearch {
    config: ParallelConfig,
    statistics: SearchStatistics,
}

impl ParallelSearch {
    pub fn new(config: ParallelConfig) -> Self {
        Self {
            config,
            statistics: SearchStatistics::new(Algorithm::Parallel),
        }
    }
}

impl Default for ParallelSearch {
    fn default() -> Self {
        Self::new(ParallelConfig::default())
    }
}

impl SearchAlgorithm for ParallelSearch {
    fn search(&mut self, problem: &Problem, config: &SearchConfig) -> SearchResult {
        self.reset();
        let parallel = run_parallel_search(problem, config, &self.config);
        self.statistics = parallel.result.statistics.clone();
        parallel.result
    }

    fn statistics(&self) -> SearchStatistics {
        self.statistics.clone()
    }

    fn reset(&mut self) {
        self.statistics = SearchStatistics::new(Algorithm::Parallel);
    }
}
