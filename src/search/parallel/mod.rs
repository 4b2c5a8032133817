//! Parallel search execution over worker threads.
//!
//! # Architecture
//!
//! The parallel search system consists of:
//! - A **coordinator** that checks the root state, queues one branch per
//!   candidate of the first symbol, and aggregates results
//! - Multiple **workers** that pull branches and run the backtracking walk
//! - A **channel system** for branch distribution and result reporting
//! - **Shared state** holding the lowest solved branch and a stop flag, plus a
//!   concurrent memo cache
//!
//! A worker abandons its branch as soon as a lower-numbered branch is solved,
//! so the reported solution is the one sequential search would report.
//!
//! # Example
//!
//! ```ignore
//! use superstring::search::parallel::{ParallelConfig, run_parallel_search};
//!
//! let config = ParallelConfig::default().with_workers(4);
//! let result = run_parallel_search(&problem, &SearchConfig::default(), &config);
//! ```

pub mod channel;
pub mod config;
pub mod coordinator;

pub use config::ParallelConfig;
pub use coordinator::{ParallelResult, ParallelSearch, run_parallel_search};
