//! Template-based superstring solver
//!
//! Given a lowercase target string, a set of templates mixing lowercase
//! literals with uppercase symbols, and a finite candidate list per symbol,
//! find an assignment of candidates to symbols under which every template,
//! with its symbols replaced, occurs as a substring of the target.

pub mod logging;
pub mod model;
pub mod oracle;
pub mod output;
pub mod parser;
pub mod search;

pub use model::{Problem, Symbol, Template};
pub use parser::{ParseError, ProblemInput, parse_problem_file, parse_problem_str};
pub use search::{
    Algorithm, ParallelConfig, SearchAlgorithm, SearchConfig, SearchResult, SearchStatus,
    Solution, solve,
};
