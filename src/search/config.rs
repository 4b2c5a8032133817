//! Configuration types for search algorithms

use std::time::Duration;

/// Search algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Sequential depth-first backtracking
    #[default]
    Backtrack,
    /// Backtracking with the first symbol's candidates spread over worker threads
    Parallel,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Backtrack => write!(f, "backtrack"),
            Algorithm::Parallel => write!(f, "parallel"),
        }
    }
}

impl std::str::FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "backtrack" | "backtracking" | "sequential" | "seq" => Ok(Algorithm::Backtrack),
            "parallel" | "par" => Ok(Algorithm::Parallel),
            _ => Err(format!(
                "Unknown algorithm: '{}'. Valid options: backtrack, parallel",
                s
            )),
        }
    }
}

/// Main search configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Search algorithm to use
    pub algorithm: Algorithm,
    /// Overall timeout; checked whenever the search moves to a new symbol
    pub timeout: Option<Duration>,
    /// Memoize pattern match results
    pub use_cache: bool,
    /// Verbose output during search
    pub verbose: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            timeout: None,
            use_cache: true,
            verbose: false,
        }
    }
}

impl SearchConfig {
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_timeout_option(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!(
            "backtrack".parse::<Algorithm>().unwrap(),
            Algorithm::Backtrack
        );
        assert_eq!("seq".parse::<Algorithm>().unwrap(), Algorithm::Backtrack);
        assert_eq!(
            "Parallel".parse::<Algorithm>().unwrap(),
            Algorithm::Parallel
        );
        assert!("stochastic".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_algorithm_display() {
        assert_eq!(format!("{}", Algorithm::Backtrack), "backtrack");
        assert_eq!(format!("{}", Algorithm::Parallel), "parallel");
    }

    #[test]
    fn test_search_config_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.algorithm, Algorithm::Backtrack);
        assert!(config.timeout.is_none());
        assert!(config.use_cache);
        assert!(!config.verbose);
    }

    #[test]
    fn test_search_config_builder() {
        let config = SearchConfig::default()
            .with_algorithm(Algorithm::Parallel)
            .with_timeout(Duration::from_secs(5))
            .with_cache(false)
            .with_verbose(true);

        assert_eq!(config.algorithm, Algorithm::Parallel);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert!(!config.use_cache);
        assert!(config.verbose);
    }
}
