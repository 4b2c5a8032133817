//! Pattern oracle: does a (partial) assignment keep every template inside the target?
//!
//! Each template is substituted into a [`Pattern`] (unassigned symbols become
//! wildcard runs) and matched against the target. Results are memoized by
//! pattern text for the lifetime of the oracle.

pub mod cache;
pub mod pattern;

pub use cache::SharedCache;
pub use pattern::{Pattern, Segment, WILDCARD_MARKER};

use cache::MatchCache;
use log::trace;
use std::collections::HashMap;

use crate::model::Template;
use crate::search::assignment::Assignment;

/// Counters collected by an oracle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OracleStatistics {
    /// Calls to [`Oracle::satisfies`]
    pub calls: u64,
    /// Individual template patterns evaluated
    pub template_checks: u64,
    /// Pattern results served from the cache
    pub cache_hits: u64,
    /// Pattern results computed by the matcher
    pub cache_misses: u64,
}

impl OracleStatistics {
    /// Fraction of template checks answered by the cache (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        if self.template_checks == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.template_checks as f64
        }
    }

    pub fn merge(&mut self, other: &OracleStatistics) {
        self.calls += other.calls;
        self.template_checks += other.template_checks;
        self.cache_hits += other.cache_hits;
        self.cache_misses += other.cache_misses;
    }
}

/// Memoizing matcher bound to one target string
#[derive(Debug)]
pub struct Oracle<'t> {
    target: &'t str,
    cache: MatchCache<'t>,
    statistics: OracleStatistics,
}

impl<'t> Oracle<'t> {
    /// Oracle with its own private cache
    pub fn new(target: &'t str) -> Self {
        Self {
            target,
            cache: MatchCache::Local(HashMap::new()),
            statistics: OracleStatistics::default(),
        }
    }

    /// Oracle without memoization
    pub fn uncached(target: &'t str) -> Self {
        Self {
            target,
            cache: MatchCache::Disabled,
            statistics: OracleStatistics::default(),
        }
    }

    /// Oracle backed by a cache shared with other workers; the target is the
    /// one the shared cache was created for.
    pub fn shared(cache: &'t SharedCache) -> Self {
        Self {
            target: cache.target(),
            cache: MatchCache::shared(cache),
            statistics: OracleStatistics::default(),
        }
    }

    pub fn target(&self) -> &str {
        self.target
    }

    /// True if every template, substituted with `assignment`, occurs in the
    /// target. Stops at the first template that does not.
    pub fn satisfies(&mut self, templates: &[Template], assignment: &Assignment) -> bool {
        self.statistics.calls += 1;
        templates.iter().all(|template| {
            let pattern = Pattern::substitute(template, assignment);
            self.matches(&pattern)
        })
    }

    /// Match one pattern, going through the cache
    pub fn matches(&mut self, pattern: &Pattern) -> bool {
        self.statistics.template_checks += 1;
        let target = self.target;
        let (result, hit) = self
            .cache
            .get_or_compute(pattern.key(), || pattern.matches(target));

        if hit {
            self.statistics.cache_hits += 1;
        } else {
            self.statistics.cache_misses += 1;
        }
        trace!("pattern {} -> {} (cached: {})", pattern, result, hit);
        result
    }

    pub fn statistics(&self) -> &OracleStatistics {
        &self.statistics
    }

    pub fn is_caching(&self) -> bool {
        self.cache.is_enabled()
    }

    /// Number of distinct patterns currently memoized
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}
