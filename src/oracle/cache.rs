//! Memoization of pattern match results
//!
//! Keys are pattern texts. A cache is only valid for the target it was created
//! for, so every cache is tied to exactly one target: local caches live inside
//! an `Oracle`, and a `SharedCache` carries its own target.

use dashmap::DashMap;
use std::collections::HashMap;

/// Concurrent match cache shared by parallel workers solving one problem
#[derive(Debug)]
pub struct SharedCache {
    target: String,
    results: DashMap<String, bool>,
}

impl SharedCache {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            results: DashMap::new(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Storage behind an `Oracle`
#[derive(Debug)]
pub(crate) enum MatchCache<'t> {
    /// No memoization
    Disabled,
    /// Single-threaded map owned by the oracle
    Local(HashMap<String, bool>),
    /// Map shared with other workers
    Shared(&'t DashMap<String, bool>),
}

impl<'t> MatchCache<'t> {
    pub(crate) fn shared(cache: &'t SharedCache) -> Self {
        MatchCache::Shared(&cache.results)
    }

    /// Return the cached result for `key`, computing and storing it if absent.
    ///
    /// The second element is true on a cache hit.
    pub(crate) fn get_or_compute(
        &mut self,
        key: String,
        compute: impl FnOnce() -> bool,
    ) -> (bool, bool) {
        match self {
            MatchCache::Disabled => (compute(), false),
            MatchCache::Local(map) => {
                if let Some(&hit) = map.get(&key) {
                    return (hit, true);
                }
                let result = compute();
                map.insert(key, result);
                (result, false)
            }
            MatchCache::Shared(map) => {
                if let Some(hit) = map.get(&key) {
                    return (*hit.value(), true);
                }
                let result = compute();
                // Another worker may have raced us; both computed the same value
                let stored = *map.entry(key).or_insert(result).value();
                (stored, false)
            }
        }
    }

    pub(crate) fn is_enabled(&self) -> bool {
        !matches!(self, MatchCache::Disabled)
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            MatchCache::Disabled => 0,
            MatchCache::Local(map) => map.len(),
            MatchCache::Shared(map) => map.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_local_cache_computes_once() {
        let mut cache = MatchCache::Local(HashMap::new());
        let calls = Cell::new(0);

        let compute = || {
            calls.set(calls.get() + 1);
            true
        };
        assert_eq!(cache.get_or_compute("ab*".to_string(), compute), (true, false));
        assert_eq!(
            cache.get_or_compute("ab*".to_string(), || unreachable!()),
            (true, true)
        );
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_disabled_cache_always_computes() {
        let mut cache = MatchCache::Disabled;
        let calls = Cell::new(0);

        for _ in 0..3 {
            let (result, hit) = cache.get_or_compute("x".to_string(), || {
                calls.set(calls.get() + 1);
                false
            });
            assert!(!result);
            assert!(!hit);
        }
        assert_eq!(calls.get(), 3);
        assert!(!cache.is_enabled());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_shared_cache_visible_across_handles() {
        let shared = SharedCache::new("catdog");
        let mut first = MatchCache::shared(&shared);
        let mut second = MatchCache::shared(&shared);

        assert_eq!(first.get_or_compute("cat".to_string(), || true), (true, false));
        assert_eq!(
            second.get_or_compute("cat".to_string(), || unreachable!()),
            (true, true)
        );
        assert_eq!(shared.len(), 1);
        assert_eq!(shared.target(), "catdog");
    }
}
