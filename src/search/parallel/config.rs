//! Configuration for parallel search execution.

/// Configuration for parallel search execution.
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Number of worker threads to spawn (capped at the number of branches).
    pub num_workers: usize,
    /// Whether workers share one memo cache instead of keeping their own.
    pub share_cache: bool,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
            share_cache: true,
        }
    }
}

impl ParallelConfig {
    /// Set the number of workers (at least one).
    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers.max(1);
        self
    }

    /// Set the number of workers from an Option, keeping the default on `None`.
    pub fn with_workers_option(self, num_workers: Option<usize>) -> Self {
        match num_workers {
            Some(n) => self.with_workers(n),
            None => self,
        }
    }

    /// Enable or disable the shared memo cache.
    pub fn with_shared_cache(mut self, share_cache: bool) -> Self {
        self.share_cache = share_cache;
        self
    }

    /// Workers actually spawned for `num_branches` branches.
    pub fn effective_workers(&self, num_branches: usize) -> usize {
        self.num_workers.min(num_branches).max(1)
    }
}
