//! Pool and queue sizing.

use crate::config::PixfetchConfig;

/// Worker counts for both stages and the per-worker queue allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSizes {
    pub fetch_workers: usize,
    pub transform_workers: usize,
    pub queue_capacity_per_worker: usize,
}

impl PoolSizes {
    /// Scales each pool by `parallelism` using the configured multipliers.
    /// Every count is at least 1.
    pub fn from_config(cfg: &PixfetchConfig, parallelism: usize) -> Self {
        let parallelism = parallelism.max(1);
        Self {
            fetch_workers: parallelism.saturating_mul(cfg.fetch_workers_per_cpu).max(1),
            transform_workers: parallelism.saturating_mul(cfg.transform_workers_per_cpu).max(1),
            queue_capacity_per_worker: cfg.queue_capacity_per_worker.max(1),
        }
    }

    /// [`from_config`](Self::from_config) with the host's available parallelism.
    pub fn detect(cfg: &PixfetchConfig) -> Self {
        let parallelism = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::from_config(cfg, parallelism)
    }

    /// Replaces worker counts given explicitly (e.g. on the command line).
    pub fn with_overrides(mut self, fetch: Option<usize>, transform: Option<usize>) -> Self {
        if let Some(n) = fetch {
            self.fetch_workers = n.max(1);
        }
        if let Some(n) = transform {
            self.transform_workers = n.max(1);
        }
        self
    }

    /// Capacity of the URL queue, proportional to the fetch pool it feeds.
    pub fn fetch_queue_capacity(&self) -> usize {
        self.fetch_workers.saturating_mul(self.queue_capacity_per_worker).max(1)
    }

    /// Capacity of the stored-file queue, proportional to the transform pool.
    pub fn transform_queue_capacity(&self) -> usize {
        self.transform_workers.saturating_mul(self.queue_capacity_per_worker).max(1)
    }
}
