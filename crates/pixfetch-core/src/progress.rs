//! Run-wide item counters.
//!
//! Owned by the coordinator and shared with workers through an `Arc`; every
//! update is a single atomic increment, read once when the run completes.

use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct ProgressCounter {
    fetched: AtomicUsize,
    fetch_failed: AtomicUsize,
    transformed: AtomicUsize,
    transform_failed: AtomicUsize,
}

/// Point-in-time copy of a [`ProgressCounter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Images downloaded and handed to the transform stage.
    pub fetched: usize,
    pub fetch_failed: usize,
    pub transformed: usize,
    pub transform_failed: usize,
}

impl ProgressCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetched(&self) {
        self.fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_failed(&self) {
        self.fetch_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transformed(&self) {
        self.transformed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transform_failed(&self) {
        self.transform_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fetched(&self) -> usize {
        self.fetched.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            fetched: self.fetched.load(Ordering::Relaxed),
            fetch_failed: self.fetch_failed.load(Ordering::Relaxed),
            transformed: self.transformed.load(Ordering::Relaxed),
            transform_failed: self.transform_failed.load(Ordering::Relaxed),
        }
    }
}
