//! Explicit metrics context injected into the relationship manager.
//!
//! Counters are atomics so one context can be shared through an `Arc` between
//! the manager and whoever reports on it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Counters describing the manager's work.
#[derive(Debug, Default)]
pub struct LinkMetrics {
    classify_cache_hits: AtomicU64,
    classify_cache_misses: AtomicU64,
    paths_indexed: AtomicU64,
    paths_removed: AtomicU64,
    configuration_rebuilds: AtomicU64,
    last_rebuild_micros: AtomicU64,
    change_batches: AtomicU64,
    affected_paths_emitted: AtomicU64,
}

impl LinkMetrics {
    /// Create a zeroed context.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_cache_hit(&self) {
        self.classify_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cache_miss(&self) {
        self.classify_cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_indexed(&self, count: usize) {
        self.paths_indexed.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_removed(&self, count: usize) {
        self.paths_removed.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_rebuild(&self, elapsed: Duration) {
        self.configuration_rebuilds.fetch_add(1, Ordering::Relaxed);
        self.last_rebuild_micros
            .store(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_change_batch(&self, affected: usize) {
        self.change_batches.fetch_add(1, Ordering::Relaxed);
        self.affected_paths_emitted
            .fetch_add(affected as u64, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            classify_cache_hits: self.classify_cache_hits.load(Ordering::Relaxed),
            classify_cache_misses: self.classify_cache_misses.load(Ordering::Relaxed),
            paths_indexed: self.paths_indexed.load(Ordering::Relaxed),
            paths_removed: self.paths_removed.load(Ordering::Relaxed),
            configuration_rebuilds: self.configuration_rebuilds.load(Ordering::Relaxed),
            last_rebuild_micros: self.last_rebuild_micros.load(Ordering::Relaxed),
            change_batches: self.change_batches.load(Ordering::Relaxed),
            affected_paths_emitted: self.affected_paths_emitted.load(Ordering::Relaxed),
        }
    }
}

/// Serializable copy of [`LinkMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub classify_cache_hits: u64,
    pub classify_cache_misses: u64,
    pub paths_indexed: u64,
    pub paths_removed: u64,
    pub configuration_rebuilds: u64,
    pub last_rebuild_micros: u64,
    pub change_batches: u64,
    pub affected_paths_emitted: u64,
}

impl MetricsSnapshot {
    /// Share of classifications answered from cache.
    pub fn cache_hit_ratio(&self) -> f64 {
        let total = self.classify_cache_hits + self.classify_cache_misses;
        if total == 0 {
            return 0.0;
        }
        self.classify_cache_hits as f64 / total as f64
    }
}
