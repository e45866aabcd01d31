//! Cache Statistics Module
//!
//! Tracks cache activity (hits, misses, expirations, rejected writes) and memory usage.

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time view of cache activity and memory usage.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of entries removed because their TTL elapsed
    pub expired: u64,
    /// Number of writes refused by admission control
    pub rejected: u64,
    /// Current number of entries in the cache, expired ones included until reaped
    pub total_entries: usize,
    /// Sum of the estimated sizes of all stored entries
    pub used_bytes: u64,
    /// Current admission ceiling
    pub max_bytes: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Memory Usage ==
    /// Fraction of the budget in use. Can exceed 1.0 after the budget is lowered.
    pub fn memory_usage(&self) -> f64 {
        if self.max_bytes == 0 {
            0.0
        } else {
            self.used_bytes as f64 / self.max_bytes as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Adds `count` expired removals.
    pub fn record_expired(&mut self, count: usize) {
        self.expired += count as u64;
    }

    pub fn record_rejection(&mut self) {
        self.rejected += 1;
    }
}
