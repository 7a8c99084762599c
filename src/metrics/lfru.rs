//! LFRU Cache Metrics
//!
//! Metrics specific to the LFRU (Least Frequently Recently Used) cache algorithm.

extern crate alloc;

use super::{CacheMetrics, CoreCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// LFRU-specific metrics (extends CoreCacheMetrics)
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LfruCacheMetrics {
    /// Core metrics common to all cache algorithms
    pub core: CoreCacheMetrics,

    /// Total number of bucket promotions (every access of a live key)
    pub total_frequency_increments: u64,

    /// Number of frequency buckets currently in use
    pub active_frequency_buckets: u64,
}

impl LfruCacheMetrics {
    /// Creates an empty LfruCacheMetrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a promotion of an entry into the next frequency bucket
    pub fn record_frequency_increment(&mut self) {
        self.total_frequency_increments += 1;
    }

    /// Updates the count of non-empty frequency buckets
    pub fn update_active_frequency_buckets(&mut self, buckets: usize) {
        self.active_frequency_buckets = buckets as u64;
    }

    /// Adds another cache's counters into this one
    ///
    /// Bucket counts are summed, giving the number of buckets across both caches.
    pub fn merge(&mut self, other: &Self) {
        self.core.merge(&other.core);
        self.total_frequency_increments += other.total_frequency_increments;
        self.active_frequency_buckets += other.active_frequency_buckets;
    }

    /// Converts LFRU metrics to a BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();

        metrics.insert(
            "total_frequency_increments".to_string(),
            self.total_frequency_increments as f64,
        );
        metrics.insert(
            "active_frequency_buckets".to_string(),
            self.active_frequency_buckets as f64,
        );

        metrics
    }
}

impl CacheMetrics for LfruCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LFRU"
    }
}
