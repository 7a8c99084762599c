//! LFU Cache Metrics
//!
//! Metrics specific to the LFU (Least Frequently Used) cache algorithm.

extern crate alloc;

use super::{CacheMetrics, CoreCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// LFU-specific metrics (extends CoreCacheMetrics)
///
/// LFU tracks the access count of each entry, so these metrics focus on how
/// often counts are bumped and how high they climb.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LfuCacheMetrics {
    /// Core metrics common to all cache algorithms
    pub core: CoreCacheMetrics,

    /// Highest access count observed on any entry
    pub max_frequency: u64,

    /// Total number of frequency increments (every access of a live key)
    pub total_frequency_increments: u64,
}

impl LfuCacheMetrics {
    /// Creates an empty LfuCacheMetrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a frequency increment
    ///
    /// # Arguments
    /// * `new_frequency` - The count of the accessed entry after the increment
    pub fn record_frequency_increment(&mut self, new_frequency: u64) {
        self.total_frequency_increments += 1;
        if new_frequency > self.max_frequency {
            self.max_frequency = new_frequency;
        }
    }

    /// Average number of increments per hit
    pub fn average_frequency(&self) -> f64 {
        if self.core.cache_hits > 0 {
            self.total_frequency_increments as f64 / self.core.cache_hits as f64
        } else {
            0.0
        }
    }

    /// Adds another cache's counters into this one
    pub fn merge(&mut self, other: &Self) {
        self.core.merge(&other.core);
        self.total_frequency_increments += other.total_frequency_increments;
        self.max_frequency = self.max_frequency.max(other.max_frequency);
    }

    /// Converts LFU metrics to a BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();

        metrics.insert("max_frequency".to_string(), self.max_frequency as f64);
        metrics.insert(
            "total_frequency_increments".to_string(),
            self.total_frequency_increments as f64,
        );
        metrics.insert("average_frequency".to_string(), self.average_frequency());

        metrics
    }
}

impl CacheMetrics for LfuCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LFU"
    }
}
