//! LRU Cache Metrics
//!
//! Metrics specific to the LRU (Least Recently Used) cache algorithm.

extern crate alloc;

use super::{CacheMetrics, CoreCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::String;

/// LRU-specific metrics (extends CoreCacheMetrics)
///
/// LRU has no state beyond recency order, so only the core counters are kept.
/// The wrapper exists so every algorithm exposes the same `{ core, .. }` shape.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LruCacheMetrics {
    /// Core metrics common to all cache algorithms
    pub core: CoreCacheMetrics,
}

impl LruCacheMetrics {
    /// Creates an empty LruCacheMetrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds another cache's counters into this one
    pub fn merge(&mut self, other: &Self) {
        self.core.merge(&other.core);
    }

    /// Converts LRU metrics to a BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        self.core.to_btreemap()
    }
}

impl CacheMetrics for LruCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU"
    }
}
