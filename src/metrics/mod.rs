//! Cache Metrics System
//!
//! Provides a small metrics system for the cache algorithms using BTreeMap-based
//! reporting. Each cache algorithm tracks its own specific metrics while
//! implementing the common [`CacheMetrics`] trait.
//!
//! BTreeMap is used instead of HashMap so that metrics always appear in a
//! consistent order, which keeps test assertions and benchmark output stable.
//!
//! Metrics are bookkeeping only. Reading them never touches eviction order.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

pub mod lfru;
pub mod lfu;
pub mod lru;

pub use lfru::LfruCacheMetrics;
pub use lfu::LfuCacheMetrics;
pub use lru::LruCacheMetrics;

/// Common metrics tracked by all cache algorithms
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoreCacheMetrics {
    /// Total number of lookups (`get`, `get_mut`) made to the cache
    pub requests: u64,

    /// Number of lookups that found their key
    pub cache_hits: u64,

    /// Number of new keys written to the cache
    pub insertions: u64,

    /// Number of writes that replaced the value of an existing key
    pub updates: u64,

    /// Number of entries evicted to make room for a new key
    pub evictions: u64,

    /// Number of entries removed explicitly by the caller
    pub removals: u64,
}

impl CoreCacheMetrics {
    /// Creates an empty set of counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a lookup that found its key
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a lookup that did not find its key
    ///
    /// Misses are derived as `requests - cache_hits`.
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records an entry leaving the cache because of capacity pressure
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Records a new key entering the cache
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records a value replacement for a key already present
    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    /// Records an explicit removal
    pub fn record_removal(&mut self) {
        self.removals += 1;
    }

    /// Number of lookups that missed
    pub fn cache_misses(&self) -> u64 {
        self.requests - self.cache_hits
    }

    /// Calculates the cache hit rate
    ///
    /// # Returns
    /// A value between 0.0 and 1.0, or 0.0 if no requests have been made
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Calculates the cache miss rate
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_misses() as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Adds another set of counters into this one.
    ///
    /// Useful for combining the counters of several caches.
    pub fn merge(&mut self, other: &Self) {
        self.requests += other.requests;
        self.cache_hits += other.cache_hits;
        self.insertions += other.insertions;
        self.updates += other.updates;
        self.evictions += other.evictions;
        self.removals += other.removals;
    }

    /// Convert core metrics to BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses() as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("removals".to_string(), self.removals as f64);
        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("updates".to_string(), self.updates as f64);

        // Rates (0.0 to 1.0)
        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        if self.requests > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.requests as f64,
            );
        }

        metrics
    }
}

/// Trait that all cache algorithms implement for metrics reporting
///
/// The trait uses BTreeMap to ensure deterministic ordering of metrics.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order
    ///
    /// The returned map contains both core metrics and any
    /// algorithm-specific metrics. Keys are sorted alphabetically.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification (e.g. "LRU", "LFU", "LFRU")
    fn algorithm_name(&self) -> &'static str;
}
