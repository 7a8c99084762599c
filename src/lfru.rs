//! Least Frequently Recently Used (LFRU) Cache Implementation.
//!
//! LFRU evicts by access count first and by recency second. Among the entries
//! with the lowest count, the one that has gone longest without an access is
//! evicted.
//!
//! # Algorithm
//!
//! Entries are grouped into buckets keyed by exact access count. Each bucket
//! is a recency list:
//!
//! ```text
//!   count 1: [ d (LRU) .. e (MRU) ]   <- eviction candidate is d
//!   count 2: [ b .. a ]
//!   count 5: [ c ]
//! ```
//!
//! - A new key gets count 1 and is linked at the most recently used end of
//!   bucket 1
//! - An access increments the count, unlinks the entry from its bucket and
//!   links it at the most recently used end of the next bucket. A bucket
//!   left empty is dropped
//! - Eviction takes the least recently used entry of the lowest bucket
//!
//! Buckets live in an ordered map, so the lowest bucket is found in O(log n).
//! Only non-empty buckets are kept.
//!
//! # Compared to LFU
//!
//! [`LfuCache`](crate::LfuCache) breaks count ties by insertion order. LFRU
//! breaks them by last access, so an old entry that was just touched survives
//! a newer entry with the same count that has not been.

extern crate alloc;

use crate::arena::SlotId;
use crate::buckets::FrequencyBuckets;
use crate::config::LfruCacheConfig;
use crate::entry::{CacheEntry, Displaced};
use crate::error::CacheError;
use crate::list::Nodes;
use crate::meta::LfruMeta;
use crate::metrics::{CacheMetrics, LfruCacheMetrics};
use crate::traits::BoundedCache;
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

type LfruEntry<K, V> = CacheEntry<K, V, LfruMeta>;

/// Internal LFRU segment containing the actual cache algorithm.
///
/// This is shared between `LfruCache` (single-threaded) and
/// `ConcurrentLfruCache` (multi-threaded).
pub(crate) struct LfruSegment<K, V, S = DefaultHashBuilder> {
    config: LfruCacheConfig,
    map: HashMap<K, SlotId, S>,
    nodes: Nodes<LfruEntry<K, V>>,
    buckets: FrequencyBuckets,
    metrics: LfruCacheMetrics,
}

impl<K: Hash + Eq, V, S: BuildHasher> LfruSegment<K, V, S> {
    /// Builds a segment from an already validated configuration.
    pub(crate) fn init(config: LfruCacheConfig, hash_builder: S) -> Self {
        LfruSegment {
            config,
            map: HashMap::with_capacity_and_hasher(config.index_capacity(), hash_builder),
            nodes: Nodes::with_capacity(config.index_capacity()),
            buckets: FrequencyBuckets::new(),
            metrics: LfruCacheMetrics::new(),
        }
    }

    #[inline]
    pub(crate) fn cap(&self) -> NonZeroUsize {
        self.config.capacity
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub(crate) fn metrics(&self) -> &LfruCacheMetrics {
        &self.metrics
    }

    fn entry(&self, id: SlotId) -> Option<&LfruEntry<K, V>> {
        self.nodes.get(id).map(|node| node.get_value())
    }

    /// Promotes the entry in `id` to the next bucket.
    fn touch(&mut self, id: SlotId) -> Option<&mut LfruEntry<K, V>> {
        let meta = &mut self.nodes.get_mut(id)?.get_value_mut().metadata;
        let from = meta.frequency;
        let to = meta.increment();
        self.buckets.promote(&mut self.nodes, id, from, to);
        self.metrics.record_frequency_increment();
        self.metrics
            .update_active_frequency_buckets(self.buckets.len());
        self.nodes.get_mut(id).map(|node| node.get_value_mut())
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_mut(key).map(|v| &*v)
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.map.get(key).copied() {
            Some(id) => {
                self.metrics.core.record_hit();
                self.touch(id).map(|e| &mut e.value)
            }
            None => {
                self.metrics.core.record_miss();
                None
            }
        }
    }

    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = *self.map.get(key)?;
        self.entry(id).map(|e| &e.value)
    }

    pub(crate) fn frequency<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = *self.map.get(key)?;
        self.entry(id).map(|e| e.metadata.frequency)
    }

    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<Displaced<K, V>>
    where
        K: Clone,
    {
        if let Some(&id) = self.map.get(&key) {
            self.metrics.core.record_update();
            let entry = self.touch(id)?;
            return Some(Displaced::Replaced(key, entry.replace_value(value)));
        }

        let mut evicted = None;
        if self.map.len() >= self.cap().get() {
            if let Some((old_key, old_value)) = self.pop_lowest() {
                self.metrics.core.record_eviction();
                log::trace!("lfru segment evicted from its lowest frequency bucket");
                evicted = Some(Displaced::Evicted(old_key, old_value));
            }
        }

        let meta = LfruMeta::default();
        let id = self.buckets.add(
            &mut self.nodes,
            meta.frequency,
            CacheEntry::with_metadata(key.clone(), value, meta),
        );
        self.map.insert(key, id);
        self.metrics.core.record_insertion();
        self.metrics
            .update_active_frequency_buckets(self.buckets.len());
        evicted
    }

    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.map.remove(key)?;
        let frequency = self.entry(id)?.metadata.frequency;
        let entry = self.buckets.remove(&mut self.nodes, id, frequency)?;
        self.metrics.core.record_removal();
        self.metrics
            .update_active_frequency_buckets(self.buckets.len());
        Some(entry.into_pair())
    }

    fn pop_lowest(&mut self) -> Option<(K, V)> {
        let entry = self.buckets.pop_lowest(&mut self.nodes)?;
        self.map.remove(&entry.key);
        self.metrics
            .update_active_frequency_buckets(self.buckets.len());
        Some(entry.into_pair())
    }

    /// Removes the eviction candidate as an explicit removal.
    pub(crate) fn pop(&mut self) -> Option<(K, V)> {
        let pair = self.pop_lowest()?;
        self.metrics.core.record_removal();
        Some(pair)
    }

    pub(crate) fn peek_eviction_candidate(&self) -> Option<(&K, &V)> {
        let entry = self.entry(self.buckets.candidate()?)?;
        Some((&entry.key, &entry.value))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.buckets
            .iter(&self.nodes)
            .map(|e| (&e.key, &e.value))
    }

    pub(crate) fn clear(&mut self) {
        log::trace!("clearing lfru segment with {} entries", self.map.len());
        self.map.clear();
        self.buckets.clear();
        self.nodes.clear();
        self.metrics.update_active_frequency_buckets(0);
    }
}

impl<K, V, S> core::fmt::Debug for LfruSegment<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LfruSegment")
            .field("capacity", &self.config.capacity)
            .field("len", &self.nodes.len())
            .field("buckets", &self.buckets.len())
            .finish()
    }
}

/// An implementation of a Least Frequently Recently Used (LFRU) cache.
///
/// # Examples
///
/// ```
/// use lfru_cache::LfruCache;
/// use core::num::NonZeroUsize;
///
/// let mut cache = LfruCache::new(NonZeroUsize::new(2).unwrap());
///
/// cache.put("a", 1);
/// cache.put("b", 2);
/// cache.get(&"b");
/// cache.get(&"a");
///
/// // Both have count 2; "b" was accessed less recently
/// cache.put("c", 3);
/// assert!(!cache.contains_key(&"b"));
/// assert!(cache.contains_key(&"a"));
/// ```
#[derive(Debug)]
pub struct LfruCache<K, V, S = DefaultHashBuilder> {
    segment: LfruSegment<K, V, S>,
}

impl<K: Hash + Eq, V> LfruCache<K, V, DefaultHashBuilder> {
    /// Creates a new LFRU cache holding at most `cap` entries.
    pub fn new(cap: NonZeroUsize) -> Self {
        Self::with_hasher(cap, DefaultHashBuilder::default())
    }

    /// Creates a new LFRU cache, rejecting a zero capacity.
    pub fn try_new(cap: usize) -> Result<Self, CacheError> {
        Self::init(LfruCacheConfig::try_new(cap)?, None)
    }

    /// Creates a new LFRU cache from a configuration with an optional hasher.
    pub fn init(
        config: LfruCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, CacheError> {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LfruCache<K, V, S> {
    /// Creates a new LFRU cache with the specified capacity and hash builder.
    pub fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        Self {
            segment: LfruSegment::init(LfruCacheConfig::new(cap), hash_builder),
        }
    }

    /// Creates a new LFRU cache from a configuration and a custom hash builder.
    pub fn init_with_hasher(config: LfruCacheConfig, hash_builder: S) -> Result<Self, CacheError> {
        config.validate()?;
        log::debug!("creating lfru cache with capacity {}", config.capacity);
        Ok(Self {
            segment: LfruSegment::init(config, hash_builder),
        })
    }

    /// Maximum number of entries.
    #[inline]
    pub fn cap(&self) -> NonZeroUsize {
        self.segment.cap()
    }

    /// Current number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.len()
    }

    /// Returns `true` if the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.is_empty()
    }

    /// Returns a reference to the value for `key`, promoting it to the next
    /// frequency bucket.
    #[inline]
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get(key)
    }

    /// Mutable variant of [`get`](Self::get).
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get_mut(key)
    }

    /// Returns the value for `key` without counting an access.
    #[inline]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.peek(key)
    }

    /// Current access count of `key`, without counting an access.
    #[inline]
    pub fn frequency<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.frequency(key)
    }

    /// Returns `true` if `key` is present. Does not count as an access.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.contains_key(key)
    }

    /// Returns `true` if any entry holds `value`. Runs in O(n).
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.segment.iter().any(|(_, v)| v == value)
    }

    /// Removes `key` and returns its value. Its count and recency are
    /// discarded.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes and returns the eviction candidate.
    #[inline]
    pub fn pop(&mut self) -> Option<(K, V)> {
        self.segment.pop()
    }

    /// Returns the entry the next insert of a new key would evict.
    #[inline]
    pub fn peek_eviction_candidate(&self) -> Option<(&K, &V)> {
        self.segment.peek_eviction_candidate()
    }

    /// Removes every entry.
    #[inline]
    pub fn clear(&mut self) {
        self.segment.clear()
    }

    /// Iterates in eviction order: lowest bucket first, each bucket from least
    /// to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.segment.iter()
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LfruCache<K, V, S> {
    /// Stores `value` under `key`, returning the value it replaced.
    ///
    /// Replacing a value counts as an access.
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        self.segment.insert(key, value)?.replaced_value()
    }

    /// Stores `value` under `key`, returning whichever pair left the cache.
    #[inline]
    pub fn push(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.segment.insert(key, value).map(Displaced::into_pair)
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> Extend<(K, V)> for LfruCache<K, V, S> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> BoundedCache<K, V> for LfruCache<K, V, S> {
    fn get(&mut self, key: &K) -> Option<&V> {
        LfruCache::get(self, key)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        LfruCache::put(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        LfruCache::remove(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        LfruCache::contains_key(self, key)
    }

    fn len(&self) -> usize {
        LfruCache::len(self)
    }

    fn capacity(&self) -> usize {
        self.cap().get()
    }

    fn clear(&mut self) {
        LfruCache::clear(self)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> CacheMetrics for LfruCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.segment.metrics().algorithm_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn make_lfru<K: Hash + Eq, V>(cap: usize) -> LfruCache<K, V> {
        LfruCache::new(NonZeroUsize::new(cap).unwrap())
    }

    #[test]
    fn test_lfru_evicts_lowest_frequency() {
        let mut cache = make_lfru(3);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);
        cache.get(&"a");
        cache.get(&"b");
        cache.put("d", 4);
        assert!(!cache.contains_key(&"c"));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_lfru_tie_breaks_by_recency() {
        let mut cache = make_lfru(2);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.get(&"b");
        cache.get(&"a");
        cache.put("c", 3);
        assert!(!cache.contains_key(&"b"));
        assert!(cache.contains_key(&"a"));
        assert!(cache.contains_key(&"c"));
    }

    #[test]
    fn test_lfru_new_entries_tie_by_recency() {
        let mut cache = make_lfru(3);
        cache.put(1, ());
        cache.put(2, ());
        cache.put(3, ());
        // all at count 1, 1 is least recently used
        assert_eq!(cache.peek_eviction_candidate().map(|(k, _)| *k), Some(1));
        cache.put(4, ());
        assert!(!cache.contains_key(&1));
    }

    #[test]
    fn test_lfru_promotion_drops_empty_buckets() {
        let mut cache = make_lfru(2);
        cache.put("a", 1);
        cache.get(&"a");
        cache.get(&"a");
        assert_eq!(cache.frequency(&"a"), Some(3));
        assert_eq!(cache.metrics()["active_frequency_buckets"], 1.0);
        cache.put("b", 2);
        assert_eq!(cache.metrics()["active_frequency_buckets"], 2.0);
    }

    #[test]
    fn test_lfru_update_counts_as_access() {
        let mut cache = make_lfru(2);
        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.put("a", 5), Some(1));
        cache.put("c", 3);
        assert!(!cache.contains_key(&"b"));
        assert_eq!(cache.get(&"a"), Some(&5));
    }

    #[test]
    fn test_lfru_remove_resets_state() {
        let mut cache = make_lfru(2);
        cache.put("a", 1);
        cache.get(&"a");
        cache.get(&"a");
        assert_eq!(cache.remove(&"a"), Some(1));
        assert_eq!(cache.remove(&"missing"), None);
        cache.put("a", 2);
        assert_eq!(cache.frequency(&"a"), Some(1));
        assert_eq!(cache.metrics()["active_frequency_buckets"], 1.0);
    }

    #[test]
    fn test_lfru_iter_order() {
        let mut cache = make_lfru(4);
        cache.extend([("a", 1), ("b", 2), ("c", 3), ("d", 4)]);
        cache.get(&"c");
        cache.get(&"a");
        cache.get(&"a");
        let keys: Vec<_> = cache.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["b", "d", "c", "a"]);
    }

    #[test]
    fn test_lfru_pop_and_clear() {
        let mut cache = make_lfru(3);
        cache.put(1, 'x');
        cache.put(2, 'y');
        cache.get(&1);
        assert_eq!(cache.pop(), Some((2, 'y')));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.pop(), None);
        assert_eq!(cache.peek_eviction_candidate(), None);
    }

    #[test]
    fn test_lfru_get_mut() {
        let mut cache = make_lfru(1);
        cache.put("a", 1);
        *cache.get_mut(&"a").unwrap() = 7;
        assert_eq!(cache.peek(&"a"), Some(&7));
        assert_eq!(cache.frequency(&"a"), Some(2));
        assert!(cache.contains_value(&7));
    }

    #[test]
    fn test_lfru_metrics() {
        let mut cache = make_lfru(1);
        cache.put("a", 1);
        cache.get(&"a");
        cache.put("b", 2);
        let metrics = cache.metrics();
        assert_eq!(metrics["evictions"], 1.0);
        assert_eq!(metrics["total_frequency_increments"], 1.0);
        assert_eq!(cache.algorithm_name(), "LFRU");
    }
}
