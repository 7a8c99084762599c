//! Least Recently Used (LRU) Cache Implementation
//!
//! An LRU cache evicts the entry that has gone longest without being accessed
//! when it must make room for a new key. This implementation provides O(1)
//! time complexity for `get`, `put` and `remove`.
//!
//! # Algorithm
//!
//! Entries sit in a doubly linked list ordered by last access:
//! - New entries are linked at the most recently used end
//! - Every `get`, `get_mut` and `put` of a present key moves it to that end
//! - When a new key arrives at capacity, the entry at the least recently used
//!   end is evicted first, then the new entry is linked
//!
//! A hash map from key to list node gives O(1) lookup. The list nodes live in
//! a slot arena, so a node is addressed by index and never by pointer.
//!
//! # When to Use
//!
//! **Good for:**
//! - General-purpose caching where access patterns exhibit temporal locality
//! - Workloads where recent access predicts near-future access
//!
//! **Not ideal for:**
//! - Scanning patterns where a large set of items is accessed once in sequence
//! - Workloads where long-run popularity matters more than recency (see
//!   [`LfuCache`](crate::LfuCache) and [`LfruCache`](crate::LfruCache))
//!
//! # Thread Safety
//!
//! `LruCache` is not thread-safe. For concurrent access use
//! `ConcurrentLruCache` (requires the `concurrent` feature).

extern crate alloc;

use crate::arena::SlotId;
use crate::config::LruCacheConfig;
use crate::entry::{CacheEntry, Displaced};
use crate::error::CacheError;
use crate::list::{List, Nodes};
use crate::metrics::{CacheMetrics, LruCacheMetrics};
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

/// Internal LRU segment containing the actual cache algorithm.
///
/// This is shared between `LruCache` (single-threaded) and
/// `ConcurrentLruCache` (multi-threaded). All algorithm logic is
/// implemented here to avoid code duplication.
pub(crate) struct LruSegment<K, V, S = DefaultHashBuilder> {
    config: LruCacheConfig,
    list: List,
    nodes: Nodes<CacheEntry<K, V>>,
    map: HashMap<K, SlotId, S>,
    metrics: LruCacheMetrics,
}

impl<K: Hash + Eq, V, S: BuildHasher> LruSegment<K, V, S> {
    /// Builds a segment from an already validated configuration.
    pub(crate) fn init(config: LruCacheConfig, hash_builder: S) -> Self {
        LruSegment {
            config,
            list: List::new(),
            nodes: Nodes::with_capacity(config.index_capacity()),
            map: HashMap::with_capacity_and_hasher(config.index_capacity(), hash_builder),
            metrics: LruCacheMetrics::new(),
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
    pub(crate) fn metrics(&self) -> &LruCacheMetrics {
        &self.metrics
    }

    fn entry(&self, id: SlotId) -> Option<&CacheEntry<K, V>> {
        self.nodes.get(id).map(|node| node.get_value())
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.map.get(key).copied() {
            Some(id) => {
                self.list.move_to_front(&mut self.nodes, id);
                self.metrics.core.record_hit();
                self.entry(id).map(|e| &e.value)
            }
            None => {
                self.metrics.core.record_miss();
                None
            }
        }
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.map.get(key).copied() {
            Some(id) => {
                self.list.move_to_front(&mut self.nodes, id);
                self.metrics.core.record_hit();
                self.nodes
                    .get_mut(id)
                    .map(|node| &mut node.get_value_mut().value)
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
            self.list.move_to_front(&mut self.nodes, id);
            self.metrics.core.record_update();
            let entry = self.nodes.get_mut(id)?.get_value_mut();
            return Some(Displaced::Replaced(key, entry.replace_value(value)));
        }

        let mut evicted = None;
        if self.map.len() >= self.cap().get() {
            if let Some((old_key, old_value)) = self.pop_lru() {
                self.metrics.core.record_eviction();
                log::trace!("lru segment evicted its least recently used entry");
                evicted = Some(Displaced::Evicted(old_key, old_value));
            }
        }

        let id = self
            .list
            .add(&mut self.nodes, CacheEntry::new(key.clone(), value));
        self.map.insert(key, id);
        self.metrics.core.record_insertion();
        evicted
    }

    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.map.remove(key)?;
        let entry = self.list.remove(&mut self.nodes, id)?;
        self.metrics.core.record_removal();
        Some(entry.into_pair())
    }

    fn pop_lru(&mut self) -> Option<(K, V)> {
        let entry = self.list.remove_last(&mut self.nodes)?;
        self.map.remove(&entry.key);
        Some(entry.into_pair())
    }

    /// Removes the eviction candidate as an explicit removal.
    pub(crate) fn pop(&mut self) -> Option<(K, V)> {
        let pair = self.pop_lru()?;
        self.metrics.core.record_removal();
        Some(pair)
    }

    pub(crate) fn peek_eviction_candidate(&self) -> Option<(&K, &V)> {
        let entry = self.entry(self.list.back()?)?;
        Some((&entry.key, &entry.value))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.list.iter_lru(&self.nodes).map(|e| (&e.key, &e.value))
    }

    pub(crate) fn clear(&mut self) {
        log::trace!("clearing lru segment with {} entries", self.map.len());
        self.map.clear();
        self.list.clear();
        self.nodes.clear();
    }
}

impl<K, V, S> core::fmt::Debug for LruSegment<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LruSegment")
            .field("capacity", &self.config.capacity)
            .field("len", &self.list.len())
            .finish()
    }
}

/// An implementation of a Least Recently Used (LRU) cache.
///
/// The cache has a fixed capacity and supports O(1) operations for
/// inserting, retrieving, and updating entries. When the cache reaches capacity,
/// the least recently used entry will be evicted to make room for new entries.
///
/// # Examples
///
/// ```
/// use lfru_cache::LruCache;
/// use core::num::NonZeroUsize;
///
/// let mut cache = LruCache::new(NonZeroUsize::new(2).unwrap());
///
/// cache.put("apple", 1);
/// cache.put("banana", 2);
///
/// // Accessing items updates their recency
/// assert_eq!(cache.get(&"apple"), Some(&1));
///
/// // Adding beyond capacity evicts the least recently used item
/// cache.put("cherry", 3);
/// assert_eq!(cache.get(&"banana"), None);
/// assert_eq!(cache.get(&"apple"), Some(&1));
/// assert_eq!(cache.get(&"cherry"), Some(&3));
/// ```
#[derive(Debug)]
pub struct LruCache<K, V, S = DefaultHashBuilder> {
    segment: LruSegment<K, V, S>,
}

impl<K: Hash + Eq, V> LruCache<K, V, DefaultHashBuilder> {
    /// Creates a new LRU cache holding at most `cap` entries.
    pub fn new(cap: NonZeroUsize) -> Self {
        Self::with_hasher(cap, DefaultHashBuilder::default())
    }

    /// Creates a new LRU cache, rejecting a zero capacity.
    pub fn try_new(cap: usize) -> Result<Self, CacheError> {
        Self::init(LruCacheConfig::try_new(cap)?, None)
    }

    /// Creates a new LRU cache from a configuration with an optional hasher.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidLoadFactor`] when the load factor hint is
    /// outside `(0, 1]`.
    pub fn init(
        config: LruCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, CacheError> {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruCache<K, V, S> {
    /// Creates a new LRU cache with the specified capacity and hash builder.
    pub fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        Self {
            segment: LruSegment::init(LruCacheConfig::new(cap), hash_builder),
        }
    }

    /// Creates a new LRU cache from a configuration and a custom hash builder.
    pub fn init_with_hasher(config: LruCacheConfig, hash_builder: S) -> Result<Self, CacheError> {
        config.validate()?;
        log::debug!("creating lru cache with capacity {}", config.capacity);
        Ok(Self {
            segment: LruSegment::init(config, hash_builder),
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

    /// Returns a reference to the value for `key` and marks it most recently used.
    #[inline]
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get(key)
    }

    /// Returns a mutable reference to the value for `key` and marks it most
    /// recently used.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get_mut(key)
    }

    /// Returns the value for `key` without touching its recency.
    #[inline]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.peek(key)
    }

    /// Returns `true` if `key` is present. Does not touch its recency.
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

    /// Removes `key` and returns its value.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes and returns the least recently used entry.
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

    /// Iterates from the least recently used entry to the most recently used.
    ///
    /// Iteration does not count as an access.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.segment.iter()
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LruCache<K, V, S> {
    /// Stores `value` under `key`, returning the value it replaced.
    ///
    /// If `key` is new and the cache is full, the least recently used entry
    /// is evicted first.
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        self.segment.insert(key, value)?.replaced_value()
    }

    /// Stores `value` under `key`, returning whichever pair left the cache.
    ///
    /// That is the passed key with its old value when `key` was present, or
    /// the evicted entry when making room for a new key.
    #[inline]
    pub fn push(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.segment.insert(key, value).map(Displaced::into_pair)
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> Extend<(K, V)> for LruCache<K, V, S> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> BoundedCache<K, V> for LruCache<K, V, S> {
    fn get(&mut self, key: &K) -> Option<&V> {
        LruCache::get(self, key)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        LruCache::put(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        LruCache::remove(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        LruCache::contains_key(self, key)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }

    fn capacity(&self) -> usize {
        self.cap().get()
    }

    fn clear(&mut self) {
        LruCache::clear(self)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> CacheMetrics for LruCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.segment.metrics().algorithm_name()
    }
}
