//! Least Frequently Used Cache Implementation.
//!
//! The LFU (Least Frequently Used) cache evicts the entry with the fewest
//! accesses when it must make room for a new key. This protects entries that
//! stay popular over time from being pushed out by a burst of one-off keys.
//!
//! # Algorithm
//!
//! Each entry carries an access count that starts at 1 and grows by one on
//! every `get`, `get_mut` or `put` of its key. Entries are kept in an ordered
//! ranking keyed by `(count, insertion sequence)`:
//!
//! - The lowest rank is the eviction candidate, found in O(log n)
//! - An access removes the entry from the ranking and reinserts it under its
//!   new count, also O(log n)
//! - Among entries with the same count, the one inserted first is evicted
//!   first. Recency of access plays no part; see
//!   [`LfruCache`](crate::LfruCache) for a recency tie-break
//!
//! Removing a key discards its count. Inserting it again starts from 1.

extern crate alloc;

use crate::arena::{SlotArena, SlotId};
use crate::config::LfuCacheConfig;
use crate::entry::{CacheEntry, Displaced};
use crate::error::CacheError;
use crate::meta::LfuMeta;
use crate::metrics::{CacheMetrics, LfuCacheMetrics};
use crate::ranking::FrequencyRanking;
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

type LfuEntry<K, V> = CacheEntry<K, V, LfuMeta>;

/// Internal LFU segment containing the actual cache algorithm.
///
/// This is shared between `LfuCache` (single-threaded) and
/// `ConcurrentLfuCache` (multi-threaded). All algorithm logic is
/// implemented here to avoid code duplication.
pub(crate) struct LfuSegment<K, V, S = DefaultHashBuilder> {
    /// Configuration for the LFU cache
    config: LfuCacheConfig,

    /// Map from keys to their entry slot
    map: HashMap<K, SlotId, S>,

    /// Entry storage
    entries: SlotArena<LfuEntry<K, V>>,

    /// Slots ordered by `(frequency, sequence)`
    ranking: FrequencyRanking,

    /// Sequence number handed to the next inserted entry
    next_sequence: u64,

    /// Metrics for tracking cache performance and frequency distribution
    metrics: LfuCacheMetrics,
}

impl<K: Hash + Eq, V, S: BuildHasher> LfuSegment<K, V, S> {
    /// Builds a segment from an already validated configuration.
    pub(crate) fn init(config: LfuCacheConfig, hash_builder: S) -> Self {
        LfuSegment {
            config,
            map: HashMap::with_capacity_and_hasher(config.index_capacity(), hash_builder),
            entries: SlotArena::with_capacity(config.index_capacity()),
            ranking: FrequencyRanking::new(),
            next_sequence: 0,
            metrics: LfuCacheMetrics::new(),
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
    pub(crate) fn metrics(&self) -> &LfuCacheMetrics {
        &self.metrics
    }

    /// Counts one access of the entry in `id` and re-ranks it.
    fn touch(&mut self, id: SlotId) -> Option<&mut LfuEntry<K, V>> {
        let entry = self.entries.get_mut(id)?;
        let old_rank = entry.metadata.rank();
        let frequency = entry.metadata.increment();
        self.ranking.rerank(old_rank, entry.metadata.rank());
        self.metrics.record_frequency_increment(frequency);
        Some(entry)
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
        self.entries.get(id).map(|e| &e.value)
    }

    pub(crate) fn frequency<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = *self.map.get(key)?;
        self.entries.get(id).map(|e| e.metadata.frequency)
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
            if let Some((old_key, old_value)) = self.pop_lfu() {
                self.metrics.core.record_eviction();
                log::trace!("lfu segment evicted its least frequently used entry");
                evicted = Some(Displaced::Evicted(old_key, old_value));
            }
        }

        let meta = LfuMeta::new(self.next_sequence);
        self.next_sequence += 1;
        let id = self
            .entries
            .insert(CacheEntry::with_metadata(key.clone(), value, meta));
        self.ranking.insert(meta.rank(), id);
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
        let entry = self.entries.remove(id)?;
        self.ranking.remove(entry.metadata.rank());
        self.metrics.core.record_removal();
        Some(entry.into_pair())
    }

    fn pop_lfu(&mut self) -> Option<(K, V)> {
        let id = self.ranking.pop_first()?;
        let entry = self.entries.remove(id)?;
        self.map.remove(&entry.key);
        Some(entry.into_pair())
    }

    /// Removes the eviction candidate as an explicit removal.
    pub(crate) fn pop(&mut self) -> Option<(K, V)> {
        let pair = self.pop_lfu()?;
        self.metrics.core.record_removal();
        Some(pair)
    }

    pub(crate) fn peek_eviction_candidate(&self) -> Option<(&K, &V)> {
        let entry = self.entries.get(self.ranking.first()?)?;
        Some((&entry.key, &entry.value))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.ranking
            .iter()
            .filter_map(|id| self.entries.get(id))
            .map(|e| (&e.key, &e.value))
    }

    pub(crate) fn clear(&mut self) {
        log::trace!("clearing lfu segment with {} entries", self.map.len());
        self.map.clear();
        self.entries.clear();
        self.ranking.clear();
    }
}

impl<K, V, S> core::fmt::Debug for LfuSegment<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LfuSegment")
            .field("capacity", &self.config.capacity)
            .field("len", &self.ranking.len())
            .finish()
    }
}

/// An implementation of a Least Frequently Used (LFU) cache.
///
/// The cache tracks the access count of every entry. When it is full, the
/// entry with the lowest count is evicted; ties go to the entry that was
/// inserted earliest.
///
/// # Examples
///
/// ```
/// use lfru_cache::LfuCache;
/// use core::num::NonZeroUsize;
///
/// let mut cache = LfuCache::new(NonZeroUsize::new(2).unwrap());
///
/// cache.put("a", 1);
/// cache.put("b", 2);
///
/// // "a" now has count 2, "b" has count 1
/// assert_eq!(cache.get(&"a"), Some(&1));
///
/// // "b" is least frequently used and gets evicted
/// cache.put("c", 3);
/// assert_eq!(cache.get(&"b"), None);
/// assert_eq!(cache.get(&"a"), Some(&1));
/// ```
#[derive(Debug)]
pub struct LfuCache<K, V, S = DefaultHashBuilder> {
    segment: LfuSegment<K, V, S>,
}

impl<K: Hash + Eq, V> LfuCache<K, V, DefaultHashBuilder> {
    /// Creates a new LFU cache holding at most `cap` entries.
    pub fn new(cap: NonZeroUsize) -> Self {
        Self::with_hasher(cap, DefaultHashBuilder::default())
    }

    /// Creates a new LFU cache, rejecting a zero capacity.
    pub fn try_new(cap: usize) -> Result<Self, CacheError> {
        Self::init(LfuCacheConfig::try_new(cap)?, None)
    }

    /// Creates a new LFU cache from a configuration with an optional hasher.
    pub fn init(
        config: LfuCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, CacheError> {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LfuCache<K, V, S> {
    /// Creates a new LFU cache with the specified capacity and hash builder.
    pub fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        Self {
            segment: LfuSegment::init(LfuCacheConfig::new(cap), hash_builder),
        }
    }

    /// Creates a new LFU cache from a configuration and a custom hash builder.
    pub fn init_with_hasher(config: LfuCacheConfig, hash_builder: S) -> Result<Self, CacheError> {
        config.validate()?;
        log::debug!("creating lfu cache with capacity {}", config.capacity);
        Ok(Self {
            segment: LfuSegment::init(config, hash_builder),
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

    /// Returns a reference to the value for `key` and increments its count.
    #[inline]
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get(key)
    }

    /// Returns a mutable reference to the value for `key` and increments its
    /// count.
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

    /// Removes `key` and returns its value. Its count is discarded.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes and returns the least frequently used entry.
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

    /// Iterates in eviction order: lowest count first, ties by insertion.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.segment.iter()
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LfuCache<K, V, S> {
    /// Stores `value` under `key`, returning the value it replaced.
    ///
    /// Replacing a value counts as an access. A new key starts at count 1,
    /// evicting the least frequently used entry first if the cache is full.
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

impl<K: Hash + Eq + Clone, V, S: BuildHasher> Extend<(K, V)> for LfuCache<K, V, S> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> BoundedCache<K, V> for LfuCache<K, V, S> {
    fn get(&mut self, key: &K) -> Option<&V> {
        LfuCache::get(self, key)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        LfuCache::put(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        LfuCache::remove(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        LfuCache::contains_key(self, key)
    }

    fn len(&self) -> usize {
        LfuCache::len(self)
    }

    fn capacity(&self) -> usize {
        self.cap().get()
    }

    fn clear(&mut self) {
        LfuCache::clear(self)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> CacheMetrics for LfuCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.segment.metrics().algorithm_name()
    }
}
