//! Concurrent LFRU Cache Implementation
//!
//! A thread-safe LFRU cache: one [`LfruSegment`] behind a `parking_lot::Mutex`.
//! Eviction takes the lowest frequency bucket of the whole cache; within that
//! bucket the least recently used entry goes first.
//!
//! # Example
//!
//! ```rust
//! use lfru_cache::concurrent::ConcurrentLfruCache;
//! use core::num::NonZeroUsize;
//!
//! let cache = ConcurrentLfruCache::new(NonZeroUsize::new(2).unwrap());
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.get(&"b");
//! cache.get(&"a");
//! // both were read once; "b" was read longer ago
//! cache.put("c", 3);
//! assert!(!cache.contains_key(&"b"));
//! ```

extern crate alloc;

use super::Shared;
use crate::config::{ConcurrentCacheConfig, ConcurrentLfruCacheConfig};
use crate::entry::Displaced;
use crate::error::CacheError;
use crate::lfru::LfruSegment;
use crate::metrics::{CacheMetrics, LfruCacheMetrics};
use crate::traits::ConcurrentBoundedCache;
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// A thread-safe LFRU cache.
///
/// # Type Parameters
///
/// - `K`: Key type. Must implement `Hash + Eq + Clone + Send`.
/// - `V`: Value type. Must implement `Send`, and `Clone` for [`get`](Self::get).
/// - `S`: Hash builder type. Defaults to `DefaultHashBuilder`.
pub struct ConcurrentLfruCache<K, V, S = DefaultHashBuilder> {
    shared: Shared<LfruSegment<K, V, S>>,
}

impl<K, V> ConcurrentLfruCache<K, V, DefaultHashBuilder>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
{
    /// Creates a cache holding at most `cap` entries.
    pub fn new(cap: NonZeroUsize) -> Self {
        let config = ConcurrentCacheConfig::new(cap);
        Self {
            shared: Shared::build(&config, DefaultHashBuilder::default(), LfruSegment::init),
        }
    }

    /// Creates a cache, rejecting a zero capacity.
    pub fn try_new(cap: usize) -> Result<Self, CacheError> {
        NonZeroUsize::new(cap)
            .map(Self::new)
            .ok_or(CacheError::ZeroCapacity)
    }

    /// Creates a new concurrent LFRU cache from a configuration with an optional hasher.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lfru_cache::concurrent::ConcurrentLfruCache;
    /// use lfru_cache::config::ConcurrentLfruCacheConfig;
    /// use core::num::NonZeroUsize;
    ///
    /// let config = ConcurrentLfruCacheConfig::new(NonZeroUsize::new(1024).unwrap())
    ///     .with_concurrency_level(8);
    /// let cache: ConcurrentLfruCache<u64, u64> = ConcurrentLfruCache::init(config, None).unwrap();
    /// assert_eq!(cache.capacity(), 1024);
    /// ```
    pub fn init(
        config: ConcurrentLfruCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, CacheError> {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K, V, S> ConcurrentLfruCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
    S: BuildHasher + Send,
{
    /// Creates a concurrent LFRU cache with a custom hash builder.
    pub fn init_with_hasher(
        config: ConcurrentLfruCacheConfig,
        hash_builder: S,
    ) -> Result<Self, CacheError> {
        config.validate()?;
        log::debug!(
            "creating concurrent lfru cache with capacity {} for {} threads",
            config.base.capacity,
            config.concurrency_level
        );
        Ok(Self {
            shared: Shared::build(&config, hash_builder, LfruSegment::init),
        })
    }

    /// Returns the maximum number of entries the cache can hold.
    pub fn capacity(&self) -> usize {
        self.shared.capacity().get()
    }

    /// Returns the concurrency level the cache was sized for.
    pub fn concurrency_level(&self) -> usize {
        self.shared.concurrency_level()
    }

    /// Returns the number of entries in the cache.
    pub fn len(&self) -> usize {
        self.shared.lock().len()
    }

    /// Returns `true` if the cache contains no entries.
    pub fn is_empty(&self) -> bool {
        self.shared.lock().is_empty()
    }

    /// Retrieves a clone of the value, promoting the entry one bucket up.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.shared.lock().get(key).cloned()
    }

    /// Retrieves a value and applies `f` to it while holding the lock.
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.shared.lock().get(key).map(f)
    }

    /// Applies `f` to a mutable reference to the value. Counts as an access.
    pub fn get_mut_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&mut V) -> R,
    {
        self.shared.lock().get_mut(key).map(f)
    }

    /// Returns a clone of the value without promoting it.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.shared.lock().peek(key).cloned()
    }

    /// Current access count of `key`.
    pub fn frequency<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.shared.lock().frequency(key)
    }

    /// Inserts a key-value pair, returning the value it replaced.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.shared.lock().insert(key, value)?.replaced_value()
    }

    /// Inserts a key-value pair, returning whichever pair left the cache.
    pub fn push(&self, key: K, value: V) -> Option<(K, V)> {
        self.shared.lock().insert(key, value).map(Displaced::into_pair)
    }

    /// Removes a key from the cache, returning its value.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.shared.lock().remove_entry(key).map(|(_, v)| v)
    }

    /// Checks if the cache contains a key without promoting it.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.shared.lock().contains_key(key)
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.shared.lock().clear();
    }

    /// A copy of the current metrics.
    pub fn snapshot_metrics(&self) -> LfruCacheMetrics {
        self.shared.lock().metrics().clone()
    }
}

impl<K, V, S> ConcurrentBoundedCache<K, V> for ConcurrentLfruCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
    S: BuildHasher + Send,
{
    fn get(&self, key: &K) -> Option<V> {
        ConcurrentLfruCache::get(self, key)
    }

    fn put(&self, key: K, value: V) -> Option<V> {
        ConcurrentLfruCache::put(self, key, value)
    }

    fn remove(&self, key: &K) -> Option<V> {
        ConcurrentLfruCache::remove(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        ConcurrentLfruCache::contains_key(self, key)
    }

    fn len(&self) -> usize {
        ConcurrentLfruCache::len(self)
    }

    fn capacity(&self) -> usize {
        ConcurrentLfruCache::capacity(self)
    }

    fn clear(&self) {
        ConcurrentLfruCache::clear(self)
    }
}

impl<K, V, S> CacheMetrics for ConcurrentLfruCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
    S: BuildHasher + Send,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.shared.lock().metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        "ConcurrentLFRU"
    }
}

impl<K, V, S> core::fmt::Debug for ConcurrentLfruCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
    S: BuildHasher + Send,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConcurrentLfruCache")
            .field("capacity", &self.capacity())
            .field("concurrency_level", &self.concurrency_level())
            .field("len", &self.len())
            .finish()
    }
}
