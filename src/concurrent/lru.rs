//! Concurrent LRU Cache Implementation
//!
//! A thread-safe LRU cache: one [`LruSegment`] behind a `parking_lot::Mutex`.
//!
//! # How It Works
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     ConcurrentLruCache                        │
//! │                                                               │
//! │  capacity, concurrency_level   (read without locking)         │
//! │                                                               │
//! │  Mutex ┌────────────────────────────────────────────────┐     │
//! │        │ HashMap<K, SlotId>   index                     │     │
//! │        │ List                 MRU ◀──────────▶ LRU      │     │
//! │        └────────────────────────────────────────────────┘     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is a single recency list for the whole cache, so the evicted entry
//! is always the globally least recently used one, whatever the concurrency
//! level.
//!
//! # Example
//!
//! ```rust
//! use lfru_cache::concurrent::ConcurrentLruCache;
//! use core::num::NonZeroUsize;
//!
//! let cache = ConcurrentLruCache::new(NonZeroUsize::new(2).unwrap());
//! cache.put("a", 1);
//! cache.put("b", 2);
//! assert_eq!(cache.get(&"a"), Some(1));
//! cache.put("c", 3);
//! assert!(!cache.contains_key(&"b"));
//! ```

extern crate alloc;

use super::Shared;
use crate::config::{ConcurrentCacheConfig, ConcurrentLruCacheConfig};
use crate::entry::Displaced;
use crate::error::CacheError;
use crate::lru::LruSegment;
use crate::metrics::{CacheMetrics, LruCacheMetrics};
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

/// A thread-safe LRU cache.
///
/// # Type Parameters
///
/// - `K`: Key type. Must implement `Hash + Eq + Clone + Send`.
/// - `V`: Value type. Must implement `Send`, and `Clone` for [`get`](Self::get).
/// - `S`: Hash builder type. Defaults to `DefaultHashBuilder`.
pub struct ConcurrentLruCache<K, V, S = DefaultHashBuilder> {
    shared: Shared<LruSegment<K, V, S>>,
}

impl<K, V> ConcurrentLruCache<K, V, DefaultHashBuilder>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
{
    /// Creates a cache holding at most `cap` entries.
    pub fn new(cap: NonZeroUsize) -> Self {
        let config = ConcurrentCacheConfig::new(cap);
        Self {
            shared: Shared::build(&config, DefaultHashBuilder::default(), LruSegment::init),
        }
    }

    /// Creates a cache, rejecting a zero capacity.
    pub fn try_new(cap: usize) -> Result<Self, CacheError> {
        NonZeroUsize::new(cap)
            .map(Self::new)
            .ok_or(CacheError::ZeroCapacity)
    }

    /// Creates a new concurrent LRU cache from a configuration with an optional hasher.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lfru_cache::concurrent::ConcurrentLruCache;
    /// use lfru_cache::config::{CacheConfig, ConcurrentLruCacheConfig};
    /// use core::num::NonZeroUsize;
    ///
    /// let config = ConcurrentLruCacheConfig {
    ///     base: CacheConfig::new(NonZeroUsize::new(10_000).unwrap()),
    ///     concurrency_level: 16,
    /// };
    /// let cache: ConcurrentLruCache<String, i32> = ConcurrentLruCache::init(config, None).unwrap();
    /// assert_eq!(cache.capacity(), 10_000);
    /// assert_eq!(cache.concurrency_level(), 16);
    /// ```
    pub fn init(
        config: ConcurrentLruCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, CacheError> {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K, V, S> ConcurrentLruCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
    S: BuildHasher + Send,
{
    /// Creates a concurrent LRU cache with a custom hash builder.
    pub fn init_with_hasher(
        config: ConcurrentLruCacheConfig,
        hash_builder: S,
    ) -> Result<Self, CacheError> {
        config.validate()?;
        log::debug!(
            "creating concurrent lru cache with capacity {} for {} threads",
            config.base.capacity,
            config.concurrency_level
        );
        Ok(Self {
            shared: Shared::build(&config, hash_builder, LruSegment::init),
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
    ///
    /// Under concurrent writes the result may already be stale when it returns.
    pub fn len(&self) -> usize {
        self.shared.lock().len()
    }

    /// Returns `true` if the cache contains no entries.
    pub fn is_empty(&self) -> bool {
        self.shared.lock().is_empty()
    }

    /// Retrieves a clone of the value and marks the entry most recently used.
    ///
    /// For reads that don't need ownership, use [`get_with()`](Self::get_with).
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.shared.lock().get(key).cloned()
    }

    /// Retrieves a value and applies `f` to it while holding the lock.
    ///
    /// Counts as an access. `f` must not call back into this cache.
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.shared.lock().get(key).map(f)
    }

    /// Applies `f` to a mutable reference to the value, in place.
    ///
    /// ```rust
    /// use lfru_cache::concurrent::ConcurrentLruCache;
    /// use core::num::NonZeroUsize;
    ///
    /// let cache = ConcurrentLruCache::new(NonZeroUsize::new(4).unwrap());
    /// cache.put("counter", 0);
    /// cache.get_mut_with(&"counter", |v| *v += 1);
    /// assert_eq!(cache.get(&"counter"), Some(1));
    /// ```
    pub fn get_mut_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&mut V) -> R,
    {
        self.shared.lock().get_mut(key).map(f)
    }

    /// Returns a clone of the value without touching its recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.shared.lock().peek(key).cloned()
    }

    /// Inserts a key-value pair, returning the value it replaced.
    ///
    /// If the key is new and the cache is full, the least recently used entry
    /// is evicted first.
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

    /// Checks if the cache contains a key. Does not touch its recency.
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
    pub fn snapshot_metrics(&self) -> LruCacheMetrics {
        self.shared.lock().metrics().clone()
    }
}

impl<K, V, S> ConcurrentBoundedCache<K, V> for ConcurrentLruCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
    S: BuildHasher + Send,
{
    fn get(&self, key: &K) -> Option<V> {
        ConcurrentLruCache::get(self, key)
    }

    fn put(&self, key: K, value: V) -> Option<V> {
        ConcurrentLruCache::put(self, key, value)
    }

    fn remove(&self, key: &K) -> Option<V> {
        ConcurrentLruCache::remove(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        ConcurrentLruCache::contains_key(self, key)
    }

    fn len(&self) -> usize {
        ConcurrentLruCache::len(self)
    }

    fn capacity(&self) -> usize {
        ConcurrentLruCache::capacity(self)
    }

    fn clear(&self) {
        ConcurrentLruCache::clear(self)
    }
}

impl<K, V, S> CacheMetrics for ConcurrentLruCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
    S: BuildHasher + Send,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.shared.lock().metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        "ConcurrentLRU"
    }
}

impl<K, V, S> core::fmt::Debug for ConcurrentLruCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
    S: BuildHasher + Send,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConcurrentLruCache")
            .field("capacity", &self.capacity())
            .field("concurrency_level", &self.concurrency_level())
            .field("len", &self.len())
            .finish()
    }
}
