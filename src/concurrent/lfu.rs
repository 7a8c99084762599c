//! Concurrent LFU Cache Implementation
//!
//! A thread-safe LFU cache: one [`LfuSegment`] behind a `parking_lot::Mutex`.
//! The frequency ranking covers the whole cache, so eviction always picks the
//! globally least frequently used entry, oldest insertion first on ties.
//!
//! # Example
//!
//! ```rust
//! use lfru_cache::concurrent::ConcurrentLfuCache;
//! use core::num::NonZeroUsize;
//!
//! let cache = ConcurrentLfuCache::new(NonZeroUsize::new(2).unwrap());
//! cache.put("hot", 1);
//! cache.put("cold", 2);
//! cache.get(&"hot");
//! cache.get(&"hot");
//! cache.put("new", 3);
//! assert!(cache.contains_key(&"hot"));
//! assert!(!cache.contains_key(&"cold"));
//! assert_eq!(cache.frequency(&"hot"), Some(3));
//! ```

extern crate alloc;

use super::Shared;
use crate::config::{ConcurrentCacheConfig, ConcurrentLfuCacheConfig};
use crate::entry::Displaced;
use crate::error::CacheError;
use crate::lfu::LfuSegment;
use crate::metrics::{CacheMetrics, LfuCacheMetrics};
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

/// A thread-safe LFU cache.
///
/// # Type Parameters
///
/// - `K`: Key type. Must implement `Hash + Eq + Clone + Send`.
/// - `V`: Value type. Must implement `Send`, and `Clone` for [`get`](Self::get).
/// - `S`: Hash builder type. Defaults to `DefaultHashBuilder`.
pub struct ConcurrentLfuCache<K, V, S = DefaultHashBuilder> {
    shared: Shared<LfuSegment<K, V, S>>,
}

impl<K, V> ConcurrentLfuCache<K, V, DefaultHashBuilder>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
{
    /// Creates a cache holding at most `cap` entries.
    pub fn new(cap: NonZeroUsize) -> Self {
        let config = ConcurrentCacheConfig::new(cap);
        Self {
            shared: Shared::build(&config, DefaultHashBuilder::default(), LfuSegment::init),
        }
    }

    /// Creates a cache, rejecting a zero capacity.
    pub fn try_new(cap: usize) -> Result<Self, CacheError> {
        NonZeroUsize::new(cap)
            .map(Self::new)
            .ok_or(CacheError::ZeroCapacity)
    }

    /// Creates a new concurrent LFU cache from a configuration with an optional hasher.
    pub fn init(
        config: ConcurrentLfuCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, CacheError> {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K, V, S> ConcurrentLfuCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
    S: BuildHasher + Send,
{
    /// Creates a concurrent LFU cache with a custom hash builder.
    pub fn init_with_hasher(
        config: ConcurrentLfuCacheConfig,
        hash_builder: S,
    ) -> Result<Self, CacheError> {
        config.validate()?;
        log::debug!(
            "creating concurrent lfu cache with capacity {} for {} threads",
            config.base.capacity,
            config.concurrency_level
        );
        Ok(Self {
            shared: Shared::build(&config, hash_builder, LfuSegment::init),
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

    /// Retrieves a clone of the value and counts one access.
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

    /// Applies `f` to a mutable reference to the value. Counts one access.
    pub fn get_mut_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&mut V) -> R,
    {
        self.shared.lock().get_mut(key).map(f)
    }

    /// Returns a clone of the value without counting an access.
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
    ///
    /// Updating an existing key counts as an access of it.
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

    /// Checks if the cache contains a key without counting an access.
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
    pub fn snapshot_metrics(&self) -> LfuCacheMetrics {
        self.shared.lock().metrics().clone()
    }
}

impl<K, V, S> ConcurrentBoundedCache<K, V> for ConcurrentLfuCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
    S: BuildHasher + Send,
{
    fn get(&self, key: &K) -> Option<V> {
        ConcurrentLfuCache::get(self, key)
    }

    fn put(&self, key: K, value: V) -> Option<V> {
        ConcurrentLfuCache::put(self, key, value)
    }

    fn remove(&self, key: &K) -> Option<V> {
        ConcurrentLfuCache::remove(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        ConcurrentLfuCache::contains_key(self, key)
    }

    fn len(&self) -> usize {
        ConcurrentLfuCache::len(self)
    }

    fn capacity(&self) -> usize {
        ConcurrentLfuCache::capacity(self)
    }

    fn clear(&self) {
        ConcurrentLfuCache::clear(self)
    }
}

impl<K, V, S> CacheMetrics for ConcurrentLfuCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
    S: BuildHasher + Send,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.shared.lock().metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        "ConcurrentLFU"
    }
}

impl<K, V, S> core::fmt::Debug for ConcurrentLfuCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
    S: BuildHasher + Send,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConcurrentLfuCache")
            .field("capacity", &self.capacity())
            .field("concurrency_level", &self.concurrency_level())
            .field("len", &self.len())
            .finish()
    }
}
