//! Bounded-map contract shared by every eviction policy.
//!
//! [`BoundedCache`] is the single-threaded contract (`&mut self`), and
//! [`ConcurrentBoundedCache`] is the internally synchronized one (`&self`,
//! values returned by clone). Code written against these traits can switch
//! between LRU, LFU and LFRU without changes.
//!
//! ```
//! use lfru_cache::traits::BoundedCache;
//! use lfru_cache::{LfruCache, LruCache};
//! use core::num::NonZeroUsize;
//!
//! fn warm<C: BoundedCache<u32, &'static str>>(cache: &mut C) {
//!     cache.put_all([(1, "one"), (2, "two"), (3, "three")]);
//! }
//!
//! let cap = NonZeroUsize::new(2).unwrap();
//! let mut lru = LruCache::new(cap);
//! let mut lfru = LfruCache::new(cap);
//! warm(&mut lru);
//! warm(&mut lfru);
//! assert_eq!(lru.len(), 2);
//! assert_eq!(lfru.len(), 2);
//! ```

/// Single-threaded bounded map.
///
/// `len() <= capacity()` holds after every call. A `put` of a new key into a
/// full cache evicts exactly one entry, chosen by the policy, before the new
/// entry is stored.
pub trait BoundedCache<K, V> {
    /// Returns the value for `key`, counting as an access.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Stores `value` under `key`, returning the value it replaced.
    ///
    /// Replacing the value of a present key counts as an access.
    fn put(&mut self, key: K, value: V) -> Option<V>;

    /// Removes `key`, returning its value.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Whether `key` is present. Not an access.
    fn contains_key(&self, key: &K) -> bool;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Whether the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    fn capacity(&self) -> usize;

    /// Removes every entry.
    fn clear(&mut self);

    /// Stores every pair in iteration order.
    fn put_all<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        Self: Sized,
    {
        for (key, value) in pairs {
            self.put(key, value);
        }
    }
}

/// Thread-safe bounded map.
///
/// Every call is atomic: concurrent calls behave as if run one after
/// another in some order.
#[cfg(feature = "concurrent")]
pub trait ConcurrentBoundedCache<K, V>: Send + Sync {
    /// Returns a clone of the value for `key`, counting as an access.
    fn get(&self, key: &K) -> Option<V>;

    /// Stores `value` under `key`, returning the value it replaced.
    fn put(&self, key: K, value: V) -> Option<V>;

    /// Removes `key`, returning its value.
    fn remove(&self, key: &K) -> Option<V>;

    /// Whether `key` is present. Not an access.
    fn contains_key(&self, key: &K) -> bool;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Whether the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    fn capacity(&self) -> usize;

    /// Removes every entry.
    fn clear(&self);
}
