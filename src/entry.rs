//! Unified Cache Entry Type
//!
//! This module provides a `CacheEntry<K, V, M>` structure shared by all cache
//! algorithm implementations. The generic `M` parameter lets each algorithm
//! store its own per-entry metadata without affecting the core entry layout.
//!
//! | Algorithm | Metadata |
//! |-----------|----------|
//! | LRU       | `()`     |
//! | LFU       | [`LfuMeta`](crate::meta::LfuMeta) |
//! | LFRU      | [`LfruMeta`](crate::meta::LfruMeta) |
//!
//! The cache is the sole owner of its entries. Callers only ever see
//! references to the key and value, never the entry itself.

use core::fmt;

/// Cache entry holding key, value, and algorithm-specific metadata.
///
/// # Examples
///
/// ```
/// use lfru_cache::entry::CacheEntry;
/// use lfru_cache::meta::LfuMeta;
///
/// let entry: CacheEntry<&str, i32> = CacheEntry::new("key", 42);
/// assert_eq!(entry.key, "key");
/// assert_eq!(entry.value, 42);
///
/// let counted = CacheEntry::with_metadata("key", 42, LfuMeta::new(7));
/// assert_eq!(counted.metadata.frequency, 1);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct CacheEntry<K, V, M = ()> {
    /// The cached key
    pub key: K,

    /// The cached value
    pub value: V,

    /// Algorithm-specific metadata (`()` for LRU)
    pub metadata: M,
}

impl<K, V> CacheEntry<K, V> {
    /// Creates an entry without algorithm-specific metadata.
    #[inline]
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            metadata: (),
        }
    }
}

impl<K, V, M> CacheEntry<K, V, M> {
    /// Creates an entry carrying algorithm-specific metadata.
    #[inline]
    pub fn with_metadata(key: K, value: V, metadata: M) -> Self {
        Self {
            key,
            value,
            metadata,
        }
    }

    /// Replaces the value, returning the previous one.
    #[inline]
    pub fn replace_value(&mut self, value: V) -> V {
        core::mem::replace(&mut self.value, value)
    }

    /// Splits the entry into its key and value.
    #[inline]
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// What an insert pushed out of the cache, if anything.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Displaced<K, V> {
    /// The key was present. Holds the key passed in and the old value.
    Replaced(K, V),
    /// A different entry was evicted to make room.
    Evicted(K, V),
}

impl<K, V> Displaced<K, V> {
    /// Old value of the written key, if it was present.
    #[inline]
    pub(crate) fn replaced_value(self) -> Option<V> {
        match self {
            Displaced::Replaced(_, v) => Some(v),
            Displaced::Evicted(..) => None,
        }
    }

    #[inline]
    pub(crate) fn into_pair(self) -> (K, V) {
        match self {
            Displaced::Replaced(k, v) | Displaced::Evicted(k, v) => (k, v),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, M: fmt::Debug> fmt::Debug for CacheEntry<K, V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("metadata", &self.metadata)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_value() {
        let mut entry = CacheEntry::new("k", 1);
        assert_eq!(entry.replace_value(2), 1);
        assert_eq!(entry.into_pair(), ("k", 2));
    }
}
