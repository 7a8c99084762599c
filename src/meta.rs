//! Algorithm-Specific Metadata Types
//!
//! This module provides metadata types used by the frequency-aware cache
//! algorithms. Each type is stored in the `metadata` field of a
//! [`CacheEntry`](crate::entry::CacheEntry).
//!
//! | Algorithm | Metadata Type | Description |
//! |-----------|---------------|-------------|
//! | LRU       | `()` (none)   | Position in list is implicit |
//! | LFU       | `LfuMeta`     | Access count plus insertion sequence |
//! | LFRU      | `LfruMeta`    | Access count; recency is the bucket position |
//!
//! Access counts start at 1 when a key is inserted and grow by one on every
//! subsequent `get`, `get_mut` or `put` of that key.

/// Metadata for LFU (Least Frequently Used) cache entries.
///
/// Entries are ranked by `(frequency, sequence)`. The sequence is assigned
/// once, on insertion, so among entries with equal counts the one that
/// entered the cache first is evicted first.
///
/// # Examples
///
/// ```
/// use lfru_cache::meta::LfuMeta;
///
/// let mut meta = LfuMeta::new(3);
/// assert_eq!(meta.rank(), (1, 3));
/// meta.increment();
/// assert_eq!(meta.rank(), (2, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LfuMeta {
    /// Number of accesses, starting at 1.
    pub frequency: u64,
    /// Insertion order of the entry within its cache.
    pub sequence: u64,
}

impl LfuMeta {
    /// Creates metadata for a freshly inserted entry.
    #[inline]
    pub fn new(sequence: u64) -> Self {
        Self {
            frequency: 1,
            sequence,
        }
    }

    /// Records one access and returns the new count.
    #[inline]
    pub fn increment(&mut self) -> u64 {
        self.frequency = self.frequency.saturating_add(1);
        self.frequency
    }

    /// Ranking key, smallest is evicted first.
    #[inline]
    pub fn rank(&self) -> (u64, u64) {
        (self.frequency, self.sequence)
    }
}

/// Metadata for LFRU (Least Frequently Recently Used) cache entries.
///
/// # Examples
///
/// ```
/// use lfru_cache::meta::LfruMeta;
///
/// let mut meta = LfruMeta::default();
/// assert_eq!(meta.frequency, 1);
/// assert_eq!(meta.increment(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LfruMeta {
    /// Number of accesses, starting at 1. Also the key of the entry's bucket.
    pub frequency: u64,
}

impl Default for LfruMeta {
    fn default() -> Self {
        Self { frequency: 1 }
    }
}

impl LfruMeta {
    /// Records one access and returns the new count.
    #[inline]
    pub fn increment(&mut self) -> u64 {
        self.frequency = self.frequency.saturating_add(1);
        self.frequency
    }
}
