//! Concurrent Cache Implementations
//!
//! This module provides thread-safe cache implementations built from the same
//! segments as the single-threaded caches.
//!
//! # Architecture
//!
//! Each concurrent cache owns exactly one segment: the hash index and the
//! policy's ordering structure, guarded together by one `parking_lot::Mutex`.
//! Lookup, reordering and eviction all happen under that lock, so no thread
//! can observe a half-linked entry and every operation takes effect at a
//! single point. The outcome of any interleaving equals some serial replay of
//! the same calls on the single-threaded cache.
//!
//! Capacity is global. A new key evicts only when the whole cache is full,
//! and the entry it evicts is the policy's global candidate, exactly as in the
//! single-threaded caches.
//!
//! ## Why Mutex Instead of RwLock?
//!
//! Every policy mutates on read: LRU moves the entry to the most recently used
//! end, LFU re-ranks it, LFRU promotes it to the next bucket. Since `get()` is
//! a write, `RwLock` would give no benefit and costs more bookkeeping.
//!
//! # Concurrency Level
//!
//! `concurrency_level` is a sizing hint. The hash index is pre-allocated for
//! at least that many entries so that a burst of first writes from that many
//! threads does not trigger a rehash while the lock is held. It never splits
//! the capacity and never changes which entry is evicted.
//!
//! # Available Concurrent Caches
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ConcurrentLruCache`] | Thread-safe LRU cache |
//! | [`ConcurrentLfuCache`] | Thread-safe LFU cache |
//! | [`ConcurrentLfruCache`] | Thread-safe LFRU cache |
//!
//! # Zero-Copy Access
//!
//! `get()` returns a clone so that no lock outlives the call. To read without
//! cloning, `get_with()` runs a closure on the value while the lock is held.
//! Keep such closures short and never touch the same cache from inside one:
//! the lock is not reentrant.
//!
//! # Example
//!
//! ```rust
//! use lfru_cache::concurrent::ConcurrentLruCache;
//! use lfru_cache::config::ConcurrentCacheConfig;
//! use core::num::NonZeroUsize;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let config = ConcurrentCacheConfig::new(NonZeroUsize::new(1000).unwrap())
//!     .with_concurrency_level(8);
//! let cache = Arc::new(ConcurrentLruCache::init(config, None).unwrap());
//!
//! let handles: Vec<_> = (0..4).map(|t| {
//!     let cache = Arc::clone(&cache);
//!     thread::spawn(move || {
//!         for i in 0..100 {
//!             let key = format!("key_{}_{}", t, i);
//!             cache.put(key.clone(), i);
//!             let _ = cache.get(&key);
//!         }
//!     })
//! }).collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(cache.len(), 400);
//! ```

use crate::config::{CacheConfig, ConcurrentCacheConfig};
use core::num::NonZeroUsize;
use parking_lot::{Mutex, MutexGuard};

mod lfru;
mod lfu;
mod lru;

pub use self::lfru::ConcurrentLfruCache;
pub use self::lfu::ConcurrentLfuCache;
pub use self::lru::ConcurrentLruCache;

/// One segment behind a lock, plus the sizing it was built with.
///
/// Capacity and concurrency level are fixed at construction and readable
/// without taking the lock.
pub(crate) struct Shared<T> {
    segment: Mutex<T>,
    capacity: NonZeroUsize,
    concurrency_level: usize,
}

impl<T> Shared<T> {
    /// Builds the segment from `config.shared_config()`.
    pub(crate) fn build<S, F>(config: &ConcurrentCacheConfig, hash_builder: S, make: F) -> Self
    where
        F: FnOnce(CacheConfig, S) -> T,
    {
        Self {
            segment: Mutex::new(make(config.shared_config(), hash_builder)),
            capacity: config.base.capacity,
            concurrency_level: config.concurrency_level,
        }
    }

    #[inline]
    pub(crate) fn lock(&self) -> MutexGuard<'_, T> {
        self.segment.lock()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    #[inline]
    pub(crate) fn concurrency_level(&self) -> usize {
        self.concurrency_level
    }
}
