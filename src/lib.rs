#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Algorithm Selection Guide
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                 Which Cache Algorithm Should I Use?                 │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                                                                     │
//! │  ┌─────────────────┐                                                │
//! │  │ Recency-based?  │──Yes──▶ ┌──────────┐                           │
//! │  │ (recent = hot)  │         │   LRU    │                           │
//! │  └────────┬────────┘         └──────────┘                           │
//! │          No                                                         │
//! │           ▼                                                         │
//! │  ┌─────────────────┐                                                │
//! │  │ Frequency-based?│──Yes──▶ Should recency break ties?             │
//! │  │ (popular = hot) │              │                                 │
//! │  └─────────────────┘         Yes  │  No                             │
//! │                               │   │                                 │
//! │                               ▼   ▼                                 │
//! │                       ┌──────────┐  ┌──────────┐                    │
//! │                       │   LFRU   │  │   LFU    │                    │
//! │                       └──────────┘  └──────────┘                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Reference
//!
//! | Algorithm | Description | Best Use Case |
//! |-----------|-------------|---------------|
//! | [`LruCache`] | Least Recently Used | General purpose, recency-based access |
//! | [`LfuCache`] | Least Frequently Used | Stable popularity patterns |
//! | [`LfruCache`] | Least Frequently Recently Used | Popularity with recency as tie-break |
//! | [`CountMinSketch`] | Approximate frequency counter | Admission decisions, heavy hitters |
//!
//! ## Performance Characteristics
//!
//! | Algorithm | Get      | Put      | Remove   | Eviction |
//! |-----------|----------|----------|----------|----------|
//! | LRU       | O(1)     | O(1)     | O(1)     | O(1)     |
//! | LFU       | O(log n) | O(log n) | O(log n) | O(log n) |
//! | LFRU      | O(log f) | O(log f) | O(log f) | O(log f) |
//!
//! `f` is the number of distinct access counts currently held, which is
//! usually far smaller than the number of entries.
//!
//! ## Code Examples
//!
//! ### LRU (Least Recently Used)
//!
//! ```rust
//! use lfru_cache::LruCache;
//! use lfru_cache::config::LruCacheConfig;
//! use core::num::NonZeroUsize;
//!
//! let config = LruCacheConfig::new(NonZeroUsize::new(2).unwrap());
//! let mut cache = LruCache::init(config, None).unwrap();
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.get(&"a");      // "a" becomes most recently used
//! cache.put("c", 3);    // "b" evicted (least recently used)
//! assert!(cache.get(&"b").is_none());
//! ```
//!
//! ### LFU (Least Frequently Used)
//!
//! ```rust
//! use lfru_cache::LfuCache;
//! use core::num::NonZeroUsize;
//!
//! let mut cache = LfuCache::new(NonZeroUsize::new(2).unwrap());
//! cache.put("rare", 1);
//! cache.put("popular", 2);
//!
//! for _ in 0..10 { cache.get(&"popular"); }
//!
//! cache.put("new", 3);  // "rare" evicted (lowest frequency)
//! assert!(cache.get(&"popular").is_some());
//! assert!(cache.get(&"rare").is_none());
//! ```
//!
//! ### LFRU (Least Frequently Recently Used)
//!
//! ```rust
//! use lfru_cache::LfruCache;
//! use core::num::NonZeroUsize;
//!
//! let mut cache = LfruCache::new(NonZeroUsize::new(2).unwrap());
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.get(&"b");
//! cache.get(&"a");
//! // equal counts: "b" was accessed longer ago
//! cache.put("c", 3);
//! assert!(!cache.contains_key(&"b"));
//! ```
//!
//! ## Concurrent Caches
//!
//! Enable the `concurrent` feature for thread-safe versions of all three
//! policies. See the [`concurrent`] module for the locking scheme.
//!
//! ## Modules
//!
//! - [`lru`]: Least Recently Used cache implementation
//! - [`lfu`]: Least Frequently Used cache implementation
//! - [`lfru`]: Least Frequently Recently Used cache implementation
//! - [`sketch`]: Count-Min Sketch frequency estimator
//! - [`traits`]: The bounded-map contract shared by all caches
//! - [`config`]: Configuration structures for all cache algorithms
//! - [`metrics`]: Metrics collection for cache performance monitoring
//! - [`concurrent`]: Thread-safe concurrent cache implementations (requires `concurrent` feature)

#![no_std]

extern crate alloc;

#[cfg(any(feature = "std", not(feature = "hashbrown")))]
extern crate std;

#[cfg(test)]
extern crate scoped_threadpool;

/// Slot arena backing every cache's entry storage.
pub(crate) mod arena;

/// Doubly linked list over a shared slot arena.
///
/// **Note**: This module is internal infrastructure. Links are slot indices,
/// so relinking an entry never moves or reallocates it.
pub(crate) mod list;

/// Ordered `(frequency, sequence)` index used by the LFU cache.
pub(crate) mod ranking;

/// Per-frequency recency lists used by the LFRU cache.
pub(crate) mod buckets;

/// Unified cache entry type.
///
/// Provides a generic `CacheEntry<K, V, M>` structure that holds key, value
/// and algorithm-specific metadata.
pub mod entry;

/// Algorithm-specific metadata types.
///
/// - `LfuMeta`: Access count and insertion sequence for LFU
/// - `LfruMeta`: Access count for LFRU
pub mod meta;

/// Error type returned by fallible constructors.
pub mod error;

/// Cache configuration structures.
///
/// Provides configuration structures for all cache algorithm implementations.
pub mod config;

/// Bounded-map traits implemented by every cache.
pub mod traits;

/// Least Recently Used (LRU) cache implementation.
///
/// Provides a fixed-size cache that evicts the least recently used items when
/// the capacity is reached.
pub mod lru;

/// Least Frequently Used (LFU) cache implementation.
///
/// Provides a fixed-size cache that evicts the least frequently used items
/// when capacity is reached. Ties go to the entry inserted first.
pub mod lfu;

/// Least Frequently Recently Used (LFRU) cache implementation.
///
/// Evicts the least frequently used entry, and among equally used entries
/// the one accessed least recently.
pub mod lfru;

/// Count-Min Sketch for approximate frequency counting.
pub mod sketch;

/// Cache metrics system.
///
/// Provides a flexible metrics collection and reporting system for all cache algorithms.
/// Each algorithm can track algorithm-specific metrics while implementing a common interface.
pub mod metrics;

/// Concurrent cache implementations.
///
/// Provides thread-safe cache implementations. Each concurrent cache keeps
/// its index and eviction order behind one lock, with a global capacity.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod concurrent;

// Re-export cache types
pub use lfru::LfruCache;
pub use lfu::LfuCache;
pub use lru::LruCache;
pub use sketch::CountMinSketch;

pub use entry::CacheEntry;
pub use error::CacheError;
pub use meta::{LfruMeta, LfuMeta};
pub use traits::BoundedCache;

#[cfg(feature = "concurrent")]
pub use traits::ConcurrentBoundedCache;

#[cfg(feature = "concurrent")]
pub use concurrent::{ConcurrentLfruCache, ConcurrentLfuCache, ConcurrentLruCache};
