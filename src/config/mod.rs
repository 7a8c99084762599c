//! Cache Configuration Module
//!
//! This module provides configuration structures for all cache implementations.
//! Configuration structs have public fields for simple instantiation, plus a
//! `new` constructor that fills in the defaults.
//!
//! # Options
//!
//! | Option | Applies to | Default | Meaning |
//! |--------|------------|---------|---------|
//! | `capacity` | all caches | required | Maximum number of entries |
//! | `initial_capacity` | all caches | 16 | Hash index pre-allocation hint |
//! | `load_factor` | all caches | 0.75 | Hash index sizing hint, in `(0, 1]` |
//! | `concurrency_level` | concurrent caches | 1 | Expected number of writer threads, floor for the index pre-allocation |
//!
//! The three eviction policies share one base configuration; the aliases
//! [`LruCacheConfig`], [`LfuCacheConfig`] and [`LfruCacheConfig`] exist so call
//! sites read naturally.
//!
//! # Examples
//!
//! ```
//! use lfru_cache::config::LruCacheConfig;
//! use lfru_cache::LruCache;
//! use core::num::NonZeroUsize;
//!
//! let config = LruCacheConfig {
//!     capacity: NonZeroUsize::new(1000).unwrap(),
//!     initial_capacity: 256,
//!     load_factor: 0.75,
//! };
//! let cache: LruCache<String, i32> = LruCache::init(config, None).unwrap();
//! assert_eq!(cache.cap().get(), 1000);
//! ```

use crate::error::CacheError;
use core::fmt;
use core::num::NonZeroUsize;

pub mod sketch;

pub use sketch::CountMinSketchConfig;

/// Default hash index pre-allocation hint.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Default load factor hint.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// Default concurrency level for concurrent caches.
pub const DEFAULT_CONCURRENCY_LEVEL: usize = 1;

/// Base configuration shared by every eviction policy.
///
/// # Fields
///
/// - `capacity`: Maximum number of entries the cache can hold.
/// - `initial_capacity`: Number of entries the hash index is sized for up front.
///   Clamped to `capacity`.
/// - `load_factor`: Target fill ratio of the hash index. Smaller values reserve
///   more slots up front. Must be in `(0, 1]`.
///
/// # Examples
///
/// ```
/// use lfru_cache::config::CacheConfig;
/// use core::num::NonZeroUsize;
///
/// let config = CacheConfig::new(NonZeroUsize::new(64).unwrap());
/// assert_eq!(config.initial_capacity, 16);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct CacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    pub capacity: NonZeroUsize,
    /// Pre-allocation hint for the hash index.
    pub initial_capacity: usize,
    /// Target fill ratio of the hash index.
    pub load_factor: f32,
}

/// Configuration for an LRU (Least Recently Used) cache.
pub type LruCacheConfig = CacheConfig;

/// Configuration for an LFU (Least Frequently Used) cache.
pub type LfuCacheConfig = CacheConfig;

/// Configuration for an LFRU (Least Frequently Recently Used) cache.
pub type LfruCacheConfig = CacheConfig;

impl CacheConfig {
    /// Creates a configuration with the given capacity and default hints.
    #[must_use]
    pub const fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }

    /// Creates a configuration from a plain capacity value.
    ///
    /// Returns [`CacheError::ZeroCapacity`] when `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<Self, CacheError> {
        NonZeroUsize::new(capacity)
            .map(Self::new)
            .ok_or(CacheError::ZeroCapacity)
    }

    /// Checks the sizing hints.
    pub fn validate(&self) -> Result<(), CacheError> {
        let lf = self.load_factor;
        if !lf.is_finite() || lf <= 0.0 || lf > 1.0 {
            return Err(CacheError::InvalidLoadFactor(lf));
        }
        Ok(())
    }

    /// Number of slots to reserve in the hash index.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn index_capacity(&self) -> usize {
        let wanted = self.initial_capacity.min(self.capacity.get());
        if wanted == 0 {
            return 0;
        }
        (wanted as f64 / f64::from(self.load_factor)) as usize + 1
    }
}

impl fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheConfig")
            .field("capacity", &self.capacity)
            .field("initial_capacity", &self.initial_capacity)
            .field("load_factor", &self.load_factor)
            .finish()
    }
}

/// Generic configuration wrapper for concurrent caches.
///
/// Wraps a base cache configuration and adds the `concurrency_level` hint.
///
/// # Sizing Note
///
/// `capacity` in the base config applies to the **entire cache** and is
/// enforced globally: a new key only evicts once the whole cache is full, and
/// the evicted entry is the policy's global candidate. `concurrency_level` is
/// a performance hint only. It never partitions the capacity; it raises the
/// hash index pre-allocation to at least one slot per expected writer.
///
/// # Example
///
/// ```ignore
/// use lfru_cache::config::{CacheConfig, ConcurrentCacheConfig, ConcurrentLruCacheConfig};
/// use core::num::NonZeroUsize;
///
/// let config: ConcurrentLruCacheConfig = ConcurrentCacheConfig {
///     base: CacheConfig::new(NonZeroUsize::new(10_000).unwrap()),
///     concurrency_level: 16,
/// };
/// ```
#[cfg(feature = "concurrent")]
#[derive(Clone, Copy, PartialEq)]
pub struct ConcurrentCacheConfig<C = CacheConfig> {
    /// Base configuration for the underlying cache algorithm.
    pub base: C,
    /// Expected number of threads using the cache concurrently.
    pub concurrency_level: usize,
}

#[cfg(feature = "concurrent")]
impl ConcurrentCacheConfig<CacheConfig> {
    /// Creates a configuration with the given total capacity and default hints.
    #[must_use]
    pub const fn new(capacity: NonZeroUsize) -> Self {
        Self {
            base: CacheConfig::new(capacity),
            concurrency_level: DEFAULT_CONCURRENCY_LEVEL,
        }
    }

    /// Sets the concurrency level.
    #[must_use]
    pub const fn with_concurrency_level(mut self, concurrency_level: usize) -> Self {
        self.concurrency_level = concurrency_level;
        self
    }

    /// Checks the base hints and the concurrency level.
    pub fn validate(&self) -> Result<(), CacheError> {
        if self.concurrency_level == 0 {
            return Err(CacheError::ZeroConcurrencyLevel);
        }
        self.base.validate()
    }

    /// Configuration of the shared structure behind the lock.
    ///
    /// Capacity and load factor are taken unchanged; the index pre-allocation
    /// is raised to the concurrency level.
    pub(crate) fn shared_config(&self) -> CacheConfig {
        CacheConfig {
            initial_capacity: self.base.initial_capacity.max(self.concurrency_level),
            ..self.base
        }
    }
}

#[cfg(feature = "concurrent")]
impl<C: fmt::Debug> fmt::Debug for ConcurrentCacheConfig<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentCacheConfig")
            .field("base", &self.base)
            .field("concurrency_level", &self.concurrency_level)
            .finish()
    }
}

#[cfg(feature = "concurrent")]
/// Configuration for a concurrent LRU cache.
pub type ConcurrentLruCacheConfig = ConcurrentCacheConfig<LruCacheConfig>;

#[cfg(feature = "concurrent")]
/// Configuration for a concurrent LFU cache.
pub type ConcurrentLfuCacheConfig = ConcurrentCacheConfig<LfuCacheConfig>;

#[cfg(feature = "concurrent")]
/// Configuration for a concurrent LFRU cache.
pub type ConcurrentLfruCacheConfig = ConcurrentCacheConfig<LfruCacheConfig>;
