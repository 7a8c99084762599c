//! Count-Min Sketch frequency estimator.
//!
//! A Count-Min Sketch keeps `depth` rows of `width` counters. Each row hashes
//! a key to one column with its own seed. Incrementing a key bumps one counter
//! per row, and the estimate is the smallest of those counters.
//!
//! Collisions can only add to a counter, so an estimate never falls below the
//! true number of increments since the last `clear`. It may exceed it. The
//! sketch uses `depth * width` counters regardless of how many distinct keys
//! are seen.
//!
//! Counters saturate at `u32::MAX` instead of wrapping.
//!
//! # Examples
//!
//! ```
//! use lfru_cache::CountMinSketch;
//!
//! let mut sketch = CountMinSketch::new();
//! sketch.increment(&"apple");
//! sketch.increment(&"apple");
//! sketch.increment(&"pear");
//!
//! assert!(sketch.estimate(&"apple") >= 2);
//! assert!(sketch.estimate(&"pear") >= 1);
//!
//! sketch.clear();
//! assert_eq!(sketch.estimate(&"apple"), 0);
//! ```

extern crate alloc;

use crate::config::CountMinSketchConfig;
use crate::error::CacheError;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::hash::{BuildHasher, Hash};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// Probabilistic frequency counter with bounded memory.
///
/// See the [module documentation](self) for the guarantees.
pub struct CountMinSketch<S = DefaultHashBuilder> {
    counters: Vec<u32>,
    seeds: Vec<u64>,
    width: usize,
    hash_builder: S,
}

impl CountMinSketch<DefaultHashBuilder> {
    /// Creates a sketch with the default dimensions (4 rows of 128 counters)
    /// and a random seed.
    pub fn new() -> Self {
        let hash_builder = DefaultHashBuilder::default();
        let seed = hash_builder.hash_one(0x5EED_u64);
        let config = CountMinSketchConfig::default().with_seed(seed);
        let counters = vec![0; config.depth * config.width];
        Self::build(config, hash_builder, counters)
    }

    /// Creates a sketch from a configuration.
    pub fn with_config(config: CountMinSketchConfig) -> Result<Self, CacheError> {
        Self::with_config_and_hasher(config, DefaultHashBuilder::default())
    }
}

impl Default for CountMinSketch<DefaultHashBuilder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: BuildHasher> CountMinSketch<S> {
    /// Creates a sketch from a configuration and a hash builder.
    ///
    /// With an explicit `seed` and a deterministic hash builder the column
    /// chosen for every key is reproducible across runs.
    ///
    /// Returns [`CacheError::InvalidSketchDimensions`] when a dimension is
    /// zero, when `depth * width` overflows, or when the table cannot be
    /// allocated.
    pub fn with_config_and_hasher(
        config: CountMinSketchConfig,
        hash_builder: S,
    ) -> Result<Self, CacheError> {
        let len = config.counter_count()?;
        let mut counters = Vec::new();
        counters
            .try_reserve_exact(len)
            .map_err(|_| config.invalid())?;
        counters.resize(len, 0);
        Ok(Self::build(config, hash_builder, counters))
    }

    fn build(config: CountMinSketchConfig, hash_builder: S, counters: Vec<u32>) -> Self {
        let mut state = match config.seed {
            Some(seed) => seed,
            None => hash_builder.hash_one(0x5EED_u64),
        };
        let seeds = (0..config.depth).map(|_| splitmix64(&mut state)).collect();
        log::debug!(
            "created count-min sketch with depth {} and width {}",
            config.depth,
            config.width
        );
        Self {
            counters,
            seeds,
            width: config.width,
            hash_builder,
        }
    }

    /// Number of hash rows.
    #[inline]
    pub fn depth(&self) -> usize {
        self.seeds.len()
    }

    /// Number of counters per row.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Records one occurrence of `key`.
    #[inline]
    pub fn increment<Q: Hash + ?Sized>(&mut self, key: &Q) {
        self.increment_by(key, 1);
    }

    /// Records `count` occurrences of `key`.
    pub fn increment_by<Q: Hash + ?Sized>(&mut self, key: &Q, count: u32) {
        let hash = self.hash_builder.hash_one(key);
        for row in 0..self.seeds.len() {
            let idx = self.cell(row, hash);
            self.counters[idx] = self.counters[idx].saturating_add(count);
        }
    }

    /// Estimated number of occurrences of `key` since the last `clear`.
    ///
    /// Never smaller than the true count.
    pub fn estimate<Q: Hash + ?Sized>(&self, key: &Q) -> u32 {
        let hash = self.hash_builder.hash_one(key);
        (0..self.seeds.len())
            .map(|row| self.counters[self.cell(row, hash)])
            .min()
            .unwrap_or(0)
    }

    /// Resets every counter to zero.
    pub fn clear(&mut self) {
        self.counters.fill(0);
        log::trace!("cleared count-min sketch");
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn cell(&self, row: usize, hash: u64) -> usize {
        let col = (mix64(hash ^ self.seeds[row]) % self.width as u64) as usize;
        row * self.width + col
    }
}

impl<S> fmt::Debug for CountMinSketch<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountMinSketch")
            .field("depth", &self.seeds.len())
            .field("width", &self.width)
            .finish()
    }
}

/// Advances a splitmix64 state and returns the next output.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    mix64(*state)
}

/// splitmix64 finalizer.
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::sketch::MAX_SKETCH_COUNTERS;

    fn seeded(depth: usize, width: usize) -> CountMinSketch {
        CountMinSketch::with_config(CountMinSketchConfig::new(depth, width).with_seed(7)).unwrap()
    }

    #[test]
    fn test_default_dimensions() {
        let sketch = CountMinSketch::new();
        assert_eq!(sketch.depth(), 4);
        assert_eq!(sketch.width(), 128);
        assert_eq!(sketch.estimate(&"never seen"), 0);
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        assert!(CountMinSketch::with_config(CountMinSketchConfig::new(0, 8)).is_err());
        assert!(CountMinSketch::with_config(CountMinSketchConfig::new(8, 0)).is_err());
    }

    #[test]
    fn test_oversized_table_is_an_error() {
        let wrapping = CountMinSketchConfig::new(usize::MAX / 2 + 1, 2).with_seed(1);
        assert_eq!(
            CountMinSketch::with_config(wrapping).err(),
            Some(CacheError::InvalidSketchDimensions {
                depth: usize::MAX / 2 + 1,
                width: 2
            })
        );

        let unallocatable = CountMinSketchConfig::new(1, MAX_SKETCH_COUNTERS).with_seed(1);
        assert!(CountMinSketch::with_config(unallocatable).is_err());
    }

    #[test]
    fn test_never_undercounts() {
        let mut sketch = seeded(4, 16);
        for key in 0..200u32 {
            for _ in 0..(key % 5) {
                sketch.increment(&key);
            }
        }
        for key in 0..200u32 {
            assert!(sketch.estimate(&key) >= key % 5);
        }
    }

    #[test]
    fn test_exact_without_collisions() {
        let mut sketch = seeded(4, 4096);
        sketch.increment(&"a");
        sketch.increment(&"a");
        sketch.increment(&"a");
        assert_eq!(sketch.estimate(&"a"), 3);
    }

    #[test]
    fn test_estimate_is_monotonic() {
        let mut sketch = seeded(3, 8);
        let mut last = 0;
        for i in 0..100u32 {
            sketch.increment(&(i % 13));
            let now = sketch.estimate(&0u32);
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn test_increment_by_saturates() {
        let mut sketch = seeded(2, 8);
        sketch.increment_by(&1u8, u32::MAX - 1);
        sketch.increment_by(&1u8, 10);
        assert_eq!(sketch.estimate(&1u8), u32::MAX);
    }

    #[test]
    fn test_clear_resets() {
        let mut sketch = seeded(4, 32);
        sketch.increment(&"x");
        sketch.clear();
        assert_eq!(sketch.estimate(&"x"), 0);
        sketch.increment(&"x");
        assert!(sketch.estimate(&"x") >= 1);
    }
}
