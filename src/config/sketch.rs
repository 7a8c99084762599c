//! Count-Min Sketch Configuration

use crate::error::CacheError;
use core::fmt;

/// Default number of hash rows.
pub const DEFAULT_SKETCH_DEPTH: usize = 4;

/// Default number of counters per row.
pub const DEFAULT_SKETCH_WIDTH: usize = 128;

/// Largest `depth * width` a sketch accepts.
///
/// Bounded by the `u64` row seeds, the widest per-element allocation, so that
/// neither the counter table nor the seeds can exceed `isize::MAX` bytes.
pub const MAX_SKETCH_COUNTERS: usize = isize::MAX as usize / core::mem::size_of::<u64>();

/// Configuration for a [`CountMinSketch`](crate::CountMinSketch).
///
/// # Fields
///
/// - `depth`: Number of independent hash rows. More rows lower the chance of
///   an overestimate.
/// - `width`: Counters per row. Wider rows lower the size of an overestimate.
/// - `seed`: Seed for the per-row hash functions. `None` draws one from the
///   process-local random hasher state.
///
/// # Examples
///
/// ```
/// use lfru_cache::config::CountMinSketchConfig;
///
/// let config = CountMinSketchConfig {
///     depth: 5,
///     width: 1024,
///     seed: Some(42),
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(CountMinSketchConfig::default().width, 128);
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CountMinSketchConfig {
    /// Number of hash rows.
    pub depth: usize,
    /// Number of counters per row.
    pub width: usize,
    /// Explicit seed for the row hashes.
    pub seed: Option<u64>,
}

impl Default for CountMinSketchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_SKETCH_DEPTH,
            width: DEFAULT_SKETCH_WIDTH,
            seed: None,
        }
    }
}

impl CountMinSketchConfig {
    /// Creates a configuration with the given dimensions and a random seed.
    #[must_use]
    pub const fn new(depth: usize, width: usize) -> Self {
        Self {
            depth,
            width,
            seed: None,
        }
    }

    /// Sets an explicit seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rejects zero dimensions and tables larger than [`MAX_SKETCH_COUNTERS`].
    pub fn validate(&self) -> Result<(), CacheError> {
        self.counter_count().map(|_| ())
    }

    /// Total number of counters, `depth * width`.
    pub(crate) fn counter_count(&self) -> Result<usize, CacheError> {
        match self.depth.checked_mul(self.width) {
            Some(n) if n > 0 && n <= MAX_SKETCH_COUNTERS => Ok(n),
            _ => Err(self.invalid()),
        }
    }

    pub(crate) fn invalid(&self) -> CacheError {
        CacheError::InvalidSketchDimensions {
            depth: self.depth,
            width: self.width,
        }
    }
}

impl fmt::Debug for CountMinSketchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountMinSketchConfig")
            .field("depth", &self.depth)
            .field("width", &self.width)
            .field("seed", &self.seed)
            .finish()
    }
}
