//! Error types for cache construction.
//!
//! All cache operations after construction are infallible: a missing key is
//! reported as `None`, never as an error. The only failures are invalid
//! configuration values, which are rejected before a cache becomes usable.
//!
//! # Examples
//!
//! ```
//! use lfru_cache::{CacheError, LruCache};
//!
//! let cache: Result<LruCache<u32, u32>, CacheError> = LruCache::try_new(0);
//! assert_eq!(cache.err(), Some(CacheError::ZeroCapacity));
//! ```

/// Error returned when a cache or sketch is configured with invalid parameters.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CacheError {
    /// The requested capacity was zero.
    #[error("cache capacity must be greater than zero")]
    ZeroCapacity,

    /// The load factor hint was not a finite value in `(0, 1]`.
    #[error("load factor must be in (0, 1], got {0}")]
    InvalidLoadFactor(f32),

    /// A concurrent cache was configured with a concurrency level of zero.
    #[error("concurrency level must be greater than zero")]
    ZeroConcurrencyLevel,

    /// A count-min sketch was configured with a zero dimension or with more
    /// counters than can be allocated.
    #[error("sketch dimensions must be non-zero and fit in memory, got depth {depth} and width {width}")]
    InvalidSketchDimensions {
        /// Requested number of hash rows.
        depth: usize,
        /// Requested number of counters per row.
        width: usize,
    },
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CacheError::ZeroCapacity.to_string(),
            "cache capacity must be greater than zero"
        );
        assert_eq!(
            CacheError::InvalidLoadFactor(1.5).to_string(),
            "load factor must be in (0, 1], got 1.5"
        );
        assert_eq!(
            CacheError::InvalidSketchDimensions { depth: 0, width: 8 }.to_string(),
            "sketch dimensions must be non-zero and fit in memory, got depth 0 and width 8"
        );
    }
}
