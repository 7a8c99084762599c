//! Correctness Tests for Concurrent Caches
//!
//! The eviction scenarios from `correctness_tests.rs`, replayed against the
//! concurrent caches at several concurrency levels. The level is a sizing hint
//! only, so the eviction order must match the single-threaded cache exactly
//! at every level.

#![cfg(feature = "concurrent")]

use lfru_cache::config::{
    CacheConfig, ConcurrentCacheConfig, ConcurrentLfruCacheConfig, ConcurrentLfuCacheConfig,
    ConcurrentLruCacheConfig,
};
use lfru_cache::{
    CacheError, ConcurrentBoundedCache, ConcurrentLfruCache, ConcurrentLfuCache,
    ConcurrentLruCache, LfruCache,
};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;

// ============================================================================
// HELPER FUNCTIONS FOR CACHE CREATION
// ============================================================================

fn concurrent_config(capacity: usize, concurrency_level: usize) -> ConcurrentCacheConfig {
    ConcurrentCacheConfig {
        base: CacheConfig::new(NonZeroUsize::new(capacity).unwrap()),
        concurrency_level,
    }
}

fn make_lru<K, V>(capacity: usize, level: usize) -> ConcurrentLruCache<K, V>
where
    K: std::hash::Hash + Eq + Clone + Send,
    V: Send,
{
    let config: ConcurrentLruCacheConfig = concurrent_config(capacity, level);
    ConcurrentLruCache::init(config, None).unwrap()
}

fn make_lfu<K, V>(capacity: usize, level: usize) -> ConcurrentLfuCache<K, V>
where
    K: std::hash::Hash + Eq + Clone + Send,
    V: Send,
{
    let config: ConcurrentLfuCacheConfig = concurrent_config(capacity, level);
    ConcurrentLfuCache::init(config, None).unwrap()
}

fn make_lfru<K, V>(capacity: usize, level: usize) -> ConcurrentLfruCache<K, V>
where
    K: std::hash::Hash + Eq + Clone + Send,
    V: Send,
{
    let config: ConcurrentLfruCacheConfig = concurrent_config(capacity, level);
    ConcurrentLfruCache::init(config, None).unwrap()
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

#[test]
fn test_invalid_configs_are_rejected() {
    assert_eq!(
        ConcurrentLruCache::<u32, u32>::init(concurrent_config(4, 0), None).err(),
        Some(CacheError::ZeroConcurrencyLevel)
    );
    assert_eq!(
        ConcurrentLfuCache::<u32, u32>::try_new(0).err(),
        Some(CacheError::ZeroCapacity)
    );

    let mut bad = concurrent_config(4, 2);
    bad.base.load_factor = 1.5;
    assert_eq!(
        ConcurrentLfruCache::<u32, u32>::init(bad, None).err(),
        Some(CacheError::InvalidLoadFactor(1.5))
    );
}

const LEVELS: [usize; 4] = [1, 2, 8, 64];

#[test]
fn test_default_concurrency_level() {
    let cache: ConcurrentLfruCache<u32, u32> =
        ConcurrentLfruCache::new(NonZeroUsize::new(100).unwrap());
    assert_eq!(cache.concurrency_level(), 1);
    assert_eq!(cache.capacity(), 100);
}

#[test]
fn test_capacity_is_global_at_every_level() {
    for (capacity, level) in [(10, 3), (7, 16), (1, 4), (1000, 16)] {
        let cache: ConcurrentLruCache<u32, u32> = make_lru(capacity, level);
        assert_eq!(cache.capacity(), capacity);
        assert_eq!(cache.concurrency_level(), level);
    }
}

// ============================================================================
// EXACT POLICY ORDER AT EVERY LEVEL
// ============================================================================

#[test]
fn test_lru_promotion() {
    for level in LEVELS {
        let cache = make_lru(2, level);
        cache.put("A", 1);
        cache.put("B", 2);
        cache.get(&"A");
        assert_eq!(cache.push("C", 3), Some(("B", 2)), "level {}", level);
    }
}

#[test]
fn test_lfu_lowest_count() {
    for level in LEVELS {
        let cache = make_lfu(2, level);
        cache.put("A", 1);
        cache.put("B", 2);
        cache.get(&"A");
        cache.get(&"A");
        assert_eq!(cache.push("C", 3), Some(("B", 2)), "level {}", level);
        assert!(cache.contains_key(&"A"));
        assert!(cache.contains_key(&"C"));
    }
}

#[test]
fn test_lfru_tie_break() {
    for level in LEVELS {
        let cache = make_lfru(2, level);
        cache.put("A", 1);
        cache.put("B", 2);
        cache.get(&"A");
        cache.get(&"B");
        assert_eq!(cache.push("C", 3), Some(("A", 1)), "level {}", level);
    }
}

#[test]
fn test_no_eviction_below_capacity() {
    for level in LEVELS {
        let lru = make_lru(8, level);
        let lfu = make_lfu(8, level);
        let lfru = make_lfru(8, level);
        for i in 0..8u32 {
            assert_eq!(lru.push(i, i), None, "lru evicted at {} (level {})", i, level);
            assert_eq!(lfu.push(i, i), None, "lfu evicted at {} (level {})", i, level);
            assert_eq!(lfru.push(i, i), None, "lfru evicted at {} (level {})", i, level);
        }
        assert_eq!(lru.len(), 8);
        assert_eq!(lfu.len(), 8);
        assert_eq!(lfru.len(), 8);

        // full now: exactly one entry leaves, and it is the global candidate
        assert_eq!(lru.push(8, 8), Some((0, 0)));
        assert_eq!(lfu.push(8, 8), Some((0, 0)));
        assert_eq!(lfru.push(8, 8), Some((0, 0)));
        assert_eq!(lru.len(), 8);
    }
}

#[test]
fn test_sequential_use_matches_single_threaded() {
    for level in LEVELS {
        let concurrent = make_lfru(8, level);
        let mut local = LfruCache::new(NonZeroUsize::new(8).unwrap());
        for i in 0..400u32 {
            let key = (i * 13) % 23;
            if i % 3 == 0 {
                assert_eq!(concurrent.get(&key), local.get(&key).copied());
            } else {
                assert_eq!(concurrent.push(key, i), local.push(key, i));
            }
        }
        for key in 0..23u32 {
            assert_eq!(concurrent.peek(&key), local.peek(&key).copied());
            assert_eq!(concurrent.frequency(&key), local.frequency(&key));
        }
    }
}

// ============================================================================
// SHARED CONTRACT THROUGH THE TRAIT
// ============================================================================

fn exercise<C: ConcurrentBoundedCache<u32, String>>(cache: &C) {
    assert!(cache.is_empty());
    assert_eq!(cache.put(1, "one".to_string()), None);
    assert_eq!(cache.put(1, "uno".to_string()), Some("one".to_string()));
    assert_eq!(cache.get(&1), Some("uno".to_string()));
    assert!(cache.contains_key(&1));
    assert_eq!(cache.remove(&1), Some("uno".to_string()));
    assert!(!cache.contains_key(&1));
    assert_eq!(cache.remove(&1), None);

    for i in 0..100 {
        cache.put(i, i.to_string());
        assert!(cache.len() <= cache.capacity());
    }
    cache.clear();
    assert_eq!(cache.len(), 0);
}

#[test]
fn test_trait_contract_all_policies() {
    exercise(&make_lru::<u32, String>(10, 4));
    exercise(&make_lfu::<u32, String>(10, 4));
    exercise(&make_lfru::<u32, String>(10, 4));
}

// ============================================================================
// THREADED CORRECTNESS
// ============================================================================

#[test]
fn test_disjoint_writers_lose_nothing() {
    let cache: Arc<ConcurrentLfruCache<u32, u32>> = Arc::new(make_lfru(16_384, 8));
    let handles: Vec<_> = (0..8u32)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..500 {
                    let key = t * 1000 + i;
                    cache.put(key, key * 2);
                }
                for i in (0..500).step_by(5) {
                    cache.remove(&(t * 1000 + i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // capacity is never reached, so the final state is fully determined
    assert_eq!(cache.len(), 8 * 400);
    for t in 0..8u32 {
        for i in 0..500 {
            let key = t * 1000 + i;
            if i % 5 == 0 {
                assert!(!cache.contains_key(&key));
            } else {
                assert_eq!(cache.peek(&key), Some(key * 2));
            }
        }
    }
}

#[test]
fn test_same_key_writes_keep_one_entry() {
    let cache: Arc<ConcurrentLfuCache<&'static str, usize>> = Arc::new(make_lfu(4, 2));
    let handles: Vec<_> = (0..8usize)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..1000 {
                    cache.put("shared", t * 10_000 + i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), 1);
    let value = cache.peek(&"shared").unwrap();
    // some thread's last write wins
    assert_eq!(value % 10_000, 999);
    assert_eq!(cache.frequency(&"shared"), Some(8000));
}

#[test]
fn test_concurrent_get_mut_with_is_atomic() {
    let cache: Arc<ConcurrentLruCache<&'static str, u64>> = Arc::new(make_lru(16, 4));
    cache.put("counter", 0);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for _ in 0..1000 {
                    cache.get_mut_with(&"counter", |v| *v += 1);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(cache.get(&"counter"), Some(8000));
}

#[test]
fn test_eviction_accounting_under_contention() {
    let cache: Arc<ConcurrentLruCache<u32, u32>> = Arc::new(make_lru(64, 4));
    let handles: Vec<_> = (0..8u32)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..2000 {
                    cache.put(t * 10_000 + i, i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let metrics = cache.snapshot_metrics();
    assert_eq!(cache.len(), 64);
    // every insertion either still lives in the cache or was evicted once
    assert_eq!(metrics.core.insertions, 16_000);
    assert_eq!(metrics.core.evictions, 16_000 - 64);
}

const KEY_SPACE: u32 = 200;

/// Value written by thread `t` for `key`; every value names its key.
fn tagged(key: u32, t: u32) -> u32 {
    key * 100 + t
}

fn mixed_at_capacity<C>(cache: Arc<C>) -> HashMap<u32, u32>
where
    C: ConcurrentBoundedCache<u32, u32> + 'static,
{
    let handles: Vec<_> = (0..8u32)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..3000u32 {
                    let key = (i * 31 + t * 17) % KEY_SPACE;
                    match i % 5 {
                        0 | 1 => {
                            cache.put(key, tagged(key, t));
                        }
                        2 | 3 => {
                            if let Some(value) = cache.get(&key) {
                                assert_eq!(value / 100, key);
                            }
                        }
                        _ => {
                            cache.remove(&key);
                        }
                    }
                    assert!(cache.len() <= cache.capacity());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    (0..KEY_SPACE)
        .filter(|key| cache.contains_key(key))
        .map(|key| (key, cache.get(&key).unwrap()))
        .collect()
}

fn assert_consistent(len: usize, capacity: usize, survivors: &HashMap<u32, u32>) {
    assert!(len <= capacity);
    // every key the index reports is reachable, and nothing else is stored
    assert_eq!(survivors.len(), len);
    for (key, value) in survivors {
        assert_eq!(value / 100, *key, "key {} holds another key's value", key);
        assert!(value % 100 < 8);
    }
}

#[test]
fn test_mixed_workload_at_capacity_stays_consistent() {
    for level in [1, 8] {
        let lru: Arc<ConcurrentLruCache<u32, u32>> = Arc::new(make_lru(32, level));
        let survivors = mixed_at_capacity(Arc::clone(&lru));
        assert_consistent(lru.len(), lru.capacity(), &survivors);
        let metrics = lru.snapshot_metrics();
        assert_eq!(
            metrics.core.insertions,
            metrics.core.evictions + metrics.core.removals + lru.len() as u64
        );

        let lfu: Arc<ConcurrentLfuCache<u32, u32>> = Arc::new(make_lfu(32, level));
        let survivors = mixed_at_capacity(Arc::clone(&lfu));
        assert_consistent(lfu.len(), lfu.capacity(), &survivors);

        let lfru: Arc<ConcurrentLfruCache<u32, u32>> = Arc::new(make_lfru(32, level));
        let survivors = mixed_at_capacity(Arc::clone(&lfru));
        assert_consistent(lfru.len(), lfru.capacity(), &survivors);
        let metrics = lfru.snapshot_metrics();
        assert_eq!(
            metrics.core.insertions,
            metrics.core.evictions + metrics.core.removals + lfru.len() as u64
        );
    }
}
