#![no_std]
extern crate alloc;
extern crate lfru_cache;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::num::NonZeroUsize;
use lfru_cache::config::{CacheConfig, CountMinSketchConfig};
use lfru_cache::CountMinSketch;
use lfru_cache::LfruCache;
use lfru_cache::LfuCache;
use lfru_cache::LruCache;

// Helper functions to create caches with the init pattern
fn make_lru<K: core::hash::Hash + Eq, V>(cap: usize) -> LruCache<K, V> {
    LruCache::init(CacheConfig::new(NonZeroUsize::new(cap).unwrap()), None).unwrap()
}

fn make_lfu<K: core::hash::Hash + Eq, V>(cap: usize) -> LfuCache<K, V> {
    LfuCache::init(CacheConfig::new(NonZeroUsize::new(cap).unwrap()), None).unwrap()
}

fn make_lfru<K: core::hash::Hash + Eq, V>(cap: usize) -> LfruCache<K, V> {
    LfruCache::init(CacheConfig::new(NonZeroUsize::new(cap).unwrap()), None).unwrap()
}

#[test]
fn test_lru_in_no_std() {
    let mut cache = make_lru(2);

    // Using String as it requires the alloc crate
    let key1 = String::from("key1");
    let key2 = String::from("key2");
    let key3 = String::from("key3");

    cache.put(key1.clone(), 1);
    cache.put(key2.clone(), 2);

    assert_eq!(*cache.get(&key1).unwrap(), 1);
    assert_eq!(*cache.get(&key2).unwrap(), 2);

    // This should evict key1
    cache.put(key3.clone(), 3);

    assert!(cache.get(&key1).is_none());
    assert_eq!(*cache.get(&key2).unwrap(), 2);
    assert_eq!(*cache.get(&key3).unwrap(), 3);
}

#[test]
fn test_lfu_in_no_std() {
    let mut cache = make_lfu(2);

    let key1 = String::from("key1");
    let key2 = String::from("key2");

    cache.put(key1.clone(), 1);
    cache.put(key2.clone(), 2);

    // Access key1 multiple times to increase its frequency
    cache.get(&key1);
    cache.get(&key1);

    // Add a new item, which should evict key2 (lower frequency)
    let key3 = String::from("key3");
    cache.put(key3.clone(), 3);

    assert_eq!(*cache.get(&key1).unwrap(), 1);
    assert!(cache.get(&key2).is_none());
    assert_eq!(*cache.get(&key3).unwrap(), 3);
}

#[test]
fn test_lfru_in_no_std() {
    let mut cache = make_lfru(4);

    let keys: Vec<String> = (0..5).map(|i| format!("key{i}")).collect();

    for (i, key) in keys.iter().enumerate().take(4) {
        cache.put(key.clone(), i);
    }

    // Every key but key2 gets one extra access, key0 goes last
    for i in [1, 3, 0] {
        cache.get(&keys[i]);
    }

    // key2 is alone in the lowest bucket
    cache.put(keys[4].clone(), 4);
    assert!(cache.get(&keys[2]).is_none());

    // key4 is the only newcomer at count 1 and goes next
    cache.put(String::from("key5"), 5);
    assert!(!cache.contains_key(&keys[4]));
    cache.get(&String::from("key5"));
    // key1 is now the oldest entry at count 2
    assert_eq!(cache.peek_eviction_candidate().map(|(k, _)| k.as_str()), Some("key1"));
}

#[test]
fn test_sketch_in_no_std() {
    let config = CountMinSketchConfig::new(3, 64).with_seed(42);
    let mut sketch = CountMinSketch::with_config(config).unwrap();

    let key = String::from("key");
    for _ in 0..10 {
        sketch.increment(&key);
    }
    assert!(sketch.estimate(&key) >= 10);
    assert_eq!(sketch.depth(), 3);
    assert_eq!(sketch.width(), 64);

    sketch.clear();
    assert_eq!(sketch.estimate(&key), 0);
}

#[test]
fn test_complex_types_in_no_std() {
    // Test with more complex types that require alloc
    let mut cache = make_lfru(2);

    let key1 = Vec::<u8>::from([1, 2, 3]);
    let value1 = Vec::<i32>::from([10, 20, 30]);

    let key2 = Vec::<u8>::from([4, 5, 6]);
    let value2 = Vec::<i32>::from([40, 50, 60]);

    cache.put(key1.clone(), value1.clone());
    cache.put(key2.clone(), value2.clone());

    assert_eq!(*cache.get(&key1).unwrap(), value1);
    assert_eq!(*cache.get(&key2).unwrap(), value2);
    assert_eq!(cache.get(&[1u8, 2, 3][..]), Some(&value1));
}
