use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lfru_cache::config::{CacheConfig, CountMinSketchConfig};
use lfru_cache::{CountMinSketch, LfruCache, LfuCache, LruCache};
use std::num::NonZeroUsize;

const CACHE_SIZE: usize = 1000;

// Helper functions to create caches with the init pattern
fn make_config(cap: usize) -> CacheConfig {
    CacheConfig::new(NonZeroUsize::new(cap).unwrap())
}

fn make_lru<K: std::hash::Hash + Eq, V>(cap: usize) -> LruCache<K, V> {
    LruCache::init(make_config(cap), None).unwrap()
}

fn make_lfu<K: std::hash::Hash + Eq, V>(cap: usize) -> LfuCache<K, V> {
    LfuCache::init(make_config(cap), None).unwrap()
}

fn make_lfru<K: std::hash::Hash + Eq, V>(cap: usize) -> LfruCache<K, V> {
    LfruCache::init(make_config(cap), None).unwrap()
}

// Simple linear congruential generator for reproducible key streams
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    /// Skewed key: half the draws land in the first tenth of the key space.
    fn skewed(&mut self, space: usize) -> usize {
        let r = self.next() as usize;
        if r % 2 == 0 {
            r % (space / 10)
        } else {
            r % space
        }
    }
}

macro_rules! bench_policy {
    ($group:expr, $name:literal, $make:ident) => {{
        let mut cache = $make(CACHE_SIZE);
        for i in 0..CACHE_SIZE {
            cache.put(i, i);
        }

        $group.bench_function(concat!($name, " get hit"), |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i % CACHE_SIZE)));
                }
            });
        });

        $group.bench_function(concat!($name, " get miss"), |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i + CACHE_SIZE)));
                }
            });
        });

        $group.bench_function(concat!($name, " put existing"), |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.put(i % CACHE_SIZE, i));
                }
            });
        });

        let mut next = CACHE_SIZE;
        $group.bench_function(concat!($name, " put evicting"), |b| {
            b.iter(|| {
                for _ in 0..100 {
                    black_box(cache.push(next, next));
                    next += 1;
                }
            });
        });
    }};
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Cache Operations");
    bench_policy!(group, "LRU", make_lru);
    bench_policy!(group, "LFU", make_lfu);
    bench_policy!(group, "LFRU", make_lfru);
    group.finish();
}

pub fn skewed_workload(c: &mut Criterion) {
    let mut group = c.benchmark_group("Skewed Workload");
    const KEY_SPACE: usize = CACHE_SIZE * 10;

    group.bench_function("LRU", |b| {
        let mut cache = make_lru(CACHE_SIZE);
        let mut rng = Lcg(7);
        b.iter(|| {
            for _ in 0..1000 {
                let key = rng.skewed(KEY_SPACE);
                if cache.get(&key).is_none() {
                    cache.put(key, key);
                }
            }
        });
    });

    group.bench_function("LFU", |b| {
        let mut cache = make_lfu(CACHE_SIZE);
        let mut rng = Lcg(7);
        b.iter(|| {
            for _ in 0..1000 {
                let key = rng.skewed(KEY_SPACE);
                if cache.get(&key).is_none() {
                    cache.put(key, key);
                }
            }
        });
    });

    group.bench_function("LFRU", |b| {
        let mut cache = make_lfru(CACHE_SIZE);
        let mut rng = Lcg(7);
        b.iter(|| {
            for _ in 0..1000 {
                let key = rng.skewed(KEY_SPACE);
                if cache.get(&key).is_none() {
                    cache.put(key, key);
                }
            }
        });
    });

    group.finish();
}

pub fn sketch_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Count-Min Sketch");

    for width in [64usize, 1024, 16_384] {
        group.bench_with_input(BenchmarkId::new("increment", width), &width, |b, &w| {
            let mut sketch = CountMinSketch::with_config(CountMinSketchConfig::new(4, w)).unwrap();
            let mut rng = Lcg(11);
            b.iter(|| {
                for _ in 0..100 {
                    sketch.increment(&rng.next());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("estimate", width), &width, |b, &w| {
            let mut sketch = CountMinSketch::with_config(CountMinSketchConfig::new(4, w)).unwrap();
            for key in 0..10_000u64 {
                sketch.increment(&key);
            }
            b.iter(|| {
                for key in 0..100u64 {
                    black_box(sketch.estimate(&key));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark, skewed_workload, sketch_benchmark);
criterion_main!(benches);
