use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dashmap::DashMap;
use shardkv::{HashFunction, KeyValueStore, ShardMapBuilder, ShardedMap, SingleLockMap};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const SHARD_COUNTS: [usize; 4] = [4, 10, 16, 64];
const NUM_THREADS: usize = 8;

fn keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("key_{}", i)).collect()
}

fn sharded(shard_count: usize) -> ShardedMap<usize> {
    ShardedMap::create(shard_count).unwrap()
}

fn bench_put(c: &mut Criterion) {
    let mut group = c.benchmark_group("put");
    let keys = keys(1000);

    group.bench_function("single_lock", |b| {
        let map = SingleLockMap::new();
        b.iter(|| {
            for (i, key) in keys.iter().enumerate() {
                map.put(key.clone(), i);
            }
        });
    });

    group.bench_function("dashmap", |b| {
        let map = DashMap::new();
        b.iter(|| {
            for (i, key) in keys.iter().enumerate() {
                map.insert(key.clone(), i);
            }
        });
    });

    for shard_count in SHARD_COUNTS {
        group.bench_with_input(
            BenchmarkId::new("sharded", shard_count),
            &shard_count,
            |b, &shard_count| {
                let map = sharded(shard_count);
                b.iter(|| {
                    for (i, key) in keys.iter().enumerate() {
                        map.put(key.clone(), i);
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    let keys = keys(1000);

    let single = SingleLockMap::new();
    let dashmap = DashMap::new();
    for (i, key) in keys.iter().enumerate() {
        single.put(key.clone(), i);
        dashmap.insert(key.clone(), i);
    }

    group.bench_function("single_lock", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(single.get(key));
            }
        });
    });

    group.bench_function("dashmap", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(dashmap.get(key).map(|v| *v));
            }
        });
    });

    for shard_count in SHARD_COUNTS {
        let map = sharded(shard_count);
        for (i, key) in keys.iter().enumerate() {
            map.put(key.clone(), i);
        }
        group.bench_with_input(BenchmarkId::new("sharded", shard_count), &map, |b, map| {
            b.iter(|| {
                for key in &keys {
                    black_box(map.get(key));
                }
            });
        });
    }

    group.finish();
}

fn bench_routing(c: &mut Criterion) {
    let mut group = c.benchmark_group("routing");
    let keys = keys(1000);

    for hash_fn in [HashFunction::Fnv1, HashFunction::AHash] {
        let map = ShardMapBuilder::new()
            .shard_count(16)
            .unwrap()
            .hash_function(hash_fn)
            .build::<usize>()
            .unwrap();
        group.bench_function(format!("{:?}", hash_fn), |b| {
            b.iter(|| {
                for key in &keys {
                    black_box(map.shard_index(key));
                }
            });
        });
    }

    group.finish();
}

/// Run `NUM_THREADS` workers against a fresh store, 70% reads / 30% writes.
fn run_mixed(store: Arc<dyn KeyValueStore<usize>>, ops_per_thread: usize) -> Duration {
    let start = Instant::now();
    let mut handles = vec![];

    for thread_id in 0..NUM_THREADS {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for i in 0..ops_per_thread {
                let n = thread_id * ops_per_thread + i;
                if i % 10 < 3 {
                    store.put(n.to_string(), n);
                } else {
                    black_box(store.get(&(n % (NUM_THREADS * ops_per_thread)).to_string()));
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
    start.elapsed()
}

fn bench_concurrent_put(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_put");
    let ops_per_thread = 10_000;

    let run = |store: Arc<dyn KeyValueStore<usize>>| {
        let start = Instant::now();
        let mut handles = vec![];
        for thread_id in 0..NUM_THREADS {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let n = thread_id * ops_per_thread + i;
                    store.put(n.to_string(), n);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        start.elapsed()
    };

    group.bench_function("single_lock", |b| {
        b.iter_custom(|iters| {
            (0..iters)
                .map(|_| run(Arc::new(SingleLockMap::<usize>::new())))
                .sum()
        });
    });

    for shard_count in SHARD_COUNTS {
        group.bench_with_input(
            BenchmarkId::new("sharded", shard_count),
            &shard_count,
            |b, &shard_count| {
                b.iter_custom(|iters| {
                    (0..iters)
                        .map(|_| run(Arc::new(sharded(shard_count))))
                        .sum()
                });
            },
        );
    }

    group.finish();
}

fn bench_mixed_workload(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_workload");
    let ops_per_thread = 5_000;

    group.bench_function("single_lock", |b| {
        b.iter_custom(|iters| {
            (0..iters)
                .map(|_| run_mixed(Arc::new(SingleLockMap::<usize>::new()), ops_per_thread))
                .sum()
        });
    });

    for shard_count in SHARD_COUNTS {
        group.bench_with_input(
            BenchmarkId::new("sharded", shard_count),
            &shard_count,
            |b, &shard_count| {
                b.iter_custom(|iters| {
                    (0..iters)
                        .map(|_| run_mixed(Arc::new(sharded(shard_count)), ops_per_thread))
                        .sum()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_put,
    bench_get,
    bench_routing,
    bench_concurrent_put,
    bench_mixed_workload
);
criterion_main!(benches);
