//! # Slot Storage Benchmark
//!
//! Allocation churn and occupancy enumeration on a large storage:
//! - Freed IDs must be reused without growing the backing slots
//! - `occupied()` must rebuild at most once per mutation batch
//!
//! Run with: `cargo bench --package tessera_memory --bench storage_benchmark`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tessera_memory::{QuickPool, SlotId, SlotStorage};

/// Live objects kept in the storage between iterations.
const LIVE_COUNT: usize = 100_000;

#[derive(Clone, Copy, Default)]
struct Body {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
}

fn filled(count: usize) -> (SlotStorage<Body>, Vec<SlotId>) {
    let mut storage = SlotStorage::with_capacity(count);
    let ids = (0..count)
        .map(|i| {
            let f = i as f32;
            storage.insert(Body { x: f, y: f, vx: 0.5, vy: -0.5 })
        })
        .collect();
    (storage, ids)
}

/// Benchmark: Insert N bodies into an empty storage.
fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage_insert");

    for count in [1_000, 10_000, LIVE_COUNT] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut storage: SlotStorage<Body> = SlotStorage::with_capacity(count);
                for _ in 0..count {
                    black_box(storage.allocate());
                }
                storage.count()
            });
        });
    }

    group.finish();
}

/// Benchmark: Remove and reallocate 10% of a full storage in random order.
fn bench_churn(c: &mut Criterion) {
    let (mut storage, mut ids) = filled(LIVE_COUNT);
    let mut rng = ChaCha8Rng::seed_from_u64(0x7e55);
    ids.shuffle(&mut rng);

    c.bench_function("storage_churn_10K_of_100K", |b| {
        b.iter(|| {
            for id in ids.iter().take(10_000) {
                storage.remove(*id);
            }
            for id in ids.iter_mut().take(10_000) {
                *id = storage.insert(Body::default());
            }
            black_box(storage.len())
        });
    });
}

/// Benchmark: Rebuild the occupancy list after churn vs reading a fresh one.
fn bench_occupied(c: &mut Criterion) {
    let (mut storage, ids) = filled(LIVE_COUNT);
    for id in ids.iter().step_by(3) {
        storage.remove(*id);
    }

    let mut group = c.benchmark_group("storage_occupied");
    group.bench_function("rebuild", |b| {
        b.iter(|| {
            let id = storage.insert(Body::default());
            let live = storage.occupied().len();
            storage.remove(id);
            black_box(live)
        });
    });
    group.bench_function("cached", |b| {
        storage.occupied();
        b.iter(|| black_box(storage.occupied().len()));
    });
    group.finish();
}

/// Benchmark: Integrate every live body through `iter_mut`.
fn bench_iter_update(c: &mut Criterion) {
    let (mut storage, ids) = filled(LIVE_COUNT);
    for id in ids.iter().step_by(4) {
        storage.remove(*id);
    }

    c.bench_function("storage_iter_mut_75K", |b| {
        b.iter(|| {
            for (_, body) in storage.iter_mut() {
                body.x += body.vx;
                body.y += body.vy;
            }
            black_box(storage.count())
        });
    });
}

/// Benchmark: One frame of scratch objects through a quick pool.
fn bench_pool_frame(c: &mut Criterion) {
    let mut pool: QuickPool<Body> = QuickPool::with_capacity(10_000);

    c.bench_function("quick_pool_frame_10K", |b| {
        b.iter(|| {
            for i in 0..10_000 {
                pool.item().x = i as f32;
            }
            let used = pool.in_use();
            pool.restart();
            black_box(used)
        });
    });
}

criterion_group!(
    benches,
    bench_insert,
    bench_churn,
    bench_occupied,
    bench_iter_update,
    bench_pool_frame,
);

criterion_main!(benches);
