//! Criterion micro-benchmarks for pool acquire/release and scoped checkout.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use spindle_bench::record_sizes;
use spindle_pool::FixedArrayPool;

/// Array length matching the reference bake tile (64x64 pixels).
const TILE_PIXELS: usize = 64 * 64;

/// Benchmark: single-size acquire/release cycle on a warm lane.
fn bench_acquire_release_warm(c: &mut Criterion) {
    let pool = FixedArrayPool::new(TILE_PIXELS).unwrap();
    // Warm the lane so the loop measures recycling, not allocation.
    let warm = pool.acquire(16).unwrap();
    pool.release(warm);

    c.bench_function("acquire_release_warm_16b", |b| {
        b.iter(|| {
            let buf = pool.acquire(16).unwrap();
            black_box(buf.as_bytes()[0]);
            pool.release(buf);
        });
    });
}

/// Benchmark: scoped checkout overhead over the raw pair.
fn bench_scoped_checkout(c: &mut Criterion) {
    let pool = FixedArrayPool::new(TILE_PIXELS).unwrap();
    drop(pool.scoped(16).unwrap());

    c.bench_function("scoped_checkout_16b", |b| {
        b.iter(|| {
            let scoped = pool.scoped(16).unwrap();
            black_box(scoped.as_bytes()[0]);
        });
    });
}

/// Benchmark: cycling through all reference record sizes.
fn bench_mixed_sizes(c: &mut Criterion) {
    let pool = FixedArrayPool::new(TILE_PIXELS).unwrap();
    for size in record_sizes() {
        let buf = pool.acquire(size).unwrap();
        pool.release(buf);
    }

    c.bench_function("acquire_release_mixed_sizes", |b| {
        b.iter(|| {
            for size in record_sizes() {
                let buf = pool.acquire(size).unwrap();
                black_box(buf.byte_len());
                pool.release(buf);
            }
        });
    });
}

/// Benchmark: the system-allocator path the pool exists to avoid.
fn bench_fresh_vec_baseline(c: &mut Criterion) {
    c.bench_function("fresh_vec_baseline_16b", |b| {
        b.iter(|| {
            let buf = vec![0u8; TILE_PIXELS * 16];
            black_box(buf[0]);
        });
    });
}

criterion_group!(
    benches,
    bench_acquire_release_warm,
    bench_scoped_checkout,
    bench_mixed_sizes,
    bench_fresh_vec_baseline
);
criterion_main!(benches);
