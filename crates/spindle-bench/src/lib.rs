//! Benchmark workloads for the spindle buffer pool.
//!
//! Provides the reference workload shapes used by the benches:
//!
//! - [`record_sizes`]: the per-element byte sizes a bake/eval pipeline
//!   typically requests (scalars up to 16-field tuples)
//! - [`churn`]: a fixed acquire/release cycle across those sizes

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use spindle_pool::FixedArrayPool;

/// Per-element byte sizes seen in the reference pipelines: a float scalar,
/// a 2D/3D/4D tuple, and a 16-float record.
pub fn record_sizes() -> [usize; 5] {
    [4, 8, 12, 16, 64]
}

/// Run `rounds` acquire/write/release cycles across all reference sizes.
///
/// Returns the number of fresh allocations the pool made, which after the
/// first round should stop growing (everything recycles).
pub fn churn(pool: &FixedArrayPool, rounds: usize) -> usize {
    for _ in 0..rounds {
        for size in record_sizes() {
            let mut buf = pool.acquire(size).expect("benchmark pool allocation");
            buf.as_bytes_mut()[0] = 1;
            pool.release(buf);
        }
    }
    pool.fresh_allocations()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn churn_stops_allocating_after_first_round() {
        let pool = FixedArrayPool::new(1024).unwrap();
        let fresh = churn(&pool, 10);
        assert_eq!(fresh, record_sizes().len());
    }
}
