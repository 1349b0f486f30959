//! Recycling pool for fixed-length arrays of varying element sizes.
//!
//! Content pipelines repeatedly need arrays of the same element count —
//! per-pixel bake records, per-node evaluation tuples — but of different
//! per-element byte sizes. [`FixedArrayPool`] is built for exactly that
//! shape of workload: one pool per array length, with a bank of LIFO
//! free-lists ("lanes") keyed by element byte size, so a released buffer is
//! handed straight back to the next caller with the same geometry instead
//! of going through the system allocator.
//!
//! # Architecture
//!
//! ```text
//! FixedArrayPool (one per array length N)
//! ├── lanes: SmallVec<[Lane; 16]>   indexed by element_size - 1
//! │   └── Lane: Vec<AlignedBuf>     LIFO stack of free buffers
//! ├── PoolBuf                       checked-out buffer (owns its storage)
//! └── ScopedBuf<'pool>              RAII checkout, returns on drop
//! ```
//!
//! Buffers are 64-byte aligned, zeroed when fresh, and keep their previous
//! contents when recycled. The pool is single-threaded by construction
//! (`!Sync`); use one pool per worker on hot paths.
//!
//! This crate contains one bounded block of `unsafe` (in `aligned.rs`, with
//! a mandatory `// SAFETY:` comment); everything else is forbidden from
//! using it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

mod aligned;
pub mod buf;
pub mod error;
pub mod pool;
pub mod scoped;

// Public re-exports for the primary API surface.
pub use buf::PoolBuf;
pub use error::PoolError;
pub use pool::FixedArrayPool;
pub use scoped::ScopedBuf;

/// Alignment of every buffer the pool produces, in bytes.
pub use aligned::BUFFER_ALIGN;
