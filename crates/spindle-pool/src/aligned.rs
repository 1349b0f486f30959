//! Cache-line-aligned byte storage.
//!
//! [`AlignedBuf`] backs every buffer the pool hands out. Storage is a `Vec`
//! of 64-byte chunks, so the first byte of every buffer sits on a 64-byte
//! boundary and SIMD-friendly access patterns work for any element type.
//!
//! This module contains the crate's only `unsafe` code: the two trait impls
//! that let `bytemuck` view the chunk vector as plain bytes.

#![allow(unsafe_code)]

use bytemuck::{Pod, Zeroable};

use crate::error::PoolError;

/// Alignment (and chunk size) of all pool storage, in bytes.
pub const BUFFER_ALIGN: usize = 64;

/// One 64-byte-aligned storage chunk.
#[derive(Clone, Copy, Debug)]
#[repr(C, align(64))]
struct CacheLine([u8; BUFFER_ALIGN]);

// SAFETY: `CacheLine` is a plain byte array with explicit alignment. Size
// (64) equals alignment, so there is no padding, and every bit pattern is
// valid.
unsafe impl Zeroable for CacheLine {}
unsafe impl Pod for CacheLine {}

/// Owned, 64-byte-aligned byte storage of a fixed usable length.
///
/// The usable length is exact (`array_len * element_size` at the call site);
/// the backing vector rounds up to whole cache lines. Fresh buffers are
/// zero-initialised. The allocation is fallible: construction reserves
/// through [`Vec::try_reserve_exact`] so an out-of-memory condition surfaces
/// as [`PoolError::OutOfMemory`] instead of aborting.
#[derive(Debug)]
pub(crate) struct AlignedBuf {
    chunks: Vec<CacheLine>,
    len: usize,
}

impl AlignedBuf {
    /// Allocate a zeroed buffer with exactly `len` usable bytes.
    pub(crate) fn with_len(len: usize) -> Result<Self, PoolError> {
        let chunk_count = len.div_ceil(BUFFER_ALIGN);
        let mut chunks: Vec<CacheLine> = Vec::new();
        chunks
            .try_reserve_exact(chunk_count)
            .map_err(|_| PoolError::OutOfMemory { requested: len })?;
        chunks.resize(chunk_count, CacheLine::zeroed());
        Ok(Self { chunks, len })
    }

    /// Usable length in bytes.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Bytes actually resident in memory (rounded up to whole cache lines).
    pub(crate) fn resident_bytes(&self) -> usize {
        self.chunks.len() * BUFFER_ALIGN
    }

    /// The usable bytes as a shared slice.
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &bytemuck::cast_slice(&self.chunks)[..self.len]
    }

    /// The usable bytes as a mutable slice.
    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut(&mut self.chunks)[..self.len]
    }
}
