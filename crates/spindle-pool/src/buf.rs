//! Checked-out buffers and their typed views.

use std::ops::{Deref, DerefMut};

use bytemuck::Pod;

use crate::aligned::AlignedBuf;

/// A buffer checked out of a [`FixedArrayPool`](crate::FixedArrayPool).
///
/// Holds exactly `array_len * element_size` bytes of 64-byte-aligned
/// storage. The buffer remembers the element size it was acquired under, so
/// [`FixedArrayPool::release`](crate::FixedArrayPool::release) always
/// returns it to the correct lane — there is no way to corrupt a different
/// lane by passing a mismatched size.
///
/// A `PoolBuf` must be released to recycle its storage. Dropping it instead
/// frees the memory (exactly once, by ownership) but permanently removes
/// the buffer from the pool's inventory. For automatic return on every exit
/// path use [`ScopedBuf`](crate::ScopedBuf).
#[must_use]
pub struct PoolBuf {
    data: AlignedBuf,
    element_size: usize,
}

impl PoolBuf {
    pub(crate) fn new(data: AlignedBuf, element_size: usize) -> Self {
        Self { data, element_size }
    }

    pub(crate) fn into_parts(self) -> (AlignedBuf, usize) {
        (self.data, self.element_size)
    }

    /// The element byte size this buffer was acquired under (its lane key).
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Number of elements in the buffer (the pool's fixed array length).
    pub fn array_len(&self) -> usize {
        self.data.len() / self.element_size
    }

    /// Total usable length in bytes (`array_len * element_size`).
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// The buffer contents as raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_bytes()
    }

    /// The buffer contents as mutable raw bytes.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.data.as_bytes_mut()
    }

    /// View the buffer as `array_len` elements of type `T`.
    ///
    /// # Panics
    ///
    /// Panics if `size_of::<T>()` differs from the element size the buffer
    /// was acquired under, or if `align_of::<T>()` exceeds 64.
    pub fn as_elems<T: Pod>(&self) -> &[T] {
        assert_eq!(
            std::mem::size_of::<T>(),
            self.element_size,
            "element type size does not match the buffer's lane"
        );
        bytemuck::cast_slice(self.data.as_bytes())
    }

    /// View the buffer as `array_len` mutable elements of type `T`.
    ///
    /// # Panics
    ///
    /// Same conditions as [`PoolBuf::as_elems`].
    pub fn as_elems_mut<T: Pod>(&mut self) -> &mut [T] {
        assert_eq!(
            std::mem::size_of::<T>(),
            self.element_size,
            "element type size does not match the buffer's lane"
        );
        bytemuck::cast_slice_mut(self.data.as_bytes_mut())
    }
}

impl Deref for PoolBuf {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.data.as_bytes()
    }
}

impl DerefMut for PoolBuf {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.data.as_bytes_mut()
    }
}
