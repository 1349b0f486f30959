//! Scope-bound checkouts that return their buffer on drop.

use std::ops::{Deref, DerefMut};

use bytemuck::Pod;

use crate::buf::PoolBuf;
use crate::pool::FixedArrayPool;

/// A checkout that returns its buffer to the pool when dropped.
///
/// Created by [`FixedArrayPool::scoped`] or [`FixedArrayPool::scoped_of`].
/// The buffer goes back to its lane exactly once on every exit path from
/// the enclosing scope: normal completion, early return, or unwinding.
///
/// The guard is move-only; moving it transfers the release obligation, and
/// the language guarantees the origin of a move is never dropped, so a
/// double return cannot be expressed. [`ScopedBuf::detach`] opts out of the
/// automatic return and hands back the underlying [`PoolBuf`] for manual
/// release.
#[must_use]
pub struct ScopedBuf<'a> {
    pool: &'a FixedArrayPool,
    /// `Some` for the guard's whole life; taken only by `detach` and `drop`.
    buf: Option<PoolBuf>,
}

impl<'a> ScopedBuf<'a> {
    pub(crate) fn new(pool: &'a FixedArrayPool, buf: PoolBuf) -> Self {
        Self {
            pool,
            buf: Some(buf),
        }
    }

    /// The element byte size this checkout was acquired under.
    pub fn element_size(&self) -> usize {
        self.get().element_size()
    }

    /// Number of elements in the buffer.
    pub fn array_len(&self) -> usize {
        self.get().array_len()
    }

    /// Total usable length in bytes.
    pub fn byte_len(&self) -> usize {
        self.get().byte_len()
    }

    /// The buffer contents as raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.get().as_bytes()
    }

    /// The buffer contents as mutable raw bytes.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.get_mut().as_bytes_mut()
    }

    /// View the buffer as elements of type `T`.
    ///
    /// # Panics
    ///
    /// Same conditions as [`PoolBuf::as_elems`].
    pub fn as_elems<T: Pod>(&self) -> &[T] {
        self.get().as_elems()
    }

    /// View the buffer as mutable elements of type `T`.
    ///
    /// # Panics
    ///
    /// Same conditions as [`PoolBuf::as_elems`].
    pub fn as_elems_mut<T: Pod>(&mut self) -> &mut [T] {
        self.get_mut().as_elems_mut()
    }

    /// Cancel the automatic return and take ownership of the buffer.
    ///
    /// The caller becomes responsible for passing the buffer to
    /// [`FixedArrayPool::release`] (or deliberately dropping it, which frees
    /// the storage without recycling it).
    pub fn detach(mut self) -> PoolBuf {
        self.buf.take().expect("guard holds a buffer until consumed")
    }

    fn get(&self) -> &PoolBuf {
        self.buf.as_ref().expect("guard holds a buffer until consumed")
    }

    fn get_mut(&mut self) -> &mut PoolBuf {
        self.buf.as_mut().expect("guard holds a buffer until consumed")
    }
}

impl Deref for ScopedBuf<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.get().as_bytes()
    }
}

impl DerefMut for ScopedBuf<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.get_mut().as_bytes_mut()
    }
}

impl Drop for ScopedBuf<'_> {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.release(buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PoolError;

    #[test]
    fn buffer_returns_on_scope_exit() {
        let pool = FixedArrayPool::new(10).unwrap();
        let ptr = {
            let scoped = pool.scoped(4).unwrap();
            scoped.as_bytes().as_ptr() as usize
        };
        assert_eq!(pool.free_buffers(), 1);
        assert_eq!(pool.acquire(4).unwrap().as_bytes().as_ptr() as usize, ptr);
    }

    #[test]
    fn buffer_returns_on_early_error_path() {
        fn fallible(pool: &FixedArrayPool, fail: bool) -> Result<(), PoolError> {
            let mut scoped = pool.scoped(8)?;
            scoped.as_elems_mut::<u64>()[0] = 7;
            if fail {
                return Err(PoolError::OutOfMemory { requested: 0 });
            }
            Ok(())
        }

        let pool = FixedArrayPool::new(4).unwrap();
        assert!(fallible(&pool, true).is_err());
        assert_eq!(pool.free_buffers(), 1);
        assert!(fallible(&pool, false).is_ok());
        assert_eq!(pool.free_buffers(), 1);
        assert_eq!(pool.fresh_allocations(), 1);
    }

    #[test]
    fn buffer_returns_when_scope_unwinds() {
        let pool = FixedArrayPool::new(4).unwrap();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _scoped = pool.scoped(4).unwrap();
            panic!("simulated failure");
        }));
        assert!(result.is_err());
        assert_eq!(pool.free_buffers(), 1);
    }

    #[test]
    fn moving_the_guard_transfers_the_release_obligation() {
        let pool = FixedArrayPool::new(4).unwrap();
        let scoped = pool.scoped(4).unwrap();

        let moved = scoped;
        assert_eq!(pool.free_buffers(), 0);
        drop(moved);
        // Returned exactly once: one free buffer, one fresh allocation.
        assert_eq!(pool.free_buffers(), 1);
        assert_eq!(pool.fresh_allocations(), 1);
    }

    #[test]
    fn guards_for_several_sizes_coexist() {
        let pool = FixedArrayPool::new(16).unwrap();
        let mut a = pool.scoped_of::<f32>().unwrap();
        let mut b = pool.scoped_of::<[f32; 3]>().unwrap();
        a.as_elems_mut::<f32>()[15] = 1.0;
        b.as_elems_mut::<[f32; 3]>()[15] = [1.0, 2.0, 3.0];
        drop(a);
        drop(b);
        assert_eq!(pool.free_buffers(), 2);
    }

    #[test]
    fn detach_cancels_the_automatic_return() {
        let pool = FixedArrayPool::new(4).unwrap();
        let scoped = pool.scoped(4).unwrap();
        let buf = scoped.detach();
        assert_eq!(pool.free_buffers(), 0);
        pool.release(buf);
        assert_eq!(pool.free_buffers(), 1);
    }

    #[test]
    fn typed_scoped_checkout_sees_pool_geometry() {
        let pool = FixedArrayPool::new(64).unwrap();
        let scoped = pool.scoped_of::<u32>().unwrap();
        assert_eq!(scoped.array_len(), 64);
        assert_eq!(scoped.element_size(), 4);
        assert_eq!(scoped.byte_len(), 256);
        assert_eq!(scoped.as_elems::<u32>().len(), 64);
    }
}
