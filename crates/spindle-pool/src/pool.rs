//! The fixed-length array pool.
//!
//! [`FixedArrayPool`] recycles buffers that all share one element count but
//! may differ in per-element byte size. Free buffers live in per-size
//! "lanes" (LIFO stacks), addressed densely by `element_size - 1`. Element
//! sizes in the calling pipelines are small and few (points, tuples of 2–16
//! scalar fields), so a dense lane bank gives O(1) lookup without hashing.

use std::cell::{Cell, RefCell};

use bytemuck::Pod;
use smallvec::SmallVec;

use crate::aligned::AlignedBuf;
use crate::buf::PoolBuf;
use crate::error::PoolError;
use crate::scoped::ScopedBuf;

/// A LIFO stack of free buffers sharing one element size.
type Lane = Vec<AlignedBuf>;

/// Recycling pool for arrays of a fixed element count.
///
/// Constructed with an immutable array length `N`; every buffer the pool
/// ever produces holds exactly `N` elements. A caller acquires a buffer for
/// a per-element byte size `S` and gets either the most recently released
/// buffer of that size (LIFO reuse favours cache-hot storage) or a fresh
/// zeroed, 64-byte-aligned allocation of `N * S` bytes. Recycled buffers
/// retain their previous contents.
///
/// # Concurrency
///
/// The pool is not internally synchronized. Interior mutability is
/// `RefCell`/`Cell` based, so the type is deliberately `!Sync`: sharing an
/// instance across threads requires external mutual exclusion, and the
/// recommended pattern for hot paths is one pool per worker.
///
/// # Example
///
/// ```rust
/// use spindle_pool::FixedArrayPool;
///
/// let pool = FixedArrayPool::new(100)?;
/// let mut positions = pool.acquire_of::<[f32; 3]>()?;
/// positions.as_elems_mut::<[f32; 3]>()[0] = [1.0, 2.0, 3.0];
/// pool.release(positions);
/// # Ok::<(), spindle_pool::PoolError>(())
/// ```
#[derive(Debug)]
pub struct FixedArrayPool {
    /// Element count of every buffer this pool produces.
    array_len: usize,
    /// Free lanes, indexed by `element_size - 1`. Grown lazily; the inline
    /// capacity covers the small element sizes the pipelines actually use.
    lanes: RefCell<SmallVec<[Lane; 16]>>,
    /// Buffers allocated fresh from the system (monotonic).
    fresh_allocations: Cell<usize>,
    /// Acquisitions served from a lane instead of a fresh allocation (monotonic).
    recycled_acquires: Cell<usize>,
}

impl FixedArrayPool {
    /// Create a pool whose buffers all hold `array_len` elements.
    ///
    /// Returns [`PoolError::InvalidConfig`] if `array_len` is zero: a pool
    /// of empty arrays has no meaningful recycling behaviour, so the
    /// degenerate case is rejected up front.
    pub fn new(array_len: usize) -> Result<Self, PoolError> {
        if array_len == 0 {
            return Err(PoolError::InvalidConfig {
                reason: "array_len must be > 0".into(),
            });
        }
        Ok(Self {
            array_len,
            lanes: RefCell::new(SmallVec::new()),
            fresh_allocations: Cell::new(0),
            recycled_acquires: Cell::new(0),
        })
    }

    /// The fixed element count shared by every buffer from this pool.
    pub fn array_len(&self) -> usize {
        self.array_len
    }

    /// Check out a buffer of `array_len` elements of `element_size` bytes.
    ///
    /// Pops the most recently released buffer from the matching lane, or
    /// allocates a fresh zeroed block of `array_len * element_size` bytes
    /// aligned to 64 bytes. Allocation failure surfaces as
    /// [`PoolError::OutOfMemory`]; the pool does not retry.
    ///
    /// # Panics
    ///
    /// Panics if `element_size` is zero. That is a programming error at the
    /// call site, not a recoverable condition.
    pub fn acquire(&self, element_size: usize) -> Result<PoolBuf, PoolError> {
        assert!(element_size > 0, "element_size must be > 0");

        if let Some(data) = self.lane_mut(element_size, |lane| lane.pop()) {
            self.recycled_acquires.set(self.recycled_acquires.get() + 1);
            return Ok(PoolBuf::new(data, element_size));
        }

        let byte_len = match self.array_len.checked_mul(element_size) {
            Some(n) => n,
            None => {
                return Err(PoolError::OutOfMemory {
                    requested: usize::MAX,
                })
            }
        };
        let data = AlignedBuf::with_len(byte_len)?;
        self.fresh_allocations.set(self.fresh_allocations.get() + 1);
        Ok(PoolBuf::new(data, element_size))
    }

    /// Check out a buffer sized for `array_len` elements of type `T`.
    ///
    /// Equivalent to [`FixedArrayPool::acquire`] with `size_of::<T>()`, and
    /// shares lanes with untyped callers using the same byte size.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized.
    pub fn acquire_of<T: Pod>(&self) -> Result<PoolBuf, PoolError> {
        self.acquire(std::mem::size_of::<T>())
    }

    /// Return a buffer to its lane for reuse.
    ///
    /// The buffer carries its own lane key, so it always lands in the lane
    /// it was acquired under.
    ///
    /// # Panics
    ///
    /// Panics if the buffer's byte length does not match this pool's
    /// geometry, which happens only when releasing into a pool with a
    /// different array length than the one that produced the buffer.
    pub fn release(&self, buf: PoolBuf) {
        let (data, element_size) = buf.into_parts();
        assert_eq!(
            data.len(),
            self.array_len * element_size,
            "buffer geometry does not match this pool"
        );
        self.lane_mut(element_size, |lane| lane.push(data));
    }

    /// Check out a buffer wrapped in a guard that returns it on drop.
    ///
    /// The guard releases the buffer to the correct lane exactly once on
    /// every exit path from the enclosing scope, including early returns
    /// and unwinding.
    pub fn scoped(&self, element_size: usize) -> Result<ScopedBuf<'_>, PoolError> {
        Ok(ScopedBuf::new(self, self.acquire(element_size)?))
    }

    /// Typed form of [`FixedArrayPool::scoped`], keyed on `size_of::<T>()`.
    pub fn scoped_of<T: Pod>(&self) -> Result<ScopedBuf<'_>, PoolError> {
        Ok(ScopedBuf::new(self, self.acquire_of::<T>()?))
    }

    /// Number of buffers allocated fresh from the system so far.
    pub fn fresh_allocations(&self) -> usize {
        self.fresh_allocations.get()
    }

    /// Number of acquisitions served by recycling a lane-resident buffer.
    pub fn recycled_acquires(&self) -> usize {
        self.recycled_acquires.get()
    }

    /// Number of buffers currently resident in lanes, across all sizes.
    pub fn free_buffers(&self) -> usize {
        self.lanes.borrow().iter().map(Vec::len).sum()
    }

    /// Bytes of storage currently resident in lanes.
    ///
    /// Checked-out buffers are not counted; their storage travels with the
    /// checkout until release.
    pub fn free_memory_bytes(&self) -> usize {
        self.lanes
            .borrow()
            .iter()
            .flatten()
            .map(AlignedBuf::resident_bytes)
            .sum()
    }

    /// Run `f` on the lane for `element_size`, growing the bank with empty
    /// lanes if this size has not been seen before.
    fn lane_mut<R>(&self, element_size: usize, f: impl FnOnce(&mut Lane) -> R) -> R {
        let index = element_size - 1;
        let mut lanes = self.lanes.borrow_mut();
        while lanes.len() <= index {
            lanes.push(Lane::new());
        }
        f(&mut lanes[index])
    }
}
