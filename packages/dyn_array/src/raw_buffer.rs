use std::alloc::Layout;
use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use crate::{BlockAllocator, Error, Global, Result};

/// A fixed-capacity block of uninitialized storage for values of type `T`.
///
/// The buffer only owns memory. It never constructs or destroys values of `T` and has
/// no knowledge of which of its slots hold live values - that bookkeeping belongs to the owner
/// (typically a [`DynArray`][crate::DynArray]). Dropping the buffer releases the memory block
/// without dropping anything stored in it.
///
/// A buffer with zero capacity never allocates. Neither does a buffer of a zero-sized type; its
/// slots all share one dangling, well-aligned address.
///
/// The buffer cannot be cloned. Ownership of the block moves with the buffer and can be
/// exchanged with another buffer via [`swap()`][Self::swap].
///
/// # Examples
///
/// ```
/// use dyn_array::RawBuffer;
///
/// let buffer = RawBuffer::<String>::with_capacity(4);
/// assert_eq!(buffer.capacity(), 4);
///
/// let slot = buffer.slot_ptr(2);
///
/// // SAFETY: The slot is within capacity and does not yet hold a value.
/// unsafe { slot.write("hello".to_string()) };
///
/// // SAFETY: We initialized this slot above and nothing else refers to it.
/// let value = unsafe { slot.read() };
/// assert_eq!(value, "hello");
/// ```
pub struct RawBuffer<T, A: BlockAllocator = Global> {
    /// Start of the memory block. Dangling (but aligned) if nothing was allocated.
    ptr: NonNull<T>,

    /// Number of `T`-sized slots in the block.
    capacity: usize,

    allocator: A,

    // We logically own the storage for `T` values, even if none are alive.
    _owns: PhantomData<T>,
}

impl<T> RawBuffer<T> {
    /// Creates an empty buffer that owns no memory.
    #[must_use]
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// Creates a buffer with room for `capacity` values of `T`.
    ///
    /// # Panics
    ///
    /// Panics if the block cannot be allocated or if its size overflows.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Global)
    }

    /// Creates a buffer with room for `capacity` values of `T`, reporting allocation failure
    /// to the caller instead of panicking.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::{Error, RawBuffer};
    ///
    /// let buffer = RawBuffer::<u64>::try_with_capacity(8).unwrap();
    /// assert_eq!(buffer.capacity(), 8);
    ///
    /// let too_big = RawBuffer::<u64>::try_with_capacity(usize::MAX);
    /// assert!(matches!(too_big, Err(Error::CapacityOverflow)));
    /// ```
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        Self::try_with_capacity_in(capacity, Global)
    }
}

impl<T, A: BlockAllocator> RawBuffer<T, A> {
    #[must_use]
    pub(crate) fn new_in(allocator: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            allocator,
            _owns: PhantomData,
        }
    }

    #[must_use]
    pub(crate) fn with_capacity_in(capacity: usize, allocator: A) -> Self {
        Self::try_with_capacity_in(capacity, allocator).unwrap_or_else(|error| {
            panic!(
                "raw buffer of {capacity} x {} could not be created: {error}",
                type_name::<T>()
            )
        })
    }

    pub(crate) fn try_with_capacity_in(capacity: usize, allocator: A) -> Result<Self> {
        let layout = Self::layout(capacity)?;

        // Zero capacity or zero-sized `T` - nothing to allocate.
        if layout.size() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                capacity,
                allocator,
                _owns: PhantomData,
            });
        }

        let ptr = allocator
            .allocate(layout)
            .ok_or(Error::AllocationFailed {
                size: layout.size(),
                align: layout.align(),
            })?
            .cast::<T>();

        Ok(Self {
            ptr,
            capacity,
            allocator,
            _owns: PhantomData,
        })
    }

    fn layout(capacity: usize) -> Result<Layout> {
        Layout::array::<T>(capacity).map_err(|_layout_error| Error::CapacityOverflow)
    }

    /// The number of values of `T` the buffer has room for.
    #[must_use]
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pointer to the first slot of the buffer.
    ///
    /// The pointer is never null. If the buffer owns no memory it is dangling but aligned.
    #[must_use]
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Mutable pointer to the first slot of the buffer.
    ///
    /// The pointer is never null. If the buffer owns no memory it is dangling but aligned.
    #[must_use]
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Pointer to the slot at `offset`, which may be one past the last slot.
    ///
    /// No value is read or checked for. Whether the slot holds a live value is up to the caller.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is greater than the capacity.
    #[must_use]
    #[inline]
    pub fn slot_ptr(&self, offset: usize) -> NonNull<T> {
        assert!(
            offset <= self.capacity,
            "slot offset {offset} out of bounds in raw buffer of capacity {} of {}",
            self.capacity,
            type_name::<T>()
        );

        // SAFETY: Guarded by the bounds check above. One past the end is a valid
        // offset for pointer arithmetic and the block never exceeds isize::MAX bytes.
        unsafe { self.ptr.add(offset) }
    }

    /// Shared reference to the value in slot `index`.
    ///
    /// # Safety
    ///
    /// The slot must be within capacity and hold an initialized value of `T` that is not
    /// exclusively referenced elsewhere.
    #[must_use]
    #[inline]
    pub unsafe fn slot(&self, index: usize) -> &T {
        let ptr = self.slot_ptr(index);

        // SAFETY: Forwarding the caller's guarantee that the slot is live and not aliased.
        unsafe { ptr.as_ref() }
    }

    /// Exclusive reference to the value in slot `index`.
    ///
    /// # Safety
    ///
    /// The slot must be within capacity and hold an initialized value of `T`.
    #[must_use]
    #[inline]
    pub unsafe fn slot_mut(&mut self, index: usize) -> &mut T {
        let mut ptr = self.slot_ptr(index);

        // SAFETY: Forwarding the caller's guarantee that the slot is live. We hold `&mut self`
        // so no other reference into the buffer can exist.
        unsafe { ptr.as_mut() }
    }

    /// Exchanges the memory blocks (and capacities) of two buffers.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::RawBuffer;
    ///
    /// let mut a = RawBuffer::<u8>::with_capacity(16);
    /// let mut b = RawBuffer::<u8>::new();
    ///
    /// a.swap(&mut b);
    ///
    /// assert_eq!(a.capacity(), 0);
    /// assert_eq!(b.capacity(), 16);
    /// ```
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        // The allocator travels with the block it allocated.
        mem::swap(self, other);
    }

    #[must_use]
    #[inline]
    pub(crate) fn allocator(&self) -> &A {
        &self.allocator
    }
}

impl<T> Default for RawBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: BlockAllocator> Drop for RawBuffer<T, A> {
    fn drop(&mut self) {
        let layout = Self::layout(self.capacity)
            .expect("layout was valid when the block was allocated so it is still valid");

        if layout.size() == 0 {
            return;
        }

        // SAFETY: A non-zero-sized layout means we allocated this block from this allocator
        // with this exact layout in the constructor, and we release it only here.
        unsafe {
            self.allocator.deallocate(self.ptr.cast(), layout);
        }
    }
}

impl<T, A: BlockAllocator> fmt::Debug for RawBuffer<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBuffer")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

// SAFETY: The buffer is the exclusive owner of its block, so it can move between threads
// whenever the values it is meant to hold (and the allocator that releases it) can.
unsafe impl<T: Send, A: BlockAllocator + Send> Send for RawBuffer<T, A> {}

// SAFETY: Shared access only hands out pointers and shared references (via `unsafe` methods
// whose callers uphold aliasing), which is fine to do from many threads if `T` is `Sync`.
unsafe impl<T: Sync, A: BlockAllocator + Sync> Sync for RawBuffer<T, A> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::cell::Cell;
    use std::fmt::Debug;

    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;
    use crate::test_support::FlakyAllocator;

    assert_impl_all!(RawBuffer<u32>: Send, Sync, Debug);
    assert_impl_all!(RawBuffer<Cell<u32>>: Send);
    assert_not_impl_any!(RawBuffer<Cell<u32>>: Sync);
    assert_not_impl_any!(RawBuffer<u32>: Clone);

    #[test]
    fn zero_capacity_never_allocates() {
        let allocator = FlakyAllocator::new();
        allocator.fail_now();

        let buffer = RawBuffer::<u64, _>::try_with_capacity_in(0, allocator.clone()).unwrap();

        assert_eq!(buffer.capacity(), 0);
        assert_eq!(allocator.allocations(), 0);

        drop(buffer);
        assert_eq!(allocator.live_blocks(), 0);
    }

    #[test]
    fn zero_sized_type_never_allocates() {
        let allocator = FlakyAllocator::new();
        allocator.fail_now();

        let buffer = RawBuffer::<(), _>::try_with_capacity_in(1000, allocator.clone()).unwrap();

        assert_eq!(buffer.capacity(), 1000);
        assert_eq!(allocator.allocations(), 0);
    }

    #[test]
    fn allocates_one_block_and_releases_it() {
        let allocator = FlakyAllocator::new();

        let buffer = RawBuffer::<u64, _>::with_capacity_in(10, allocator.clone());
        assert_eq!(allocator.allocations(), 1);
        assert_eq!(allocator.live_blocks(), 1);

        drop(buffer);
        assert_eq!(allocator.live_blocks(), 0);
    }

    #[test]
    fn allocation_failure_is_reported() {
        let allocator = FlakyAllocator::new();
        allocator.fail_now();

        let result = RawBuffer::<u64, _>::try_with_capacity_in(3, allocator.clone());

        assert!(matches!(
            result,
            Err(Error::AllocationFailed { size: 24, align: 8 })
        ));
        assert_eq!(allocator.live_blocks(), 0);
    }

    #[test]
    #[should_panic(expected = "raw buffer of 3 x u64 could not be created")]
    fn allocation_failure_panics_in_infallible_ctor() {
        let allocator = FlakyAllocator::new();
        allocator.fail_now();

        drop(RawBuffer::<u64, _>::with_capacity_in(3, allocator));
    }

    #[test]
    fn oversized_capacity_is_overflow() {
        let result = RawBuffer::<u64>::try_with_capacity(usize::MAX / 2);
        assert!(matches!(result, Err(Error::CapacityOverflow)));
    }

    #[test]
    fn slots_are_contiguous() {
        let buffer = RawBuffer::<u32>::with_capacity(4);

        for index in 0..4 {
            let expected = buffer.as_ptr().wrapping_add(index);
            assert_eq!(buffer.slot_ptr(index).as_ptr().cast_const(), expected);
        }
    }

    #[test]
    fn one_past_the_end_is_addressable() {
        let buffer = RawBuffer::<u32>::with_capacity(4);
        _ = buffer.slot_ptr(4);
    }

    #[test]
    #[should_panic(expected = "slot offset 5 out of bounds in raw buffer of capacity 4 of u32")]
    fn slot_beyond_end_panics() {
        let buffer = RawBuffer::<u32>::with_capacity(4);
        _ = buffer.slot_ptr(5);
    }

    #[test]
    fn write_and_read_slots() {
        let mut buffer = RawBuffer::<String>::with_capacity(2);

        // SAFETY: Both slots are within capacity and uninitialized.
        unsafe {
            buffer.slot_ptr(0).write("first".to_string());
        }
        // SAFETY: Within capacity and uninitialized.
        unsafe {
            buffer.slot_ptr(1).write("second".to_string());
        }

        // SAFETY: Slot 1 was initialized above.
        unsafe {
            buffer.slot_mut(1).push('!');
        }

        // SAFETY: Slot 0 was initialized above.
        assert_eq!(unsafe { buffer.slot(0) }, "first");
        // SAFETY: Slot 1 was initialized above.
        assert_eq!(unsafe { buffer.slot(1) }, "second!");

        // The buffer does not drop values, so we must do it ourselves.
        for index in 0..2 {
            // SAFETY: Both slots hold live values that nothing else refers to.
            unsafe {
                buffer.slot_ptr(index).drop_in_place();
            }
        }
    }

    #[test]
    fn swap_exchanges_blocks_and_capacities() {
        let mut a = RawBuffer::<u32>::with_capacity(3);
        let mut b = RawBuffer::<u32>::with_capacity(7);

        let a_ptr = a.as_ptr();
        let b_ptr = b.as_ptr();

        a.swap(&mut b);

        assert_eq!(a.capacity(), 7);
        assert_eq!(b.capacity(), 3);
        assert_eq!(a.as_ptr(), b_ptr);
        assert_eq!(b.as_ptr(), a_ptr);
    }

    #[test]
    fn move_transfers_ownership_without_allocation() {
        let allocator = FlakyAllocator::new();

        let buffer = RawBuffer::<u64, _>::with_capacity_in(5, allocator.clone());
        let moved = buffer;

        assert_eq!(moved.capacity(), 5);
        assert_eq!(allocator.allocations(), 1);

        drop(moved);
        assert_eq!(allocator.live_blocks(), 0);
    }
}
