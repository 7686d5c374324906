use std::alloc::{self, Layout};
use std::ptr::NonNull;

pub(crate) mod sealed {
    #[allow(
        unnameable_types,
        unreachable_pub,
        reason = "sealed trait pattern - the supertrait must not be nameable outside the crate"
    )]
    pub trait Sealed {}
}

/// The boundary through which a [`RawBuffer`][crate::RawBuffer] obtains and releases its
/// memory block.
///
/// This trait is sealed. [`Global`] is the only implementation available outside this crate;
/// the trait exists so that storage acquisition goes through a single, replaceable seam.
///
/// Implementations are never asked for zero-sized blocks.
pub trait BlockAllocator: Clone + sealed::Sealed {
    /// Allocates an uninitialized memory block matching `layout`.
    ///
    /// Returns `None` if the block cannot be provided.
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Releases a memory block previously returned by [`allocate()`][Self::allocate].
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate()` on this allocator (or a clone of it) with
    /// the same `layout` and must not have been released already.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// Allocates memory blocks from the Rust global allocator.
///
/// This is the default allocator of [`DynArray`][crate::DynArray] and
/// [`RawBuffer`][crate::RawBuffer].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub struct Global;

impl sealed::Sealed for Global {}

impl BlockAllocator for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        debug_assert!(layout.size() > 0, "zero-sized blocks are never allocated");

        // SAFETY: The layout is not zero-sized, which is the only requirement of `alloc()`.
        NonNull::new(unsafe { alloc::alloc(layout) })
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: Forwarding the caller's guarantee that the block came from `alloc()`
        // with this exact layout.
        unsafe {
            alloc::dealloc(ptr.as_ptr(), layout);
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Global: Send, Sync, Copy, BlockAllocator);

    #[test]
    fn global_round_trip() {
        let layout = Layout::array::<u64>(16).unwrap();

        let block = Global.allocate(layout).unwrap();

        // SAFETY: The block is large enough for 16 u64 values and suitably aligned.
        unsafe {
            block.cast::<u64>().add(15).write(1234);
        }

        // SAFETY: We just wrote this slot.
        let value = unsafe { block.cast::<u64>().add(15).read() };
        assert_eq!(value, 1234);

        // SAFETY: Allocated above with the same layout, released exactly once.
        unsafe {
            Global.deallocate(block, layout);
        }
    }
}
