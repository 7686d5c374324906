use std::any::type_name;
use std::iter::FusedIterator;
use std::{fmt, ptr, slice, thread};

use crate::{BlockAllocator, DropPolicy, Global, RawBuffer};

/// An iterator that moves the elements out of a [`DynArray`][crate::DynArray].
///
/// Created by the `into_iter()` method on `DynArray` (provided by [`IntoIterator`]).
/// Elements not consumed by the time the iterator is dropped are dropped with it.
///
/// The iterator inherits the [drop policy][DropPolicy] of the array. If the array was created
/// with [`DropPolicy::MustNotDropItems`], dropping the iterator before it is exhausted panics.
///
/// # Examples
///
/// ```
/// use dyn_array::DynArray;
///
/// let array: DynArray<String> = ["a", "b", "c"].into_iter().map(String::from).collect();
///
/// let mut iter = array.into_iter();
///
/// assert_eq!(iter.next().as_deref(), Some("a"));
/// assert_eq!(iter.next_back().as_deref(), Some("c"));
/// assert_eq!(iter.as_slice(), ["b"]);
/// ```
pub struct IntoIter<T, A: BlockAllocator = Global> {
    buffer: RawBuffer<T, A>,

    /// Slots [front, back) still hold live values.
    front: usize,
    back: usize,

    drop_policy: DropPolicy,
}

impl<T, A: BlockAllocator> IntoIter<T, A> {
    /// Takes over a buffer whose slots `[0, len)` hold live values.
    pub(crate) fn new(buffer: RawBuffer<T, A>, len: usize, drop_policy: DropPolicy) -> Self {
        debug_assert!(len <= buffer.capacity());

        Self {
            buffer,
            front: 0,
            back: len,
            drop_policy,
        }
    }

    /// The elements not yet yielded, as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        let len = self
            .back
            .checked_sub(self.front)
            .expect("front never passes back");

        // SAFETY: Slots [front, back) hold live values and the slice borrows `self`.
        unsafe { slice::from_raw_parts(self.buffer.slot_ptr(self.front).as_ptr(), len) }
    }

    fn as_slice_mut(&mut self) -> &mut [T] {
        let len = self
            .back
            .checked_sub(self.front)
            .expect("front never passes back");

        // SAFETY: Slots [front, back) hold live values and we hold `&mut self`.
        unsafe { slice::from_raw_parts_mut(self.buffer.slot_ptr(self.front).as_ptr(), len) }
    }
}

impl<T, A: BlockAllocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }

        let slot = self.buffer.slot_ptr(self.front);

        self.front = self
            .front
            .checked_add(1)
            .expect("guarded by front < back <= capacity");

        // SAFETY: The slot held a live value and is now outside [front, back), so ownership
        // moves to the caller and nobody will read it again.
        Some(unsafe { slot.read() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .back
            .checked_sub(self.front)
            .expect("front never passes back");

        (remaining, Some(remaining))
    }
}

impl<T, A: BlockAllocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }

        self.back = self
            .back
            .checked_sub(1)
            .expect("guarded by front < back");

        // SAFETY: The slot held a live value and is now outside [front, back), so ownership
        // moves to the caller and nobody will read it again.
        Some(unsafe { self.buffer.slot_ptr(self.back).read() })
    }
}

impl<T, A: BlockAllocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: BlockAllocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: BlockAllocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        let was_exhausted = self.front == self.back;
        let remaining = ptr::from_mut(self.as_slice_mut());

        // Empty the live range first so a panicking destructor cannot cause a double drop.
        self.front = self.back;

        // SAFETY: The slots held live values that were never yielded and are no longer
        // tracked as live. The buffer releases its block when the field is dropped.
        unsafe {
            ptr::drop_in_place(remaining);
        }

        if self.drop_policy == DropPolicy::MustNotDropItems && !thread::panicking() {
            assert!(
                was_exhausted,
                "dropped an unfinished iterator over a dyn array of {} with a policy that says it must be empty when dropped",
                type_name::<T>()
            );
        }
    }
}

impl<T: fmt::Debug, A: BlockAllocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}
