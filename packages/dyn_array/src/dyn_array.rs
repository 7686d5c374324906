use std::any::type_name;
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::slice::{self, SliceIndex};
use std::{fmt, mem, ptr, thread};

use scopeguard::ScopeGuard;
use tracing::trace;

use crate::{BlockAllocator, DropPolicy, DynArrayBuilder, Global, IntoIter, RawBuffer, Result};

/// A contiguous growable array that manages its own raw storage.
///
/// The array owns exactly one [`RawBuffer`] and a count of live elements. Slots `[0, len)` of the
/// buffer hold live values in order; slots `[len, capacity)` are uninitialized.
///
/// # Growth
///
/// Capacity starts at zero. When an element is added to a full array, the capacity becomes one
/// (if it was zero) or doubles, which keeps appending amortized O(1). Explicit requests
/// ([`reserve()`][Self::reserve], [`resize()`][Self::resize]) grow to exactly the requested
/// capacity. Capacity never shrinks.
///
/// When the storage is replaced, the element being added is constructed directly in its final
/// slot of the new buffer before any existing element is relocated. Relocation is a bitwise
/// move that cannot fail, so if constructing the new element panics (or the new buffer cannot
/// be allocated) the array is left exactly as it was.
///
/// # Examples
///
/// ```
/// use dyn_array::DynArray;
///
/// let mut array = DynArray::new();
///
/// array.push(1);
/// array.push(2);
/// array.push(3);
///
/// assert_eq!(array.len(), 3);
/// assert_eq!(array.capacity(), 4);
///
/// array.insert(1, 10);
/// assert_eq!(array.as_slice(), [1, 10, 2, 3]);
///
/// array.erase(0);
/// assert_eq!(array.as_slice(), [10, 2, 3]);
///
/// array.resize(5);
/// assert_eq!(array.as_slice(), [10, 2, 3, 0, 0]);
/// ```
pub struct DynArray<T, A: BlockAllocator = Global> {
    buffer: RawBuffer<T, A>,

    /// Number of live values at the start of `buffer`.
    len: usize,

    drop_policy: DropPolicy,
}

impl<T> DynArray<T> {
    /// Creates a new empty array. This does not allocate.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::DynArray;
    ///
    /// let array = DynArray::<String>::new();
    ///
    /// assert_eq!(array.len(), 0);
    /// assert_eq!(array.capacity(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(RawBuffer::new(), DropPolicy::default())
    }

    /// Starts building a new [`DynArray`].
    ///
    /// Use this when you want to customize the array configuration beyond the defaults.
    #[must_use]
    pub fn builder() -> DynArrayBuilder<T> {
        DynArrayBuilder::new()
    }

    /// Creates an empty array with room for exactly `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if the storage cannot be allocated.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::builder().capacity(capacity).build()
    }

    /// Creates an array holding `len` default-constructed elements, with capacity exactly `len`.
    ///
    /// # Panics
    ///
    /// Panics if the storage cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::DynArray;
    ///
    /// let array = DynArray::<u8>::with_len(3);
    ///
    /// assert_eq!(array.as_slice(), [0, 0, 0]);
    /// assert_eq!(array.capacity(), 3);
    /// ```
    #[must_use]
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        let mut array = Self::with_capacity(len);
        array.resize(len);
        array
    }
}

impl<T, A: BlockAllocator> DynArray<T, A> {
    #[must_use]
    pub(crate) fn from_parts(buffer: RawBuffer<T, A>, drop_policy: DropPolicy) -> Self {
        Self {
            buffer,
            len: 0,
            drop_policy,
        }
    }

    #[cfg(test)]
    #[must_use]
    pub(crate) fn new_in(allocator: A) -> Self {
        Self::from_parts(RawBuffer::new_in(allocator), DropPolicy::default())
    }

    /// The number of live elements in the array.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array holds no live elements.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of elements the array can hold without replacing its storage.
    #[must_use]
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// The [drop policy][DropPolicy] the array was created with.
    #[must_use]
    pub fn drop_policy(&self) -> DropPolicy {
        self.drop_policy
    }

    /// The live elements as a slice.
    #[must_use]
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: Slots [0, len) hold live values and the pointer is non-null and aligned
        // even when nothing is allocated. The slice borrows `self`, so nothing can mutate it.
        unsafe { slice::from_raw_parts(self.buffer.as_ptr(), self.len) }
    }

    /// The live elements as a mutable slice.
    #[must_use]
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len;

        // SAFETY: Slots [0, len) hold live values and the pointer is non-null and aligned
        // even when nothing is allocated. We hold `&mut self`, so the slice is exclusive.
        unsafe { slice::from_raw_parts_mut(self.buffer.as_mut_ptr(), len) }
    }

    /// Ensures the array can hold at least `capacity` elements.
    ///
    /// If `capacity` exceeds the current capacity, the storage is replaced by a buffer of exactly
    /// `capacity` slots. Otherwise this does nothing - the capacity never shrinks.
    ///
    /// # Panics
    ///
    /// Panics if the new storage cannot be allocated. The array is unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::DynArray;
    ///
    /// let mut array = DynArray::<u32>::new();
    ///
    /// array.reserve(10);
    /// assert_eq!(array.capacity(), 10);
    ///
    /// array.reserve(5);
    /// assert_eq!(array.capacity(), 10);
    /// ```
    pub fn reserve(&mut self, capacity: usize) {
        self.try_reserve(capacity).unwrap_or_else(|error| {
            panic!(
                "cannot reserve capacity {capacity} in dyn array of {}: {error}",
                type_name::<T>()
            )
        });
    }

    /// Ensures the array can hold at least `capacity` elements, reporting allocation failure
    /// to the caller instead of panicking.
    ///
    /// On error, the array is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::{DynArray, Error};
    ///
    /// let mut array = DynArray::<u64>::new();
    /// array.push(7);
    ///
    /// let result = array.try_reserve(usize::MAX);
    ///
    /// assert!(matches!(result, Err(Error::CapacityOverflow)));
    /// assert_eq!(array.as_slice(), [7]);
    /// assert_eq!(array.capacity(), 1);
    /// ```
    pub fn try_reserve(&mut self, capacity: usize) -> Result<()> {
        if capacity <= self.capacity() {
            return Ok(());
        }

        let new_buffer =
            RawBuffer::try_with_capacity_in(capacity, self.buffer.allocator().clone())?;

        self.relocate(new_buffer, None);

        Ok(())
    }

    /// Sets the length of the array to `new_len`, removing trailing elements or appending
    /// values produced by `f`.
    ///
    /// When growing beyond the current capacity, the storage grows to exactly `new_len`. If `f`
    /// panics, the elements appended so far are removed again, restoring the original length.
    ///
    /// # Panics
    ///
    /// Panics if the new storage cannot be allocated. The array is unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::DynArray;
    ///
    /// let mut array: DynArray<u32> = [1, 2].into_iter().collect();
    ///
    /// let mut next = 10;
    /// array.resize_with(4, || {
    ///     next += 1;
    ///     next
    /// });
    ///
    /// assert_eq!(array.as_slice(), [1, 2, 11, 12]);
    /// ```
    pub fn resize_with<F>(&mut self, new_len: usize, mut f: F)
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }

        self.reserve(new_len);

        let original_len = self.len;
        let mut this = scopeguard::guard(self, move |this| this.truncate(original_len));

        while this.len < new_len {
            let value = f();
            this.push_within_capacity(value);
        }

        ScopeGuard::into_inner(this);
    }

    /// Sets the length of the array to `new_len`, removing trailing elements or appending
    /// default-constructed ones.
    ///
    /// # Panics
    ///
    /// Panics if the new storage cannot be allocated. The array is unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::DynArray;
    ///
    /// let mut array: DynArray<u32> = [1, 2, 3].into_iter().collect();
    ///
    /// array.resize(1);
    /// assert_eq!(array.as_slice(), [1]);
    ///
    /// array.resize(3);
    /// assert_eq!(array.as_slice(), [1, 0, 0]);
    /// ```
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.resize_with(new_len, T::default);
    }

    /// Appends a value to the end of the array.
    ///
    /// # Panics
    ///
    /// Panics if the array is full and larger storage cannot be allocated. The array is
    /// unchanged in that case.
    #[inline]
    pub fn push(&mut self, value: T) {
        self.emplace_last_with(|| value);
    }

    /// Appends the value produced by `f` to the end of the array and returns a reference to it.
    ///
    /// If the array is full, `f` is called only after the larger storage has been obtained and
    /// its result is written straight into its final slot there. If `f` panics, the array is
    /// unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the array is full and larger storage cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::DynArray;
    ///
    /// let mut array = DynArray::new();
    ///
    /// let name = array.emplace_last_with(|| String::from("abc"));
    /// name.push('d');
    ///
    /// assert_eq!(array[0], "abcd");
    /// ```
    pub fn emplace_last_with<F>(&mut self, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        self.emplace_with(self.len, f)
    }

    /// Removes and drops the last element.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn remove_last(&mut self) {
        let Some(last) = self.len.checked_sub(1) else {
            panic!(
                "remove_last() called on an empty dyn array of {}",
                type_name::<T>()
            );
        };

        // Shrink the live range first so a panicking destructor cannot cause a double drop.
        self.len = last;

        // SAFETY: Slot `last` held a live value and is no longer part of the live range.
        unsafe {
            self.buffer.slot_ptr(last).drop_in_place();
        }
    }

    /// Removes the last element and returns it, or `None` if the array is empty.
    pub fn pop(&mut self) -> Option<T> {
        let last = self.len.checked_sub(1)?;
        self.len = last;

        // SAFETY: Slot `last` held a live value and is no longer part of the live range,
        // so ownership moves to the caller.
        Some(unsafe { self.buffer.slot_ptr(last).read() })
    }

    /// Inserts a value at `index`, shifting all elements after it one position to the right.
    ///
    /// Returns a reference to the inserted element.
    ///
    /// # Panics
    ///
    /// Panics if `index > len` or if larger storage is needed but cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::DynArray;
    ///
    /// let mut array: DynArray<char> = ['a', 'c'].into_iter().collect();
    ///
    /// array.insert(1, 'b');
    /// array.insert(3, 'd');
    ///
    /// assert_eq!(array.as_slice(), ['a', 'b', 'c', 'd']);
    /// ```
    pub fn insert(&mut self, index: usize, value: T) -> &mut T {
        self.emplace_with(index, || value)
    }

    /// Inserts the value produced by `f` at `index`, shifting all elements after it one position
    /// to the right. Returns a reference to the inserted element.
    ///
    /// `f` is called before any existing element is moved. If it panics, the array is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index > len` or if larger storage is needed but cannot be allocated.
    pub fn emplace_with<F>(&mut self, index: usize, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        #[cfg(debug_assertions)]
        self.integrity_check();

        assert!(
            index <= self.len,
            "insertion index {index} out of bounds in dyn array of length {} of {}",
            self.len,
            type_name::<T>()
        );

        if self.len == self.capacity() {
            self.grow_with(index, f);
        } else {
            let value = f();

            let tail_len = self
                .len
                .checked_sub(index)
                .expect("guarded by the bounds check above");

            let hole = self.buffer.slot_ptr(index);

            let shifted = self.buffer.slot_ptr(
                index
                    .checked_add(1)
                    .expect("guarded by len < capacity, which cannot exceed usize::MAX"),
            );

            // SAFETY: len < capacity, so the tail fits when shifted one slot to the right.
            // `ptr::copy` permits the overlap between source and destination.
            unsafe {
                ptr::copy(hole.as_ptr(), shifted.as_ptr(), tail_len);
            }

            // SAFETY: The value previously in this slot was relocated above, so the slot
            // is logically uninitialized and we can write without dropping anything.
            unsafe {
                hole.write(value);
            }

            self.len = self
                .len
                .checked_add(1)
                .expect("guarded by len < capacity, which cannot exceed usize::MAX");
        }

        // SAFETY: We just placed a live value in this slot.
        unsafe { self.buffer.slot_mut(index) }
    }

    /// Removes the element at `index` and returns it, shifting all elements after it one
    /// position to the left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        #[cfg(debug_assertions)]
        self.integrity_check();

        assert!(
            index < self.len,
            "removal index {index} out of bounds in dyn array of length {} of {}",
            self.len,
            type_name::<T>()
        );

        let tail_len = self
            .len
            .checked_sub(index)
            .and_then(|len| len.checked_sub(1))
            .expect("guarded by the bounds check above");

        let slot = self.buffer.slot_ptr(index);
        let next = self.buffer.slot_ptr(
            index
                .checked_add(1)
                .expect("guarded by index < len <= capacity"),
        );

        // SAFETY: The slot holds a live value. Reading it transfers ownership to us; the slot
        // is overwritten below before anything can observe it again.
        let removed = unsafe { slot.read() };

        // SAFETY: The tail [index + 1, len) is live and ends within capacity. `ptr::copy`
        // permits the overlap between source and destination.
        unsafe {
            ptr::copy(next.as_ptr(), slot.as_ptr(), tail_len);
        }

        self.len = self
            .len
            .checked_sub(1)
            .expect("guarded by index < len, so len is non-zero");

        removed
    }

    /// Removes and drops the element at `index`, shifting all elements after it one position to
    /// the left. Returns `index`, which now refers to the element that followed the erased one
    /// (or to the end of the array).
    ///
    /// On an empty array this does nothing and returns `index` unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the array is not empty and `index >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::DynArray;
    ///
    /// let mut array: DynArray<u32> = [1, 2, 3].into_iter().collect();
    ///
    /// assert_eq!(array.erase(1), 1);
    /// assert_eq!(array.as_slice(), [1, 3]);
    ///
    /// let mut empty = DynArray::<u32>::new();
    /// assert_eq!(empty.erase(5), 5);
    /// ```
    pub fn erase(&mut self, index: usize) -> usize {
        if self.is_empty() {
            return index;
        }

        drop(self.remove(index));
        index
    }

    /// Drops all elements from `len` onwards. Does nothing if the array is not longer than
    /// `len`. The capacity is unchanged.
    pub fn truncate(&mut self, len: usize) {
        let Some(excess) = self.len.checked_sub(len) else {
            return;
        };

        if excess == 0 {
            return;
        }

        let tail = ptr::slice_from_raw_parts_mut(self.buffer.slot_ptr(len).as_ptr(), excess);

        // Shrink the live range first so a panicking destructor cannot cause a double drop.
        self.len = len;

        // SAFETY: The tail held live values and is no longer part of the live range.
        unsafe {
            ptr::drop_in_place(tail);
        }
    }

    /// Drops all elements. The capacity is unchanged.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Exchanges the contents of two arrays in constant time, without touching any element.
    ///
    /// The drop policy of each array stays with that array.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::DynArray;
    ///
    /// let mut a: DynArray<u32> = [1, 2, 3].into_iter().collect();
    /// let mut b = DynArray::new();
    ///
    /// a.swap(&mut b);
    ///
    /// assert!(a.is_empty());
    /// assert_eq!(b.as_slice(), [1, 2, 3]);
    /// ```
    pub fn swap(&mut self, other: &mut Self) {
        self.buffer.swap(&mut other.buffer);
        mem::swap(&mut self.len, &mut other.len);
    }

    fn push_within_capacity(&mut self, value: T) {
        assert!(
            self.len < self.capacity(),
            "push_within_capacity() on a full dyn array of {}",
            type_name::<T>()
        );

        // SAFETY: len < capacity, so the slot exists and is outside the live range.
        unsafe {
            self.buffer.slot_ptr(self.len).write(value);
        }

        self.len = self
            .len
            .checked_add(1)
            .expect("guarded by len < capacity, which cannot exceed usize::MAX");
    }

    /// Replaces the storage of a full array with a larger buffer that has the value produced by
    /// `f` at `index` and all existing elements around it.
    fn grow_with<F>(&mut self, index: usize, f: F)
    where
        F: FnOnce() -> T,
    {
        let new_capacity = if self.capacity() == 0 {
            1
        } else {
            self.capacity().checked_mul(2).unwrap_or_else(|| {
                panic!(
                    "dyn array of {} cannot grow beyond capacity {}",
                    type_name::<T>(),
                    self.capacity()
                )
            })
        };

        let new_buffer =
            RawBuffer::with_capacity_in(new_capacity, self.buffer.allocator().clone());

        // If this panics, the new buffer is released holding no values and we are untouched.
        let value = f();

        // SAFETY: index <= len < new_capacity and the fresh buffer holds no values yet.
        unsafe {
            new_buffer.slot_ptr(index).write(value);
        }

        self.relocate(new_buffer, Some(index));

        self.len = self
            .len
            .checked_add(1)
            .expect("guarded by len < new_capacity, which cannot exceed usize::MAX");
    }

    /// Moves all live values into `new_buffer` and makes it our storage. If `gap` is set, the
    /// values from that index onwards land one slot further to the right, leaving the slot at
    /// `gap` for the caller (who has usually filled it already).
    ///
    /// Relocation is a bitwise move and cannot fail. The old block is released without dropping
    /// anything because its values now live in the new block.
    fn relocate(&mut self, mut new_buffer: RawBuffer<T, A>, gap: Option<usize>) {
        let prefix_len = gap.unwrap_or(self.len);
        let suffix_len = self
            .len
            .checked_sub(prefix_len)
            .expect("gap is never past the end of the live range");
        let suffix_target = if gap.is_some() {
            prefix_len
                .checked_add(1)
                .expect("guarded by gap <= len < new capacity")
        } else {
            prefix_len
        };

        assert!(
            suffix_target
                .checked_add(suffix_len)
                .is_some_and(|end| end <= new_buffer.capacity()),
            "new buffer of capacity {} too small to relocate {} values of {}",
            new_buffer.capacity(),
            self.len,
            type_name::<T>()
        );

        // SAFETY: The prefix [0, prefix_len) is live in the old buffer and fits in the new one
        // (asserted above). The two blocks are distinct allocations so they do not overlap.
        unsafe {
            ptr::copy_nonoverlapping(self.buffer.as_ptr(), new_buffer.as_mut_ptr(), prefix_len);
        }

        let suffix_source = self.buffer.slot_ptr(prefix_len);
        let suffix_destination = new_buffer.slot_ptr(suffix_target);

        // SAFETY: The suffix [prefix_len, len) is live in the old buffer and fits in the new one
        // starting at `suffix_target` (asserted above). The blocks do not overlap.
        unsafe {
            ptr::copy_nonoverlapping(
                suffix_source.as_ptr(),
                suffix_destination.as_ptr(),
                suffix_len,
            );
        }

        trace!(
            item_type = type_name::<T>(),
            len = self.len,
            old_capacity = self.buffer.capacity(),
            new_capacity = new_buffer.capacity(),
            "relocated dyn array storage"
        );

        self.buffer.swap(&mut new_buffer);

        // `new_buffer` now owns the old block, whose values were all moved out. Dropping it
        // only releases the memory.
    }

    fn clone_with_policy(&self, drop_policy: DropPolicy) -> Self
    where
        T: Clone,
    {
        let buffer = RawBuffer::with_capacity_in(self.len, self.buffer.allocator().clone());
        let mut clone = Self::from_parts(buffer, drop_policy);

        // If any clone panics, `clone` drops the values it already holds and releases its block.
        for item in self.as_slice() {
            clone.push_within_capacity(item.clone());
        }

        clone
    }

    #[cfg_attr(test, mutants::skip)] // This is essentially test logic, mutation is meaningless.
    #[cfg(debug_assertions)]
    fn integrity_check(&self) {
        assert!(
            self.len <= self.capacity(),
            "dyn array of {} has length {} beyond its capacity {}",
            type_name::<T>(),
            self.len,
            self.capacity()
        );
    }
}

impl<T, A: BlockAllocator> Drop for DynArray<T, A> {
    fn drop(&mut self) {
        let was_empty = self.is_empty();

        self.clear();

        // The buffer releases its block when the field is dropped right after this.
        //
        // If we are already panicking, we do not want to panic again because that will
        // simply obscure whatever the original panic was, leading to debug difficulties.
        if self.drop_policy == DropPolicy::MustNotDropItems && !thread::panicking() {
            assert!(
                was_empty,
                "dropped a non-empty dyn array of {} with a policy that says it must be empty when dropped",
                type_name::<T>()
            );
        }
    }
}

impl<T: Clone, A: BlockAllocator> Clone for DynArray<T, A> {
    fn clone(&self) -> Self {
        self.clone_with_policy(self.drop_policy)
    }

    /// Replaces the contents of `self` with a copy of `source`.
    ///
    /// If `source` does not fit in the current capacity, a complete copy is built first and then
    /// swapped in, so a panicking `clone()` leaves `self` untouched. Otherwise the existing
    /// storage is reused: overlapping elements are assigned via [`Clone::clone_from`], surplus
    /// elements are dropped and missing ones are cloned into the spare slots. If a `clone()`
    /// panics on that path, `self` keeps every element it held at that point and nothing leaks.
    fn clone_from(&mut self, source: &Self) {
        if source.len > self.capacity() {
            let mut replacement = source.clone_with_policy(DropPolicy::MayDropItems);
            self.swap(&mut replacement);
            return;
        }

        for (target, item) in self.as_mut_slice().iter_mut().zip(source.as_slice()) {
            target.clone_from(item);
        }

        if self.len > source.len {
            self.truncate(source.len);
        } else {
            for item in source.as_slice().iter().skip(self.len) {
                self.push_within_capacity(item.clone());
            }
        }
    }
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: BlockAllocator> Deref for DynArray<T, A> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: BlockAllocator> DerefMut for DynArray<T, A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, I: SliceIndex<[T]>, A: BlockAllocator> Index<I> for DynArray<T, A> {
    type Output = I::Output;

    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I: SliceIndex<[T]>, A: BlockAllocator> IndexMut<I> for DynArray<T, A> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T: fmt::Debug, A: BlockAllocator> fmt::Debug for DynArray<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: PartialEq, A: BlockAllocator> PartialEq for DynArray<T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: BlockAllocator> Eq for DynArray<T, A> {}

impl<T, A: BlockAllocator> Extend<T> for DynArray<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> FromIterator<T> for DynArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T, A: BlockAllocator> IntoIterator for DynArray<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(mut self) -> Self::IntoIter {
        // We leave an empty array behind and the iterator takes over the drop policy.
        let empty = RawBuffer::new_in(self.buffer.allocator().clone());
        let buffer = mem::replace(&mut self.buffer, empty);
        let len = mem::take(&mut self.len);

        IntoIter::new(buffer, len, self.drop_policy)
    }
}

impl<'a, T, A: BlockAllocator> IntoIterator for &'a DynArray<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, A: BlockAllocator> IntoIterator for &'a mut DynArray<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}
