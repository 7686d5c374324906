use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

use crate::{DropPolicy, DynArray, Global, RawBuffer};

/// Builder for creating an instance of [`DynArray`].
///
/// You only need to use this builder if you want to customize the array configuration.
/// The default configuration used by [`DynArray::new()`][1] starts with zero capacity and
/// drops any remaining elements when the array is dropped.
///
/// # Examples
///
/// ```
/// use dyn_array::{DropPolicy, DynArray};
///
/// let array = DynArray::<String>::builder()
///     .capacity(16)
///     .drop_policy(DropPolicy::MayDropItems)
///     .build();
///
/// assert_eq!(array.capacity(), 16);
/// assert!(array.is_empty());
/// ```
///
/// [1]: DynArray::new
#[must_use]
pub struct DynArrayBuilder<T> {
    capacity: usize,
    drop_policy: DropPolicy,

    _item: PhantomData<T>,
}

impl<T> fmt::Debug for DynArrayBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynArrayBuilder")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("capacity", &self.capacity)
            .field("drop_policy", &self.drop_policy)
            .finish()
    }
}

impl<T> DynArrayBuilder<T> {
    pub(crate) fn new() -> Self {
        Self {
            capacity: 0,
            drop_policy: DropPolicy::default(),
            _item: PhantomData,
        }
    }

    /// Sets the initial capacity of the array. The default is zero, which does not allocate.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::DynArray;
    ///
    /// let array = DynArray::<u64>::builder().capacity(100).build();
    ///
    /// assert_eq!(array.capacity(), 100);
    /// ```
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the [drop policy][DropPolicy] for the array. This governs how
    /// to treat remaining elements in the array when the array is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::{DropPolicy, DynArray};
    ///
    /// let array = DynArray::<u32>::builder()
    ///     .drop_policy(DropPolicy::MustNotDropItems)
    ///     .build();
    /// ```
    pub fn drop_policy(mut self, policy: DropPolicy) -> Self {
        self.drop_policy = policy;
        self
    }

    /// Builds the array with the specified configuration.
    ///
    /// # Panics
    ///
    /// Panics if the initial capacity cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyn_array::DynArray;
    ///
    /// let array = DynArray::<u32>::builder().build();
    ///
    /// assert_eq!(array.capacity(), 0);
    /// ```
    #[must_use]
    pub fn build(self) -> DynArray<T> {
        DynArray::from_parts(
            RawBuffer::with_capacity_in(self.capacity, Global),
            self.drop_policy,
        )
    }
}
