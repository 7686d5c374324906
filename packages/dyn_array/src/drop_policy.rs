/// Determines what happens to remaining elements when a [`DynArray`][crate::DynArray] is dropped.
///
/// By default, the array drops its elements when it is dropped.
///
/// # Examples
///
/// ```
/// use dyn_array::{DropPolicy, DynArray};
///
/// // The drop policy is set at creation time.
/// let mut array = DynArray::<u32>::builder()
///     .drop_policy(DropPolicy::MustNotDropItems)
///     .build();
///
/// array.push(1);
///
/// // The array must be emptied before it goes away.
/// array.clear();
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum DropPolicy {
    /// The array will drop its elements when the array is dropped. This is the default.
    #[default]
    MayDropItems,

    /// The array will panic if it still contains elements when it is dropped.
    ///
    /// This may be valuable if the elements carry obligations that must be discharged explicitly
    /// (for example, handing them back to their origin) before they can be discarded.
    MustNotDropItems,
}
