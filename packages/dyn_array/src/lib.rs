#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A contiguous, growable array that manages raw storage and element lifetimes by hand.
//!
//! The crate is built from two layers:
//!
//! - [`RawBuffer<T>`] owns a block of uninitialized storage with room for a fixed number of `T`
//!   values. It allocates and releases memory and computes slot addresses, but never constructs
//!   or destroys a `T`.
//! - [`DynArray<T>`] owns one `RawBuffer` plus a count of live elements. It manages element
//!   lifetimes and growth, and offers positional mutation.
//!
//! # Key Features
//!
//! - **Doubling growth**: capacity goes 0, 1, 2, 4, 8, ... as elements are appended, making
//!   appends amortized O(1). Capacity never shrinks.
//! - **Construct in place**: [`emplace_last_with()`][DynArray::emplace_last_with] and
//!   [`emplace_with()`][DynArray::emplace_with] construct the new element directly in its
//!   final slot, including when the storage is being replaced.
//! - **Failure safety**: growing, appending and inserting either fully succeed or leave the
//!   array exactly as it was, even if allocation fails or constructing the new element panics.
//! - **Fallible reservation**: [`try_reserve()`][DynArray::try_reserve] reports allocation
//!   failure as an [`Error`] instead of panicking.
//! - **Constant-time ownership transfer**: moving or [swapping][DynArray::swap] arrays never
//!   touches individual elements.
//!
//! # Examples
//!
//! ```rust
//! use dyn_array::DynArray;
//!
//! let mut array = DynArray::new();
//!
//! array.push(1);
//! array.push(2);
//! array.push(3);
//!
//! assert_eq!(array.len(), 3);
//! assert_eq!(array.capacity(), 4);
//!
//! // Insert at a logical position, shifting the rest to the right.
//! array.insert(1, 10);
//! assert_eq!(array.as_slice(), [1, 10, 2, 3]);
//!
//! // Erase shifts the rest to the left.
//! array.erase(0);
//! assert_eq!(array.as_slice(), [10, 2, 3]);
//!
//! // Growing via resize default-constructs the new elements.
//! array.resize(5);
//! assert_eq!(array.as_slice(), [10, 2, 3, 0, 0]);
//! ```
//!
//! ## Copy Assignment
//!
//! ```rust
//! use dyn_array::DynArray;
//!
//! let source: DynArray<String> = ["a", "b", "c"].into_iter().map(String::from).collect();
//!
//! let mut target = DynArray::with_capacity(8);
//! target.push(String::from("old"));
//!
//! // The source fits in the target's capacity, so the target's storage is reused.
//! target.clone_from(&source);
//!
//! assert_eq!(target.as_slice(), ["a", "b", "c"]);
//! assert_eq!(target.capacity(), 8);
//! ```
//!
//! # Thread safety
//!
//! The array has no internal synchronization. It is [`Send`] and [`Sync`] whenever `T` is, so it
//! can be moved between threads or shared immutably, but mutation requires exclusive access as
//! usual.

mod allocator;
mod builder;
mod drop_policy;
mod dyn_array;
mod error;
mod into_iter;
mod raw_buffer;

#[cfg(test)]
mod test_support;

pub use allocator::{BlockAllocator, Global};
pub use builder::DynArrayBuilder;
pub use drop_policy::DropPolicy;
pub use dyn_array::DynArray;
pub use error::Error;
pub(crate) use error::Result;
pub use into_iter::IntoIter;
pub use raw_buffer::RawBuffer;
