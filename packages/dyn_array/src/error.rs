use thiserror::Error;

/// Errors that can occur when acquiring storage for a [`DynArray`][crate::DynArray] or a
/// [`RawBuffer`][crate::RawBuffer].
///
/// Only the fallible `try_*` methods return this error. Their infallible counterparts panic
/// with the same message instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested capacity cannot be expressed as a memory layout on this platform.
    #[error("requested capacity exceeds the maximum memory block size")]
    CapacityOverflow,

    /// The allocator was unable to provide a memory block of the requested size.
    #[error("failed to allocate a memory block of {size} bytes aligned to {align} bytes")]
    AllocationFailed {
        /// Size of the requested block, in bytes.
        size: usize,

        /// Alignment of the requested block, in bytes.
        align: usize,
    },
}

/// A specialized `Result` type for storage operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn allocation_failed_mentions_layout() {
        let error = Error::AllocationFailed {
            size: 64,
            align: 8,
        };

        let message = error.to_string();
        assert!(message.contains("64 bytes"));
        assert!(message.contains("8 bytes"));
    }

    #[test]
    fn capacity_overflow_is_error() {
        let result: Result<()> = Err(Error::CapacityOverflow);
        assert!(matches!(result, Err(Error::CapacityOverflow)));
    }
}
