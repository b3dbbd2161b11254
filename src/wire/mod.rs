//! Conversion from a filled buffer region to a wire-ready byte sequence.
//!
//! The pool stores a [`Conversion`] at construction and exposes it through
//! [`BufferPool::conversion`](crate::BufferPool::conversion) for the
//! caller's flush path. The pool itself never invokes it; how (and when)
//! staged bytes become wire bytes is the write stream's business.

use bytes::Bytes;

/// A pluggable function turning a filled buffer region into an immutable
/// wire-ready byte sequence.
pub type Conversion = Box<dyn Fn(&[u8]) -> Bytes>;

/// Returns the default conversion: a plain copy into freshly owned
/// [`Bytes`].
///
/// Used when no zero-copy or codec-specific conversion is configured.
pub fn copy_conversion() -> Conversion {
    Box::new(Bytes::copy_from_slice)
}
