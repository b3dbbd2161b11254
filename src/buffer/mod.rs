//! The fixed-capacity staging buffer the pool hands out.
//!
//! - [`ChunkBuffer`] - mutable byte region with position tracking and
//!   clear-without-dealloc
//! - [`BufferId`] - opaque identity handle used to validate release order

mod chunk;

pub use chunk::{BufferId, ChunkBuffer};
