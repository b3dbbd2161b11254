//! stagepool
//!
//! Bounded pool of reusable, fixed-size staging buffers for chunked
//! storage writes.
//!
//! `stagepool` sits between a write stream and a remote storage service
//! that acknowledges writes in order. It hands out a buffer to write
//! into, lets partial fills be topped up across calls, caps total memory
//! at `capacity * buffer_size`, and recycles each buffer once its
//! contents have been durably accepted downstream. Memory is retained
//! and reused across fill/drain cycles rather than returned to the
//! allocator, trading peak-memory predictability for zero reallocation
//! churn.
//!
//! The crate intentionally:
//! - does NOT transmit anything (no network, no I/O)
//! - does NOT retry or back off
//! - does NOT frame chunks or own a wire format
//! - does NOT synchronize; one logical writer owns the pool
//!
//! It only does one thing: **manage the buffer lifecycle**.
//!
//! # Protocol contract
//!
//! Buffers must be released in exactly the order they were allocated,
//! matching the downstream service's in-order acknowledgment guarantee.
//! The pool actively checks this and panics on violations: releasing out
//! of order, releasing twice, allocating past capacity, or asserting
//! emptiness while bytes are still staged are all caller bugs, not
//! runtime conditions to recover from.
//!
//! # Example
//!
//! ```
//! use stagepool::{BufferPool, PoolConfig};
//!
//! fn main() -> Result<(), stagepool::PoolError> {
//!     let mut pool = BufferPool::new(PoolConfig::new(1024, 4)?);
//!
//!     // Fill the active buffer across several writes.
//!     pool.allocate().put_slice(&[1; 400]);
//!     pool.allocate().put_slice(&[2; 400]);
//!     let id = pool.current_buffer().unwrap().id();
//!
//!     // Flush: convert the filled region for the wire.
//!     let region = pool.current_buffer().unwrap().as_slice();
//!     let wire = (pool.conversion())(region);
//!     assert_eq!(wire.len(), 800);
//!
//!     // Downstream acknowledged in order: recycle.
//!     pool.release(id);
//!     pool.assert_empty();
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod config;
mod error;
mod pool;
mod wire;

//
// Public surface (intentionally tiny)
//

pub use buffer::{BufferId, ChunkBuffer};
pub use config::{DEFAULT_BUFFER_SIZE, DEFAULT_CAPACITY, PoolConfig};
pub use error::PoolError;
pub use pool::BufferPool;
pub use wire::{Conversion, copy_conversion};
