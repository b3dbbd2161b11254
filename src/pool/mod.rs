//! The buffer pool - bounded allocation, reuse, and FIFO release.
//!
//! [`BufferPool`] manages up to `capacity` buffers of `buffer_size` bytes
//! each. Buffers are allocated lazily, topped up across partial writes,
//! and recycled once the downstream service has durably accepted their
//! contents.
//!
//! # Example
//!
//! ```
//! use stagepool::{BufferPool, PoolConfig};
//!
//! let mut pool = BufferPool::new(PoolConfig::new(1024, 4)?);
//!
//! // Stage two small writes; both land in the same buffer.
//! pool.allocate().put_slice(&[0xAA; 300]);
//! let buf = pool.allocate();
//! buf.put_slice(&[0xBB; 200]);
//! let id = buf.id();
//! assert_eq!(pool.total_buffered_bytes(), 500);
//!
//! // Downstream acknowledged: recycle the oldest buffer.
//! pool.release(id);
//! assert_eq!(pool.total_buffered_bytes(), 0);
//! assert_eq!(pool.size(), 1); // memory retained, not freed
//! # Ok::<(), stagepool::PoolError>(())
//! ```

use std::collections::VecDeque;

use crate::buffer::{BufferId, ChunkBuffer};
use crate::config::PoolConfig;
use crate::wire::{Conversion, copy_conversion};

/// A bounded pool of reusable fixed-size staging buffers.
///
/// The pool owns every buffer it hands out. Buffers at the front of the
/// internal sequence, up to and including the active one, are *in-flight*:
/// they hold staged data that downstream has not yet acknowledged, in
/// allocation order with the oldest first. Buffers past the active index
/// are cleared and free for reuse.
///
/// # Release discipline
///
/// The underlying protocol acknowledges writes in the order they were
/// issued, so buffers must be released in exactly allocation order.
/// [`release`](BufferPool::release) only ever accepts the oldest in-flight
/// buffer and panics on anything else; an out-of-order release is a
/// protocol bug in the caller, not a runtime condition to recover from.
///
/// # Single writer
///
/// The pool performs no internal synchronization. It assumes sequential,
/// non-overlapping calls from the one write stream that owns it; sharing
/// it across threads requires external mutual exclusion.
pub struct BufferPool {
    /// Oldest buffer at the front. Front..=active are in-flight,
    /// the rest are cleared and free.
    buffers: VecDeque<ChunkBuffer>,
    /// Index of the active buffer, `None` when no buffer is in flight.
    current: Option<usize>,
    buffer_size: usize,
    capacity: usize,
    conversion: Conversion,
}

impl BufferPool {
    /// Creates an empty pool with the default copying conversion.
    ///
    /// No buffers are allocated until the first
    /// [`allocate`](BufferPool::allocate) call.
    pub fn new(config: PoolConfig) -> Self {
        Self::with_conversion(config, copy_conversion())
    }

    /// Creates an empty pool with a caller-supplied conversion.
    ///
    /// The conversion is stored and exposed via
    /// [`conversion`](BufferPool::conversion); the pool never invokes it.
    pub fn with_conversion(config: PoolConfig, conversion: Conversion) -> Self {
        Self {
            buffers: VecDeque::with_capacity(config.capacity()),
            current: None,
            buffer_size: config.buffer_size(),
            capacity: config.capacity(),
            conversion,
        }
    }

    /// Returns the buffer the caller should write into next.
    ///
    /// If the active buffer still has remaining capacity it is returned
    /// unchanged, so writes smaller than the buffer size pack together.
    /// Otherwise the pool advances to the next slot: a previously released
    /// buffer is reused when one is free, and a fresh buffer of
    /// `buffer_size` bytes is allocated when none is.
    ///
    /// # Panics
    ///
    /// Panics if a fresh allocation would exceed the configured capacity.
    /// That means the caller has more concurrent unacknowledged data than
    /// the pool was sized for, which is a configuration mismatch, not a
    /// condition to retry.
    pub fn allocate(&mut self) -> &mut ChunkBuffer {
        if let Some(index) = self.current {
            if self.buffers[index].has_remaining() {
                return &mut self.buffers[index];
            }
        }

        let next = self.current.map_or(0, |index| index + 1);
        if next == self.buffers.len() {
            assert!(
                self.buffers.len() < self.capacity,
                "buffer pool exhausted: all {} buffers are in flight",
                self.capacity,
            );
            self.buffers.push_back(ChunkBuffer::allocate(self.buffer_size));
        }
        self.current = Some(next);

        let buffer = &mut self.buffers[next];
        // Released buffers are cleared before joining the free tail, so a
        // reused buffer always starts at position 0. Checked, not assumed.
        assert!(
            buffer.is_empty(),
            "reused buffer not empty: {} stale bytes",
            buffer.position(),
        );
        buffer
    }

    /// Releases the oldest in-flight buffer once its data has been
    /// durably accepted downstream.
    ///
    /// The buffer is cleared and moved to the free tail of the pool, ready
    /// for reuse without a fresh allocation. `id` must identify the oldest
    /// in-flight buffer; acknowledgments arrive in issue order, so any
    /// other id means the caller released out of order or twice.
    ///
    /// # Panics
    ///
    /// Panics if the pool has no in-flight buffer, or if `id` is not the
    /// id of the oldest in-flight buffer.
    pub fn release(&mut self, id: BufferId) {
        let Some(index) = self.current else {
            panic!("release on a pool with no in-flight buffers");
        };
        // Always remove from the head: FIFO acknowledgment order.
        let mut head = self
            .buffers
            .pop_front()
            .expect("in-flight index set on an empty pool");
        assert!(
            head.id() == id,
            "out-of-order release: {:?} is not the oldest in-flight buffer {:?}",
            id,
            head.id(),
        );
        head.clear();
        self.buffers.push_back(head);
        self.current = index.checked_sub(1);
    }

    /// Returns the active buffer, or `None` when nothing is in flight.
    ///
    /// Never allocates; use [`allocate`](BufferPool::allocate) to obtain
    /// a buffer to write into.
    pub fn current_buffer(&self) -> Option<&ChunkBuffer> {
        self.current.map(|index| &self.buffers[index])
    }

    /// Mutable variant of [`current_buffer`](BufferPool::current_buffer).
    pub fn current_buffer_mut(&mut self) -> Option<&mut ChunkBuffer> {
        self.current.map(|index| &mut self.buffers[index])
    }

    /// Discards every buffer and returns the pool to its freshly
    /// constructed state.
    ///
    /// Used on error and abort paths where outstanding buffers must be
    /// dropped regardless of content. Call
    /// [`assert_empty`](BufferPool::assert_empty) first when the reset is
    /// expected to be clean.
    pub fn reset(&mut self) {
        self.buffers.clear();
        self.current = None;
    }

    /// Asserts that no staged bytes remain anywhere in the pool.
    ///
    /// Guard for resets that are expected to be clean: discarding a buffer
    /// that still holds unflushed bytes is silent data loss.
    ///
    /// # Panics
    ///
    /// Panics if [`total_buffered_bytes`](BufferPool::total_buffered_bytes)
    /// is non-zero.
    pub fn assert_empty(&self) {
        let staged = self.total_buffered_bytes();
        assert!(
            staged == 0,
            "buffer pool not empty: {} unflushed bytes staged",
            staged,
        );
    }

    /// Returns the total number of staged, unacknowledged bytes.
    ///
    /// The sum of every buffer's position. Free buffers are cleared and
    /// contribute zero; only in-flight buffers count.
    pub fn total_buffered_bytes(&self) -> usize {
        self.buffers.iter().map(ChunkBuffer::position).sum()
    }

    /// Returns the number of buffers currently held (in-flight and free).
    pub fn size(&self) -> usize {
        self.buffers.len()
    }

    /// Returns the buffer at `index` in allocation-age order (oldest
    /// in-flight first), or `None` if out of range.
    pub fn buffer_at(&self, index: usize) -> Option<&ChunkBuffer> {
        self.buffers.get(index)
    }

    /// Returns the index of the active buffer, or `None` when the pool
    /// has no buffer in flight.
    pub fn active_index(&self) -> Option<usize> {
        self.current
    }

    /// Returns the capacity in bytes of every buffer in the pool.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Returns the maximum number of buffers the pool may hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the stored conversion for turning a filled region into a
    /// wire-ready byte sequence.
    ///
    /// ```
    /// use stagepool::{BufferPool, PoolConfig};
    ///
    /// let mut pool = BufferPool::new(PoolConfig::new(64, 2)?);
    /// pool.allocate().put_slice(b"chunk payload");
    ///
    /// let buf = pool.current_buffer().unwrap();
    /// let wire = (pool.conversion())(buf.as_slice());
    /// assert_eq!(&wire[..], b"chunk payload");
    /// # Ok::<(), stagepool::PoolError>(())
    /// ```
    pub fn conversion(&self) -> &Conversion {
        &self.conversion
    }
}

impl std::fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferPool")
            .field("size", &self.buffers.len())
            .field("active_index", &self.current)
            .field("buffer_size", &self.buffer_size)
            .field("capacity", &self.capacity)
            .field("buffered_bytes", &self.total_buffered_bytes())
            .finish()
    }
}
