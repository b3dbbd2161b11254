//! Fixed-capacity staging buffer.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::BytesMut;

// Identity source for BufferId. Ids only need to be unique within a
// process; allocation order across pools is irrelevant.
static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(0);

/// Opaque identity handle for a [`ChunkBuffer`].
///
/// Assigned once at allocation and stable for the buffer's lifetime,
/// including across [`ChunkBuffer::clear`] and pool reuse. The pool
/// compares ids (identity, never content) to detect out-of-order or
/// double release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(u64);

/// A fixed-capacity mutable byte region with a write cursor.
///
/// The buffer tracks how many bytes have been written since the last
/// [`clear`](ChunkBuffer::clear) (its *position*). Capacity is fixed at
/// allocation: writing past it is a caller bug and panics, it never
/// reallocates. Clearing resets the position to 0 while retaining the
/// underlying memory, which is what makes pool reuse free.
///
/// # Example
///
/// ```
/// use stagepool::ChunkBuffer;
///
/// let mut buf = ChunkBuffer::allocate(1024);
/// buf.put_slice(&[0xAB; 500]);
///
/// assert_eq!(buf.position(), 500);
/// assert_eq!(buf.remaining(), 524);
/// assert!(buf.has_remaining());
///
/// buf.clear();
/// assert_eq!(buf.position(), 0);
/// assert_eq!(buf.capacity(), 1024);
/// ```
pub struct ChunkBuffer {
    id: BufferId,
    data: BytesMut,
    capacity: usize,
}

impl ChunkBuffer {
    /// Allocates a buffer with the given fixed capacity in bytes.
    pub fn allocate(capacity: usize) -> Self {
        Self {
            id: BufferId(NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed)),
            data: BytesMut::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns this buffer's identity handle.
    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Returns the fixed capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of bytes written since the last clear.
    pub fn position(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of bytes that can still be written.
    pub fn remaining(&self) -> usize {
        self.capacity - self.data.len()
    }

    /// Returns true while the buffer has writable headroom
    /// (`position() < capacity()`).
    pub fn has_remaining(&self) -> bool {
        self.data.len() < self.capacity
    }

    /// Returns true if no bytes have been written since the last clear.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Appends `src` to the filled region.
    ///
    /// # Panics
    ///
    /// Panics if `src` does not fit in the remaining capacity. Callers
    /// are expected to check [`remaining`](ChunkBuffer::remaining) and
    /// split their writes; the buffer never grows.
    pub fn put_slice(&mut self, src: &[u8]) {
        assert!(
            src.len() <= self.remaining(),
            "write of {} bytes exceeds remaining capacity {}",
            src.len(),
            self.remaining(),
        );
        self.data.extend_from_slice(src);
    }

    /// Resets the position to 0, logically emptying the buffer.
    ///
    /// Capacity and the underlying memory are retained.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Returns a view of the filled region (`position()` bytes).
    ///
    /// This is the input handed to the pool's conversion function at
    /// flush time.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for ChunkBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkBuffer")
            .field("id", &self.id)
            .field("position", &self.position())
            .field("capacity", &self.capacity)
            .finish()
    }
}
