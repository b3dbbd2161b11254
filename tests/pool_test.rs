// Integration tests for the BufferPool lifecycle
// Tests cover: lazy allocation, top-up reuse, capacity bound, FIFO release,
// reset/assert-empty, and full recycle round-trips

use stagepool::{BufferPool, ChunkBuffer, PoolConfig};

fn pool(buffer_size: usize, capacity: usize) -> BufferPool {
    BufferPool::new(PoolConfig::new(buffer_size, capacity).unwrap())
}

// Fills the active buffer completely and returns its id.
fn fill_one(pool: &mut BufferPool, fill: u8) -> stagepool::BufferId {
    let size = pool.buffer_size();
    let buf = pool.allocate();
    buf.put_slice(&vec![fill; size]);
    buf.id()
}

// ============================================================================
// Construction and Empty State
// ============================================================================

#[test]
fn test_fresh_pool_state() {
    let pool = pool(1024, 4);
    assert_eq!(pool.size(), 0, "No buffers before first allocate");
    assert_eq!(pool.active_index(), None, "Empty pool has no active buffer");
    assert_eq!(pool.total_buffered_bytes(), 0);
    assert!(pool.current_buffer().is_none());
    assert!(pool.buffer_at(0).is_none());
    pool.assert_empty();
}

#[test]
fn test_config_accessors() {
    let pool = pool(1024, 4);
    assert_eq!(pool.buffer_size(), 1024);
    assert_eq!(pool.capacity(), 4);
}

#[test]
fn test_zero_sizes_rejected_at_config() {
    assert!(PoolConfig::new(0, 4).is_err());
    assert!(PoolConfig::new(1024, 0).is_err());
}

// ============================================================================
// Allocation and Top-Up Reuse
// ============================================================================

#[test]
fn test_allocation_is_lazy() {
    let mut p = pool(1024, 4);
    assert_eq!(p.size(), 0);
    p.allocate();
    assert_eq!(p.size(), 1, "Buffers are allocated on demand, one at a time");
}

#[test]
fn test_partial_fill_tops_up_same_buffer() {
    let mut p = pool(1024, 4);
    let id = {
        let buf = p.allocate();
        buf.put_slice(&[0xAA; 500]);
        buf.id()
    };

    // 500 of 1024 bytes written: the next allocate must return the same
    // buffer, not start a new one.
    let buf = p.allocate();
    assert_eq!(buf.id(), id, "Partially filled buffer must be returned again");
    assert_eq!(buf.position(), 500);
    assert_eq!(buf.remaining(), 524);
    assert_eq!(p.size(), 1);
}

#[test]
fn test_full_buffer_advances_active_index() {
    let mut p = pool(8, 4);
    let first = fill_one(&mut p, 0xAA);
    assert_eq!(p.active_index(), Some(0));

    let second = p.allocate().id();
    assert_ne!(first, second, "Exhausted buffer must not be handed out again");
    assert_eq!(p.active_index(), Some(1));
    assert_eq!(p.size(), 2);
}

#[test]
fn test_size_never_exceeds_capacity() {
    let capacity = 4;
    let mut p = pool(8, capacity);
    for i in 0..capacity {
        fill_one(&mut p, i as u8);
        assert!(p.size() <= capacity);
    }
    assert_eq!(p.size(), capacity);
}

#[test]
#[should_panic(expected = "buffer pool exhausted")]
fn test_allocate_beyond_capacity_is_fatal() {
    let capacity = 3;
    let mut p = pool(8, capacity);
    for i in 0..capacity {
        fill_one(&mut p, i as u8);
    }
    // The (capacity + 1)-th buffer without an intervening release.
    p.allocate();
}

// ============================================================================
// FIFO Release and Recycling
// ============================================================================

#[test]
fn test_release_head_recycles_buffer() {
    let mut p = pool(8, 4);
    let first = fill_one(&mut p, 0xAA);
    p.allocate().put_slice(b"abc");
    assert_eq!(p.total_buffered_bytes(), 11);
    assert_eq!(p.active_index(), Some(1));

    p.release(first);

    assert_eq!(p.active_index(), Some(0), "Active index shifts down by one");
    assert_eq!(p.total_buffered_bytes(), 3, "Released buffer reads 0 bytes");
    let tail = p.buffer_at(1).expect("released buffer stays in the pool");
    assert_eq!(tail.id(), first, "Released buffer moves to the free tail");
    assert_eq!(tail.position(), 0);
}

#[test]
fn test_release_then_allocate_does_not_grow_pool() {
    let mut p = pool(8, 2);
    let first = fill_one(&mut p, 0xAA);
    fill_one(&mut p, 0xBB);
    p.release(first);

    // One free buffer exists, so this rotation must reuse it.
    let reused = p.allocate().id();
    assert_eq!(reused, first);
    assert_eq!(p.size(), 2, "Reuse must not allocate a fresh buffer");
    assert_eq!(p.allocate().position(), 0, "Reused buffer starts empty");
}

#[test]
#[should_panic(expected = "out-of-order release")]
fn test_out_of_order_release_is_fatal() {
    let mut p = pool(8, 3);
    fill_one(&mut p, 0xAA);
    let newest = fill_one(&mut p, 0xBB);
    p.release(newest);
}

#[test]
#[should_panic(expected = "no in-flight buffers")]
fn test_release_on_empty_pool_is_fatal() {
    let mut p = pool(8, 2);
    p.release(ChunkBuffer::allocate(8).id());
}

#[test]
#[should_panic(expected = "no in-flight buffers")]
fn test_double_release_is_fatal() {
    let mut p = pool(8, 2);
    let id = fill_one(&mut p, 0xAA);
    p.release(id);
    p.release(id);
}

#[test]
fn test_full_cycle_recycles_instead_of_reallocating() {
    let capacity = 4;
    let mut p = pool(8, capacity);

    let ids: Vec<_> = (0..capacity).map(|i| fill_one(&mut p, i as u8)).collect();
    assert_eq!(p.size(), capacity);
    assert_eq!(p.active_index(), Some(capacity - 1));

    // Release all buffers in allocation order.
    for id in &ids {
        p.release(*id);
    }

    assert_eq!(p.size(), capacity, "Buffers are retained, not freed");
    assert_eq!(p.active_index(), None);
    assert_eq!(p.total_buffered_bytes(), 0);
    p.assert_empty();

    // A second drive through the pool reuses the same buffers.
    let second_round: Vec<_> = (0..capacity).map(|i| fill_one(&mut p, i as u8)).collect();
    assert_eq!(second_round, ids, "Second cycle must reuse, not reallocate");
    assert_eq!(p.size(), capacity);
}

// ============================================================================
// Reset and Emptiness Checks
// ============================================================================

#[test]
fn test_assert_empty_passes_with_zero_staged_bytes() {
    let mut p = pool(8, 2);
    let id = fill_one(&mut p, 0xAA);
    p.release(id);
    p.assert_empty();
}

#[test]
#[should_panic(expected = "unflushed bytes")]
fn test_assert_empty_is_fatal_with_staged_bytes() {
    let mut p = pool(8, 2);
    p.allocate().put_slice(b"unsent");
    p.assert_empty();
}

#[test]
fn test_reset_discards_regardless_of_staged_bytes() {
    let mut p = pool(8, 4);
    fill_one(&mut p, 0xAA);
    p.allocate().put_slice(b"pending");
    assert!(p.total_buffered_bytes() > 0);

    p.reset();

    assert_eq!(p.size(), 0);
    assert_eq!(p.active_index(), None);
    assert_eq!(p.total_buffered_bytes(), 0);
}

#[test]
fn test_pool_usable_after_reset() {
    let mut p = pool(8, 2);
    fill_one(&mut p, 0xAA);
    p.reset();

    let id = fill_one(&mut p, 0xBB);
    assert_eq!(p.size(), 1);
    p.release(id);
    p.assert_empty();
}

// ============================================================================
// Wire Conversion
// ============================================================================

#[test]
fn test_default_conversion_copies_filled_region() {
    let mut p = pool(64, 2);
    p.allocate().put_slice(b"chunk payload");

    let buf = p.current_buffer().unwrap();
    let wire = (p.conversion())(buf.as_slice());
    assert_eq!(&wire[..], b"chunk payload");

    // Converting does not consume staged bytes; release does.
    assert_eq!(p.total_buffered_bytes(), 13);
}

#[test]
fn test_custom_conversion_is_stored_not_invoked() {
    use std::cell::Cell;
    use std::rc::Rc;

    let calls = Rc::new(Cell::new(0u32));
    let seen = Rc::clone(&calls);
    let mut p = BufferPool::with_conversion(
        PoolConfig::new(8, 2).unwrap(),
        Box::new(move |region| {
            seen.set(seen.get() + 1);
            bytes::Bytes::copy_from_slice(region)
        }),
    );

    // A full fill/release cycle must not trigger the conversion.
    let id = fill_one(&mut p, 0xAA);
    p.release(id);
    assert_eq!(calls.get(), 0, "Pool must never invoke the conversion itself");

    let wire = (p.conversion())(b"xy");
    assert_eq!(calls.get(), 1);
    assert_eq!(&wire[..], b"xy");
}
