use super::*;

// ============================================================================
// Basic allocation tests
// ============================================================================

#[test]
fn test_sequential_allocate() {
    let mut slots = SlotAllocator::new();
    assert_eq!(slots.allocate(), 0);
    assert_eq!(slots.allocate(), 1);
    assert_eq!(slots.allocate(), 2);
}

#[test]
fn test_new_is_empty() {
    let slots = SlotAllocator::new();
    assert!(slots.is_empty());
    assert_eq!(slots.len(), 0);
    assert_eq!(slots.range(), 0);
}

// ============================================================================
// Release and recycle tests
// ============================================================================

#[test]
fn test_release_and_recycle() {
    let mut slots = SlotAllocator::new();
    let a = slots.allocate(); // 0
    let b = slots.allocate(); // 1
    slots.release(a);
    let c = slots.allocate(); // 0 recycled
    assert_eq!(c, 0);
    assert_eq!(b, 1);
}

#[test]
fn test_release_multiple_recycle_lifo() {
    // The free list is a stack: last released = first recycled
    let mut slots = SlotAllocator::new();
    let a = slots.allocate(); // 0
    let _b = slots.allocate(); // 1
    let c = slots.allocate(); // 2
    slots.release(a); // free list: [0]
    slots.release(c); // free list: [0, 2]

    assert_eq!(slots.allocate(), 2);
    assert_eq!(slots.allocate(), 0);
    assert_eq!(slots.allocate(), 3);
}

// ============================================================================
// Liveness tests
// ============================================================================

#[test]
fn test_is_live_tracks_slot_state() {
    let mut slots = SlotAllocator::new();

    assert!(!slots.is_live(0));

    let a = slots.allocate();
    assert!(slots.is_live(a));

    slots.release(a);
    assert!(!slots.is_live(a));

    // Out-of-range slots are never live
    assert!(!slots.is_live(99));
}

#[test]
fn test_len_plus_free_count_never_exceeds_range() {
    let mut slots = SlotAllocator::new();

    for _ in 0..20 {
        slots.allocate();
    }
    for slot in 0..10 {
        slots.release(slot);
    }
    for _ in 0..5 {
        slots.allocate();
    }

    // len + free slots == highest-ever range
    assert_eq!(slots.len(), 15);
    assert_eq!(slots.range(), 20);
    assert!(slots.len() <= slots.range());
}

#[test]
fn test_range_never_decreases() {
    let mut slots = SlotAllocator::new();

    slots.allocate();
    slots.allocate();
    assert_eq!(slots.range(), 2);

    slots.release(0);
    slots.release(1);
    assert_eq!(slots.range(), 2);

    slots.allocate(); // recycled
    assert_eq!(slots.range(), 2);

    slots.allocate(); // recycled
    slots.allocate(); // fresh
    assert_eq!(slots.range(), 3);
}

// ============================================================================
// Pattern tests
// ============================================================================

#[test]
fn test_live_slots_are_distinct() {
    let mut slots = SlotAllocator::new();
    let mut seen = std::collections::HashSet::new();

    for _ in 0..50 {
        seen.insert(slots.allocate());
    }
    for slot in 0..10 {
        slots.release(slot);
        seen.remove(&slot);
    }
    for _ in 0..10 {
        let slot = slots.allocate();
        assert!(seen.insert(slot), "duplicate live slot: {}", slot);
    }

    assert_eq!(seen.len(), 50);
}

#[test]
fn test_recycled_handle_may_equal_destroyed_one() {
    let mut slots = SlotAllocator::new();
    let handle = slots.allocate();
    slots.release(handle);
    assert_eq!(slots.allocate(), handle);
}
