//! Handle & Slot Table Tests
//!
//! Tests for:
//! - pack/unpack: bit layout, sign preservation, bijection
//! - SlotTable: allocate, resolve, free, generation bumps, stale detection
//! - Thread safety: concurrent allocate/resolve/free

use std::sync::Arc;
use std::thread;

use tessera::{Handle, SlotTable, TesseraError, pack, unpack};

// ============================================================================
// Handle Packing
// ============================================================================

#[test]
fn pack_unpack_mixed_signs() {
    let raw = pack(5, -3);
    assert_eq!(unpack(raw), (5, -3));
}

#[test]
fn pack_unpack_extremes() {
    let values = [0, 1, -1, 42, -42, i32::MIN, i32::MAX, 0x7f00_00ff];
    for &slot in &values {
        for &generation in &values {
            assert_eq!(
                unpack(pack(slot, generation)),
                (slot, generation),
                "round trip failed for ({slot}, {generation})"
            );
        }
    }
}

#[test]
fn pack_layout_is_slot_high_generation_low() {
    let raw = pack(0x0102_0304, 0x0506_0708);
    assert_eq!(raw, 0x0102_0304_0506_0708);
    // A negative generation must not bleed into the slot half.
    assert_eq!(pack(3, -1) >> 32, 3);
}

#[test]
fn handle_is_plain_i64_across_boundaries() {
    let handle = Handle::new(9, 4);
    let raw: i64 = handle.into();
    assert_eq!(Handle::from(raw), handle);
    assert_eq!(raw, pack(9, 4));
}

// ============================================================================
// SlotTable
// ============================================================================

#[test]
fn slot_reuse_invalidates_old_handle() {
    let table = SlotTable::<String>::new();
    let h0 = table.allocate("first");
    table.free(h0).unwrap();

    let h1 = table.allocate("second");
    assert_eq!(h1.slot_index(), h0.slot_index());
    assert_ne!(h1.generation(), h0.generation());

    assert_eq!(
        table.resolve(h0).unwrap_err(),
        TesseraError::StaleHandle {
            slot: h0.slot_index(),
            generation: h0.generation()
        }
    );
    assert_eq!(&*table.resolve(h1).unwrap(), "second");
}

#[test]
fn free_list_is_reused_before_growing() {
    let table = SlotTable::<u64>::new();
    let handles: Vec<Handle> = (0..8_u64).map(|i| table.allocate(i)).collect();
    for &handle in &handles[..4] {
        table.free(handle).unwrap();
    }
    for i in 0..4_u64 {
        table.allocate(100 + i);
    }
    assert_eq!(table.capacity(), 8);
    assert_eq!(table.len(), 8);
    assert_eq!(table.free_len(), 0);
}

#[test]
fn resolved_payload_outlives_free() {
    let table = SlotTable::<String>::new();
    let handle = table.allocate("payload");
    let payload = table.resolve(handle).unwrap();
    table.free(handle).unwrap();

    assert_eq!(&*payload, "payload");
    assert!(!table.contains(handle));
}

#[test]
fn generation_keeps_counting_across_reuse() {
    let table = SlotTable::<u32>::new();
    let mut handle = table.allocate(0_u32);
    for round in 1..=5 {
        table.free(handle).unwrap();
        handle = table.allocate(round as u32);
        assert_eq!(handle.generation(), round);
    }
}

// ============================================================================
// Thread Safety
// ============================================================================

#[test]
fn concurrent_allocations_get_distinct_handles() {
    let table = Arc::new(SlotTable::<usize>::new());

    let workers: Vec<_> = (0..8)
        .map(|worker| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                (0_usize..256)
                    .map(|i| table.allocate(worker * 1000 + i))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut all: Vec<Handle> = workers
        .into_iter()
        .flat_map(|w| w.join().unwrap())
        .collect();
    let count = all.len();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), count);
    assert_eq!(table.len(), count);
}

#[test]
fn concurrent_churn_never_resolves_wrong_payload() {
    let table = Arc::new(SlotTable::<(usize, usize)>::new());

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                for i in 0..500 {
                    let handle = table.allocate((worker, i));
                    assert_eq!(*table.resolve(handle).unwrap(), (worker, i));
                    table.free(handle).unwrap();
                    assert!(table.resolve(handle).is_err());
                }
            })
        })
        .collect();

    for w in workers {
        w.join().unwrap();
    }
    assert!(table.is_empty());
}
