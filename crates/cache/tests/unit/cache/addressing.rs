//! Set Selection, Lookup, and Slot Inspection Tests.

use cohsim_cache::config::CacheMemoryConfig;
use cohsim_cache::{AccessPermission, CacheError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use crate::common::harness::{build, entry, install, line, small_cache};

// ══════════════════════════════════════════════════════════
// 1. Geometry
// ══════════════════════════════════════════════════════════

#[test]
fn geometry_accessors_follow_config() {
    let cache = small_cache();
    assert_eq!(cache.cache_size(), 256);
    assert_eq!(cache.assoc(), 2);
    assert_eq!(cache.num_sets(), 2);
    assert_eq!(cache.num_blocks(), 4);
    assert_eq!(cache.block_size(), 64);
    assert_eq!(cache.tag_latency(), 1);
    assert_eq!(cache.data_latency(), 1);
    assert!(!cache.uses_occupancy());
}

// ══════════════════════════════════════════════════════════
// 2. Set selection
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0x0000, 0)]
#[case(0x0040, 1)]
#[case(0x0080, 0)]
#[case(0x10c0, 1)]
fn set_of_uses_bit_six(#[case] addr: u64, #[case] set: usize) {
    assert_eq!(small_cache().set_of(addr), Ok(set));
}

#[test]
fn set_of_rejects_unaligned_address() {
    assert_eq!(
        small_cache().set_of(0x44),
        Err(CacheError::Unaligned {
            addr: 0x44,
            block_size: 64
        })
    );
}

#[test]
fn start_index_bit_moves_the_field() {
    let cache = build(&CacheMemoryConfig {
        start_index_bit: 10,
        ..crate::common::harness::small_config()
    });
    assert_eq!(cache.set_of(0x040), Ok(0));
    assert_eq!(cache.set_of(0x400), Ok(1));
}

proptest! {
    #[test]
    fn set_of_is_the_index_bit_field(addr in any::<u64>()) {
        let cache = build(&CacheMemoryConfig::default());
        let aligned = addr & !63;
        let expected = ((aligned >> 6) & (cache.num_sets() as u64 - 1)) as usize;
        prop_assert_eq!(cache.set_of(aligned), Ok(expected));
    }
}

// ══════════════════════════════════════════════════════════
// 3. Lookup
// ══════════════════════════════════════════════════════════

#[test]
fn lookup_finds_allocated_line() {
    let mut cache = small_cache();
    let a = line(1, 3);
    cache.allocate(a, entry(), 0).unwrap();

    let found = cache.lookup(a).unwrap().expect("resident");
    assert_eq!(found.address(), a);
    assert_eq!(found.position(), (1, 0));
    assert_eq!(cache.find_tag_in_set(1, a), Some(0));
    assert_eq!(cache.find_tag_in_set(0, a), None);
    assert!(cache.lookup(line(1, 4)).unwrap().is_none());
}

#[test]
fn not_present_lines_are_hidden_from_normal_lookup() {
    let mut cache = small_cache();
    let a = line(0, 1);
    install(&mut cache, a, AccessPermission::NotPresent, 0);

    assert!(cache.lookup(a).unwrap().is_none());
    assert!(!cache.is_tag_present(a).unwrap());
    assert_eq!(cache.find_tag_in_set(0, a), None);
    assert_eq!(cache.find_tag_in_set_ignore_permissions(0, a), Some(0));
}

#[test]
fn lookup_mut_edits_entry_in_place() {
    let mut cache = small_cache();
    let a = line(0, 1);
    cache.allocate(a, entry(), 0).unwrap();
    cache
        .lookup_mut(a)
        .unwrap()
        .unwrap()
        .set_permission(AccessPermission::Busy);
    assert_eq!(
        cache.lookup(a).unwrap().unwrap().permission(),
        AccessPermission::Busy
    );
}

// ══════════════════════════════════════════════════════════
// 4. Slot inspection
// ══════════════════════════════════════════════════════════

#[test]
fn address_at_index_skips_invalid_and_empty_slots() {
    let mut cache = small_cache();
    let a = line(0, 1);
    let b = line(1, 2);
    install(&mut cache, a, AccessPermission::ReadOnly, 0);
    cache.allocate(b, entry(), 0).unwrap();

    assert_eq!(cache.address_at_index(0), Ok(a));
    assert_eq!(cache.address_at_index(1), Ok(0));
    // b is still Invalid after allocation.
    assert_eq!(cache.address_at_index(2), Ok(0));
    assert_eq!(
        cache.address_at_index(4),
        Err(CacheError::SlotOutOfRange { set: 2, way: 0 })
    );
}

#[test]
fn block_state_predicates() {
    let mut cache = small_cache();
    cache.allocate(line(0, 1), entry(), 0).unwrap();
    install(&mut cache, line(0, 2), AccessPermission::Busy, 0);

    assert_eq!(cache.is_block_invalid(0, 0), Ok(true));
    assert_eq!(cache.is_block_not_busy(0, 0), Ok(true));
    assert_eq!(cache.is_block_invalid(0, 1), Ok(false));
    assert_eq!(cache.is_block_not_busy(0, 1), Ok(false));
    assert_eq!(
        cache.is_block_invalid(1, 0),
        Err(CacheError::EmptySlot { set: 1, way: 0 })
    );
    assert_eq!(
        cache.is_block_not_busy(0, 2),
        Err(CacheError::SlotOutOfRange { set: 0, way: 2 })
    );
}

#[test]
fn replacement_weight_reports_valid_blocks() {
    let mut cache = small_cache();
    cache
        .allocate(line(1, 1), entry().with_valid_blocks(5), 0)
        .unwrap();
    assert_eq!(cache.replacement_weight(1, 0), Ok(5));
    assert_eq!(cache.replacement_weight(1, 1), Ok(0));
    cache.lookup_mut(line(1, 1)).unwrap().unwrap().set_valid_blocks(2);
    assert_eq!(cache.replacement_weight(1, 0), Ok(2));
}

#[test]
fn display_dumps_occupied_slots() {
    let mut cache = small_cache();
    install(&mut cache, line(1, 1), AccessPermission::ReadWrite, 9);
    let dump = cache.to_string();
    assert!(dump.starts_with("Cache dump: 2 sets x 2 ways, 64-byte lines"));
    assert!(dump.contains("set    1 way  0: [0xc0, Read_Write, last access 9]"));
    assert_eq!(dump.lines().count(), 2);
}
