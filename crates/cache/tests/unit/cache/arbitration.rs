//! Resource Arbitration Tests.
//!
//! Exercises the check-then-record discipline against banked tag/data
//! arrays and the atomic ALU pool.

use cohsim_cache::config::CacheMemoryConfig;
use cohsim_cache::observer::CacheEvent;
use cohsim_cache::resources::{CacheRequestType, CacheResourceType};
use cohsim_cache::{CacheError, CacheMemory};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use crate::common::harness::{build, line, small_cache, small_config};
use crate::common::mocks::EventLog;

/// One tag bank busy for 2 cycles, two data banks busy for 3 cycles, and a
/// single ALU busy for 2 cycles.
fn contended_cache() -> CacheMemory {
    build(&CacheMemoryConfig {
        resource_stalls: true,
        tag_array_banks: 1,
        tag_access_latency: 2,
        data_array_banks: 2,
        data_access_latency: 3,
        atomic_alus: 1,
        atomic_latency: 2,
        ..small_config()
    })
}

// ══════════════════════════════════════════════════════════
// 1. Contention modeling disabled
// ══════════════════════════════════════════════════════════

#[test]
fn disabled_model_always_admits_and_still_counts() {
    let mut cache = small_cache();
    for _ in 0..3 {
        assert_eq!(
            cache.check_resource_available(CacheResourceType::TagArray, line(0, 1), 0),
            Ok(true)
        );
        cache
            .record_request_type(CacheRequestType::TagArrayRead, line(1, 1), 0)
            .unwrap();
    }
    cache
        .record_request_type(CacheRequestType::DataArrayWrite, line(0, 1), 0)
        .unwrap();
    cache
        .record_request_type(CacheRequestType::AtomicAluOperation, line(0, 1), 0)
        .unwrap();

    let stats = cache.stats();
    assert_eq!(stats.tag_array_reads, 3);
    assert_eq!(stats.data_array_writes, 1);
    assert_eq!(stats.atomic_alu_accesses, 1);
    assert_eq!(stats.tag_array_stalls, 0);
}

// ══════════════════════════════════════════════════════════
// 2. Banked arrays
// ══════════════════════════════════════════════════════════

#[test]
fn tag_bank_stays_busy_for_its_latency() {
    let mut cache = contended_cache();
    let (a, other) = (line(0, 1), line(1, 1));
    cache
        .record_request_type(CacheRequestType::TagArrayRead, a, 10)
        .unwrap();

    let tag = CacheResourceType::TagArray;
    assert_eq!(cache.check_resource_available(tag, other, 10), Ok(false));
    assert_eq!(cache.check_resource_available(tag, other, 11), Ok(false));
    assert_eq!(cache.check_resource_available(tag, other, 12), Ok(true));
    assert_eq!(cache.stats().tag_array_stalls, 2);
}

#[test]
fn same_set_can_share_a_bank_in_the_reserving_cycle() {
    let mut cache = contended_cache();
    let a = line(0, 1);
    cache
        .record_request_type(CacheRequestType::TagArrayRead, a, 5)
        .unwrap();
    assert_eq!(
        cache.check_resource_available(CacheResourceType::TagArray, line(0, 2), 5),
        Ok(true)
    );
    cache
        .record_request_type(CacheRequestType::TagArrayWrite, line(0, 2), 5)
        .unwrap();
    assert_eq!(
        cache.check_resource_available(CacheResourceType::TagArray, a, 6),
        Ok(false)
    );
}

#[test]
fn data_sets_interleave_across_banks() {
    let mut cache = contended_cache();
    cache
        .record_request_type(CacheRequestType::DataArrayRead, line(0, 1), 0)
        .unwrap();
    let data = CacheResourceType::DataArray;
    assert_eq!(cache.check_resource_available(data, line(1, 1), 1), Ok(true));
    assert_eq!(cache.check_resource_available(data, line(0, 2), 2), Ok(false));
    assert_eq!(cache.check_resource_available(data, line(0, 2), 3), Ok(true));
    assert_eq!(cache.stats().data_array_stalls, 1);
}

#[test]
fn recording_on_a_busy_bank_is_a_contract_violation() {
    let mut cache = contended_cache();
    cache
        .record_request_type(CacheRequestType::TagArrayRead, line(0, 1), 0)
        .unwrap();
    assert_eq!(
        cache.record_request_type(CacheRequestType::TagArrayRead, line(1, 1), 1),
        Err(CacheError::BankConflict {
            array: "tag array",
            bank: 0,
            set: 1,
            busy_set: 0,
            until: 1,
        })
    );
    assert_eq!(cache.stats().tag_array_reads, 1);
}

#[test]
fn bank_checks_require_aligned_addresses() {
    let mut cache = contended_cache();
    assert_eq!(
        cache.check_resource_available(CacheResourceType::TagArray, 0x41, 0),
        Err(CacheError::Unaligned {
            addr: 0x41,
            block_size: 64
        })
    );
}

// ══════════════════════════════════════════════════════════
// 3. Atomic ALUs
// ══════════════════════════════════════════════════════════

#[test]
fn alu_pool_blocks_busy_line_and_limits_ports_per_cycle() {
    let mut cache = contended_cache();
    let (x, y) = (line(0, 1), line(1, 1));
    let alu = CacheResourceType::AtomicAluArray;
    cache
        .record_request_type(CacheRequestType::AtomicAluOperation, x, 0)
        .unwrap();

    assert_eq!(cache.check_resource_available(alu, y, 0), Ok(false));
    assert_eq!(cache.check_resource_available(alu, x, 1), Ok(false));
    assert_eq!(cache.check_resource_available(alu, y, 1), Ok(true));
    assert_eq!(cache.check_resource_available(alu, x, 2), Ok(true));
    assert_eq!(cache.stats().atomic_alu_stalls, 2);
    assert_eq!(
        cache.record_request_type(CacheRequestType::AtomicAluOperation, y, 0),
        Err(CacheError::AluConflict { line: y, now: 0 })
    );
}

#[test]
fn alu_pool_keys_on_the_whole_line() {
    let mut cache = build(&CacheMemoryConfig {
        resource_stalls: true,
        atomic_alus: 4,
        atomic_latency: 4,
        ..small_config()
    });
    let (x, y) = (line(0, 1), line(1, 1));
    let alu = CacheResourceType::AtomicAluArray;
    cache
        .record_request_type(CacheRequestType::AtomicAluOperation, x, 0)
        .unwrap();

    assert_eq!(cache.check_resource_available(alu, x + 8, 1), Ok(false));
    assert_eq!(cache.check_resource_available(alu, x + 0x3f, 3), Ok(false));
    assert_eq!(cache.check_resource_available(alu, y + 8, 1), Ok(true));
    assert_eq!(cache.check_resource_available(alu, x + 8, 4), Ok(true));
    assert_eq!(
        cache.record_request_type(CacheRequestType::AtomicAluOperation, x + 0x10, 2),
        Err(CacheError::AluConflict { line: x, now: 2 })
    );
    assert_eq!(cache.stats().atomic_alu_stalls, 2);
}

#[test]
fn stalls_notify_observers() {
    let mut cache = contended_cache();
    let log = EventLog::default();
    cache.add_observer(Box::new(log.clone()));
    cache
        .record_request_type(CacheRequestType::TagArrayRead, line(0, 1), 0)
        .unwrap();
    cache
        .check_resource_available(CacheResourceType::TagArray, line(1, 1), 0)
        .unwrap();
    assert_eq!(
        log.snapshot(),
        vec![CacheEvent::ResourceStall {
            resource: CacheResourceType::TagArray,
            addr: line(1, 1),
            now: 0,
        }]
    );
}

// ══════════════════════════════════════════════════════════
// 4. Names
// ══════════════════════════════════════════════════════════

#[rstest]
#[case("TagArray", CacheResourceType::TagArray)]
#[case("DataArray", CacheResourceType::DataArray)]
#[case("AtomicALUArray", CacheResourceType::AtomicAluArray)]
fn resource_names_parse(#[case] name: &str, #[case] want: CacheResourceType) {
    assert_eq!(name.parse::<CacheResourceType>(), Ok(want));
    assert_eq!(want.to_string(), name);
}

#[test]
fn unknown_names_are_rejected() {
    assert_eq!(
        "L3Array".parse::<CacheResourceType>(),
        Err(CacheError::UnknownResource("L3Array".to_owned()))
    );
    assert_eq!(
        "TagArrayFlush".parse::<CacheRequestType>(),
        Err(CacheError::UnknownRequest("TagArrayFlush".to_owned()))
    );
    assert_eq!(
        "AtomicALUOperation".parse::<CacheRequestType>(),
        Ok(CacheRequestType::AtomicAluOperation)
    );
}

// ══════════════════════════════════════════════════════════
// 5. Checks never reserve
// ══════════════════════════════════════════════════════════

fn resource_strategy() -> impl Strategy<Value = CacheResourceType> {
    prop_oneof![
        Just(CacheResourceType::TagArray),
        Just(CacheResourceType::DataArray),
        Just(CacheResourceType::AtomicAluArray),
    ]
}

fn availability(cache: &mut CacheMemory, now: u64) -> Vec<bool> {
    let mut seen = Vec::new();
    for resource in [
        CacheResourceType::TagArray,
        CacheResourceType::DataArray,
        CacheResourceType::AtomicAluArray,
    ] {
        for set in 0..2 {
            for tag in 0..3 {
                seen.push(
                    cache
                        .check_resource_available(resource, line(set, tag), now)
                        .unwrap(),
                );
            }
        }
    }
    seen
}

proptest! {
    #[test]
    fn checks_leave_reservations_unchanged(
        checks in prop::collection::vec((resource_strategy(), 0u64..2, 0u64..4, 0u64..6), 0..32),
        probe_at in 0u64..6,
    ) {
        let mut cache = contended_cache();
        cache.record_request_type(CacheRequestType::TagArrayRead, line(0, 1), 1).unwrap();
        cache.record_request_type(CacheRequestType::DataArrayRead, line(1, 1), 2).unwrap();
        cache.record_request_type(CacheRequestType::AtomicAluOperation, line(0, 2), 2).unwrap();

        let before = availability(&mut cache, probe_at);
        for (resource, set, tag, now) in checks {
            cache.check_resource_available(resource, line(set, tag), now).unwrap();
        }
        let after = availability(&mut cache, probe_at);
        prop_assert_eq!(before, after);
    }
}
