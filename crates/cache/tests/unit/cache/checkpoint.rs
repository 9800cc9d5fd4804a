//! Warm-up Checkpoint Tests.

use std::fs::File;
use std::io::{BufReader, BufWriter};

use cohsim_cache::common::{DataBlock, RequestType};
use cohsim_cache::config::CacheMemoryConfig;
use cohsim_cache::recorder::{CacheRecorder, TraceRecord};
use cohsim_cache::{AccessPermission, CacheMemory};
use pretty_assertions::assert_eq;

use crate::common::harness::{build, install, line, small_cache, small_config};
use crate::common::mocks::VecSink;

fn populated(mut cache: CacheMemory) -> CacheMemory {
    install(&mut cache, line(0, 1), AccessPermission::ReadOnly, 3);
    install(&mut cache, line(0, 2), AccessPermission::ReadWrite, 4);
    install(&mut cache, line(1, 1), AccessPermission::Busy, 5);
    cache
        .allocate(line(1, 2), crate::common::harness::entry(), 6)
        .unwrap();
    cache
}

#[test]
fn only_usable_lines_are_recorded() {
    let cache = populated(small_cache());
    let mut sink = VecSink::default();

    assert_eq!(cache.record_cache_contents(2, &mut sink), 2);
    assert_eq!(
        sink.0,
        vec![
            TraceRecord {
                cntrl_id: 2,
                address: line(0, 1),
                pc: 0,
                request_type: RequestType::Load,
                time: 3,
                data: DataBlock::new(64),
            },
            TraceRecord {
                cntrl_id: 2,
                address: line(0, 2),
                pc: 0,
                request_type: RequestType::Store,
                time: 4,
                data: DataBlock::new(64),
            },
        ]
    );
}

#[test]
fn instruction_cache_replays_read_only_lines_as_fetches() {
    let cache = populated(build(&CacheMemoryConfig {
        is_icache: true,
        ..small_config()
    }));
    let mut recorder = CacheRecorder::new();
    cache.record_cache_contents(0, &mut recorder);

    let kinds: Vec<_> = recorder.records().iter().map(|r| r.request_type).collect();
    assert_eq!(kinds, vec![RequestType::InstructionFetch, RequestType::Store]);
}

#[test]
fn recorded_payload_is_the_line_data() {
    let mut cache = small_cache();
    let a = line(1, 3);
    cache
        .allocate(a, cohsim_cache::CacheEntry::new(DataBlock::from_bytes(vec![7; 64])), 0)
        .unwrap()
        .set_permission(AccessPermission::ReadWrite);
    let mut recorder = CacheRecorder::new();
    cache.record_cache_contents(1, &mut recorder);
    assert_eq!(recorder.records()[0].data.as_bytes(), &[7; 64][..]);
}

#[test]
fn recorder_survives_a_json_file() {
    let cache = populated(small_cache());
    let mut recorder = CacheRecorder::new();
    cache.record_cache_contents(9, &mut recorder);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warmup.json");
    recorder
        .write_json(BufWriter::new(File::create(&path).unwrap()))
        .unwrap();
    let restored = CacheRecorder::read_json(BufReader::new(File::open(&path).unwrap())).unwrap();

    assert_eq!(restored, recorder);
    assert_eq!(restored.len(), 2);
}

#[test]
fn request_kinds_use_protocol_names_in_json() {
    let cache = populated(small_cache());
    let mut recorder = CacheRecorder::new();
    cache.record_cache_contents(0, &mut recorder);
    let json = recorder.to_json().unwrap();
    assert!(json.contains("\"request_type\":\"LD\""));
    assert!(json.contains("\"request_type\":\"ST\""));
}

#[test]
fn empty_cache_records_nothing() {
    let cache = small_cache();
    let mut recorder = CacheRecorder::new();
    assert_eq!(cache.record_cache_contents(0, &mut recorder), 0);
    assert!(recorder.is_empty());
}
