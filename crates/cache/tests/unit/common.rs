//! Address Arithmetic and Request Kind Tests.

use cohsim_cache::common::{
    CacheError, ContextId, DataBlock, RequestType, bit_select, is_line_aligned, make_line_address,
};
use proptest::prelude::*;
use rstest::rstest;

// ══════════════════════════════════════════════════════════
// 1. Bit fields and line addresses
// ══════════════════════════════════════════════════════════

#[test]
fn bit_select_extracts_inclusive_range() {
    assert_eq!(bit_select(0b1011_0000, 4, 7), 0b1011);
    assert_eq!(bit_select(0b1011_0000, 5, 6), 0b01);
    assert_eq!(bit_select(0x1c0, 6, 7), 0b11);
    assert_eq!(bit_select(0xdead_beef, 0, 63), 0xdead_beef);
    assert_eq!(bit_select(u64::MAX, 63, 63), 1);
}

#[rstest]
#[case(0x1000, 64, 0x1000)]
#[case(0x103f, 64, 0x1000)]
#[case(0x1040, 64, 0x1040)]
#[case(0x1fff, 128, 0x1f80)]
fn make_line_address_clears_offset(#[case] addr: u64, #[case] block: usize, #[case] want: u64) {
    assert_eq!(make_line_address(addr, block), want);
    assert!(is_line_aligned(want, block));
}

proptest! {
    #[test]
    fn line_address_is_aligned_and_not_above(addr in any::<u64>(), shift in 2u32..12) {
        let block = 1usize << shift;
        let line = make_line_address(addr, block);
        prop_assert!(is_line_aligned(line, block));
        prop_assert!(line <= addr);
        prop_assert!(addr - line < block as u64);
    }
}

// ══════════════════════════════════════════════════════════
// 2. Request kinds
// ══════════════════════════════════════════════════════════

#[rstest]
#[case("LD", RequestType::Load)]
#[case("ifetch", RequestType::InstructionFetch)]
#[case("ST", RequestType::Store)]
#[case("Locked_RMW_Write", RequestType::LockedRmwWrite)]
fn request_type_parses_protocol_names(#[case] name: &str, #[case] want: RequestType) {
    assert_eq!(name.parse::<RequestType>(), Ok(want));
}

#[test]
fn unknown_request_type_is_rejected() {
    assert_eq!(
        "PREFETCH_L3".parse::<RequestType>(),
        Err(CacheError::UnknownRequest("PREFETCH_L3".to_owned()))
    );
}

#[test]
fn only_loads_and_fetches_are_read_only() {
    let read_only: Vec<_> = RequestType::ALL
        .into_iter()
        .filter(|r| r.is_read_only())
        .collect();
    assert_eq!(read_only, vec![RequestType::Load, RequestType::InstructionFetch]);
}

#[test]
fn request_type_serializes_as_protocol_name() {
    assert_eq!(serde_json::to_string(&RequestType::Store).unwrap(), "\"ST\"");
    assert_eq!(RequestType::RmwRead.to_string(), "RMW_Read");
}

// ══════════════════════════════════════════════════════════
// 3. Context ids and data blocks
// ══════════════════════════════════════════════════════════

#[test]
fn context_id_display() {
    assert_eq!(ContextId(7).to_string(), "ctx7");
}

#[test]
fn data_block_write_at_bounds() {
    let mut block = DataBlock::new(8);
    assert!(block.write_at(6, &[1, 2]));
    assert!(!block.write_at(7, &[1, 2]));
    assert_eq!(block.as_bytes(), &[0, 0, 0, 0, 0, 0, 1, 2]);
    assert_eq!(block.len(), 8);
}
