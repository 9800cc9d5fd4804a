//! Line addresses and bit-field helpers.
//!
//! Addresses handed to the cache are raw physical byte addresses. Most
//! operations require them to be aligned to the cache line; the helpers here
//! perform that alignment and the bit-field extraction used for set and bank
//! selection.

/// A physical byte address.
pub type Addr = u64;

/// A simulated clock value, in cycles.
///
/// The cache never reads a global clock; every timestamped operation takes the
/// current cycle as an explicit argument.
pub type Cycle = u64;

/// Extracts the inclusive bit-field `[from, to]` of `addr`, right-aligned.
///
/// # Arguments
///
/// * `addr` - The address to slice.
/// * `from` - Lowest bit of the field.
/// * `to` - Highest bit of the field (inclusive). Must be `>= from`.
///
/// # Returns
///
/// The field value shifted down to bit 0.
#[inline]
pub const fn bit_select(addr: Addr, from: u32, to: u32) -> u64 {
    let width = to - from + 1;
    let shifted = addr >> from;
    if width >= u64::BITS {
        shifted
    } else {
        shifted & ((1u64 << width) - 1)
    }
}

/// Clears the offset bits of `addr` for a line of `block_size` bytes.
///
/// `block_size` must be a power of two.
#[inline]
pub const fn make_line_address(addr: Addr, block_size: usize) -> Addr {
    addr & !(block_size as u64 - 1)
}

/// Returns `true` if `addr` is the first byte of a `block_size`-byte line.
#[inline]
pub const fn is_line_aligned(addr: Addr, block_size: usize) -> bool {
    addr & (block_size as u64 - 1) == 0
}
