//! Common types shared by every part of the cache model.
//!
//! This module provides:
//! 1. **Addresses:** Raw address and cycle aliases with line/bit-field helpers.
//! 2. **Requests:** Request kinds, lock context ids, and the line payload.
//! 3. **Errors:** The fatal contract violations reported by cache operations.

/// Address and cycle types, line alignment and bit selection.
pub mod addr;

/// Request kinds, context ids, and data blocks.
pub mod data;

/// Error types for contract violations.
pub mod error;

pub use addr::{Addr, Cycle, bit_select, is_line_aligned, make_line_address};
pub use data::{ContextId, DataBlock, RequestType};
pub use error::{CacheError, CacheResult};
