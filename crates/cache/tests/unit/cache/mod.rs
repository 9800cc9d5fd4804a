//! Cache memory tests, one module per group of operations.

/// Set selection, lookup, and slot inspection.
pub mod addressing;





/// Check-then-record resource arbitration.
pub mod arbitration;

/// Warm-up record emission and the JSON recorder.
pub mod checkpoint;
