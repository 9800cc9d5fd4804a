//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! This policy evicts the oldest cache line in a set, regardless of how recently
//! it was accessed. Only `reset` (installation) advances a slot's age; touches
//! leave the order unchanged.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `touch()`: O(1)
//!   - `victim()`: O(W)
//! - **Space Complexity:** One insertion stamp per slot
//! - **Best Case:** Streaming accesses where all lines have equal importance
//! - **Worst Case:** Workloads with strong temporal locality (may evict frequently-used lines)

use super::{ReplacementData, ReplacementPolicy, Stamp, VictimCandidate};

/// FIFO Policy state.
#[derive(Debug, Default)]
pub struct FifoPolicy {
    stamp: Stamp,
}

impl FifoPolicy {
    /// Creates a new FIFO policy instance.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReplacementPolicy for FifoPolicy {
    fn reset(&mut self, data: &mut ReplacementData) {
        data.valid = true;
        data.inserted = self.stamp.next();
    }

    /// Accesses do not change the insertion order.
    fn touch(&mut self, _data: &mut ReplacementData) {}

    fn invalidate(&mut self, data: &mut ReplacementData) {
        data.valid = false;
        data.inserted = 0;
    }

    /// Returns the candidate installed first.
    fn victim(&mut self, candidates: &[VictimCandidate<'_>]) -> usize {
        candidates
            .iter()
            .min_by_key(|c| if c.data.valid { c.data.inserted } else { 0 })
            .map_or(0, |c| c.way)
    }
}
