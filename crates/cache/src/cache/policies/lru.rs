//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the cache line that has not been accessed for the longest time.
//! Each touch stamps the slot with a monotonically increasing sequence number;
//! the victim is the candidate with the smallest stamp. Invalidated slots
//! compare as never touched, so they are always chosen first.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `touch()`: O(1)
//!   - `victim()`: O(W) where W is the number of ways (associativity)
//! - **Space Complexity:** O(S × W) stamps where S is the number of sets
//! - **Best Case:** Workloads with good temporal locality
//! - **Worst Case:** Scanning patterns larger than cache capacity (thrashing)

use super::{ReplacementData, ReplacementPolicy, Stamp, VictimCandidate};

/// LRU Policy state.
#[derive(Debug, Default)]
pub struct LruPolicy {
    stamp: Stamp,
}

impl LruPolicy {
    /// Creates a new LRU policy instance.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReplacementPolicy for LruPolicy {
    /// A freshly installed line counts as just used.
    fn reset(&mut self, data: &mut ReplacementData) {
        data.valid = true;
        data.last_touch = self.stamp.next();
    }

    /// Moves the slot to the MRU position.
    fn touch(&mut self, data: &mut ReplacementData) {
        data.valid = true;
        data.last_touch = self.stamp.next();
    }

    fn invalidate(&mut self, data: &mut ReplacementData) {
        data.valid = false;
        data.last_touch = 0;
    }

    /// Returns the least recently touched candidate; the lowest way wins ties.
    fn victim(&mut self, candidates: &[VictimCandidate<'_>]) -> usize {
        candidates
            .iter()
            .min_by_key(|c| if c.data.valid { c.data.last_touch } else { 0 })
            .map_or(0, |c| c.way)
    }
}
