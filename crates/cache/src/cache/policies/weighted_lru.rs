//! Occupancy-weighted LRU Replacement Policy.
//!
//! Each weighted touch records the occupancy of the line (for example, the
//! number of valid sub-blocks). The victim is the candidate with the lowest
//! occupancy, ties broken by the oldest touch. Plain touches only refresh
//! recency.

use super::{ReplacementData, ReplacementPolicy, Stamp, VictimCandidate};

/// Weighted LRU Policy state.
#[derive(Debug, Default)]
pub struct WeightedLruPolicy {
    stamp: Stamp,
}

impl WeightedLruPolicy {
    /// Creates a new weighted LRU policy instance.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReplacementPolicy for WeightedLruPolicy {
    fn reset(&mut self, data: &mut ReplacementData) {
        data.valid = true;
        data.last_touch = self.stamp.next();
        data.occupancy = 0;
    }

    fn touch(&mut self, data: &mut ReplacementData) {
        data.valid = true;
        data.last_touch = self.stamp.next();
    }

    fn touch_weighted(&mut self, data: &mut ReplacementData, occupancy: u32) {
        data.valid = true;
        data.last_touch = self.stamp.next();
        data.occupancy = occupancy;
    }

    fn invalidate(&mut self, data: &mut ReplacementData) {
        data.valid = false;
        data.last_touch = 0;
        data.occupancy = 0;
    }

    fn victim(&mut self, candidates: &[VictimCandidate<'_>]) -> usize {
        candidates
            .iter()
            .min_by_key(|c| {
                if c.data.valid {
                    (c.data.occupancy, c.data.last_touch)
                } else {
                    (0, 0)
                }
            })
            .map_or(0, |c| c.way)
    }

    fn uses_occupancy(&self) -> bool {
        true
    }
}
