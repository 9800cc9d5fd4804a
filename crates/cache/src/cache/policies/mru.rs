//! Most Recently Used (MRU) Replacement Policy.
//!
//! This policy evicts the cache line that was accessed most recently.
//! While counter-intuitive for standard workloads, MRU is optimal for
//! cyclic access patterns (loops) where the dataset is larger than the cache.
//! In such cases, the most recently used item is the least likely to be
//! needed again in the immediate future.

use super::{ReplacementData, ReplacementPolicy, Stamp, VictimCandidate, first_invalid};

/// MRU Policy state.
#[derive(Debug, Default)]
pub struct MruPolicy {
    stamp: Stamp,
}

impl MruPolicy {
    /// Creates a new MRU policy instance.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReplacementPolicy for MruPolicy {
    fn reset(&mut self, data: &mut ReplacementData) {
        data.valid = true;
        data.last_touch = self.stamp.next();
    }

    fn touch(&mut self, data: &mut ReplacementData) {
        data.valid = true;
        data.last_touch = self.stamp.next();
    }

    fn invalidate(&mut self, data: &mut ReplacementData) {
        data.valid = false;
        data.last_touch = 0;
    }

    /// Returns an invalidated slot if there is one, otherwise the most
    /// recently touched candidate.
    fn victim(&mut self, candidates: &[VictimCandidate<'_>]) -> usize {
        if let Some(way) = first_invalid(candidates) {
            return way;
        }
        candidates
            .iter()
            .rev()
            .max_by_key(|c| c.data.last_touch)
            .map_or(0, |c| c.way)
    }
}
