//! Pseudo-LRU (PLRU) Replacement Policy.
//!
//! Bit-PLRU approximates Least Recently Used with a single MRU bit per way.
//! A touch sets the way's bit; once every bit of a set would be set, the set's
//! bits are cleared except for the way just touched. The victim is the lowest
//! way whose bit is still clear.
//!
//! The bits are kept per set inside the policy, keyed by the position stored
//! in each slot's [`ReplacementData`], so they are shared by all ways of a set.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `touch()`: O(1) amortised, O(W) when the bits roll over
//!   - `victim()`: O(W)
//! - **Space Complexity:** O(S × W) bits where S is sets, W is ways (much less than LRU)
//! - **Best Case:** Similar to LRU for most access patterns
//! - **Worst Case:** Pathological cases can cause premature eviction of useful lines

use super::{ReplacementData, ReplacementPolicy, VictimCandidate, first_invalid};

/// PLRU Policy state.
#[derive(Debug, Default)]
pub struct PlruPolicy {
    /// MRU bits, one vector per set.
    usage: Vec<Vec<bool>>,
}

impl PlruPolicy {
    /// Creates a new PLRU policy instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the MRU bit of a slot.
    pub fn is_marked(&self, set: usize, way: usize) -> bool {
        self.usage
            .get(set)
            .and_then(|bits| bits.get(way))
            .copied()
            .unwrap_or(false)
    }

    fn mark(&mut self, set: usize, way: usize) {
        let Some(bits) = self.usage.get_mut(set) else {
            return;
        };
        let Some(bit) = bits.get_mut(way) else {
            return;
        };
        *bit = true;
        if bits.iter().all(|&b| b) {
            bits.fill(false);
            bits[way] = true;
        }
    }
}

impl ReplacementPolicy for PlruPolicy {
    fn instantiate(&mut self, set: usize, way: usize) -> ReplacementData {
        if self.usage.len() <= set {
            self.usage.resize_with(set + 1, Vec::new);
        }
        let bits = &mut self.usage[set];
        if bits.len() <= way {
            bits.resize(way + 1, false);
        }
        ReplacementData::new(set, way)
    }

    fn reset(&mut self, data: &mut ReplacementData) {
        data.valid = true;
        self.mark(data.set(), data.way());
    }

    fn touch(&mut self, data: &mut ReplacementData) {
        data.valid = true;
        self.mark(data.set(), data.way());
    }

    fn invalidate(&mut self, data: &mut ReplacementData) {
        data.valid = false;
        if let Some(bit) = self
            .usage
            .get_mut(data.set())
            .and_then(|bits| bits.get_mut(data.way()))
        {
            *bit = false;
        }
    }

    /// Returns an invalidated slot if there is one, otherwise the first way
    /// whose MRU bit is clear.
    fn victim(&mut self, candidates: &[VictimCandidate<'_>]) -> usize {
        if let Some(way) = first_invalid(candidates) {
            return way;
        }
        candidates
            .iter()
            .find(|c| !self.is_marked(c.data.set(), c.data.way()))
            .or_else(|| candidates.first())
            .map_or(0, |c| c.way)
    }
}
