//! Random Replacement Policy.
//!
//! This policy evicts a random cache line from the set. It uses a simple
//! xorshift generator with a fixed seed, so runs are reproducible. Invalidated
//! slots are always preferred over a random pick.

use super::{ReplacementData, ReplacementPolicy, VictimCandidate, first_invalid};

/// Seed of the xorshift generator.
const SEED: u64 = 123_456_789;

/// Random Policy state.
#[derive(Debug)]
pub struct RandomPolicy {
    /// Internal state for the pseudo-random number generator.
    state: u64,
}

impl RandomPolicy {
    /// Creates a new Random policy instance.
    pub const fn new() -> Self {
        Self { state: SEED }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplacementPolicy for RandomPolicy {
    fn reset(&mut self, data: &mut ReplacementData) {
        data.valid = true;
    }

    /// Access patterns do not affect the state.
    fn touch(&mut self, _data: &mut ReplacementData) {}

    fn invalidate(&mut self, data: &mut ReplacementData) {
        data.valid = false;
    }

    fn victim(&mut self, candidates: &[VictimCandidate<'_>]) -> usize {
        if let Some(way) = first_invalid(candidates) {
            return way;
        }
        if candidates.is_empty() {
            return 0;
        }
        let pick = (self.next() % candidates.len() as u64) as usize;
        candidates[pick].way
    }
}
