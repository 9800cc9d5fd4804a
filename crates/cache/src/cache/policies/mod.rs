//! Cache Replacement Policies.
//!
//! A policy ages lines and selects victims through per-slot
//! [`ReplacementData`]. The cache instantiates exactly one record per
//! `(set, way)` slot when it is built and keeps it for its whole lifetime, so
//! a policy's history survives every eviction of the entry occupying the slot.
//!
//! # Policies
//!
//! - `Fifo`: First-In, First-Out.
//! - `Lru`: Least Recently Used.
//! - `Mru`: Most Recently Used.
//! - `Plru`: Pseudo-LRU (one MRU bit per way).
//! - `Random`: Random selection.
//! - `WeightedLru`: Occupancy-weighted LRU.

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Recently Used replacement policy.
pub mod lru;

/// Most Recently Used replacement policy.
pub mod mru;

/// Pseudo-LRU (MRU bit) replacement policy.
pub mod plru;

/// Random replacement policy.
pub mod random;

/// Occupancy-weighted LRU replacement policy.
pub mod weighted_lru;

use std::fmt;

pub use fifo::FifoPolicy;
pub use lru::LruPolicy;
pub use mru::MruPolicy;
pub use plru::PlruPolicy;
pub use random::RandomPolicy;
pub use weighted_lru::WeightedLruPolicy;

use crate::config::ReplacementPolicyKind;

/// Replacement state of one `(set, way)` slot.
///
/// The position is fixed at instantiation. The remaining fields belong to the
/// policy, which is free to ignore the ones it does not need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementData {
    set: usize,
    way: usize,
    /// Cleared by `invalidate`; set by `reset`, and by `touch` in the recency policies.
    pub valid: bool,
    /// Recency stamp of the last touch (0 = never, or invalidated).
    pub last_touch: u64,
    /// Stamp of the last `reset`, i.e. when the current entry was installed.
    pub inserted: u64,
    /// Occupancy weight recorded by the last weighted touch.
    pub occupancy: u32,
}

impl ReplacementData {
    /// Creates the record for slot `(set, way)`.
    pub const fn new(set: usize, way: usize) -> Self {
        Self {
            set,
            way,
            valid: false,
            last_touch: 0,
            inserted: 0,
            occupancy: 0,
        }
    }

    /// Set index of the slot.
    #[inline]
    pub const fn set(&self) -> usize {
        self.set
    }

    /// Way index of the slot.
    #[inline]
    pub const fn way(&self) -> usize {
        self.way
    }
}

/// One slot of a full set, offered to a policy for eviction.
#[derive(Debug, Clone, Copy)]
pub struct VictimCandidate<'a> {
    /// Way index of the slot.
    pub way: usize,
    /// Whether the slot currently holds an entry.
    pub occupied: bool,
    /// Replacement state of the slot.
    pub data: &'a ReplacementData,
}

/// Trait for cache replacement policies.
///
/// Defines the interface for aging per-slot state and selecting victim ways.
/// Tie-breaking between equally old candidates is up to the implementation.
pub trait ReplacementPolicy: fmt::Debug + Send + Sync {
    /// Creates the record for slot `(set, way)`.
    ///
    /// Called exactly once per slot, when the cache is built.
    fn instantiate(&mut self, set: usize, way: usize) -> ReplacementData {
        ReplacementData::new(set, way)
    }

    /// Initialises a slot's state when a new entry is installed in it.
    fn reset(&mut self, data: &mut ReplacementData);

    /// Updates a slot's state on access.
    fn touch(&mut self, data: &mut ReplacementData);

    /// Updates a slot's state on access, with an occupancy weight.
    ///
    /// Only called by the cache when [`uses_occupancy`](Self::uses_occupancy)
    /// returned `true` at construction. The default ignores the weight.
    fn touch_weighted(&mut self, data: &mut ReplacementData, occupancy: u32) {
        let _ = occupancy;
        self.touch(data);
    }

    /// Marks a slot's state invalid when its entry is removed or invalidated.
    fn invalidate(&mut self, data: &mut ReplacementData);

    /// Selects the way to evict among `candidates`.
    ///
    /// `candidates` holds every slot of the set, in way order, and is never
    /// empty.
    ///
    /// # Returns
    ///
    /// The `way` of one of the candidates.
    fn victim(&mut self, candidates: &[VictimCandidate<'_>]) -> usize;

    /// Whether this policy makes use of weighted touches.
    fn uses_occupancy(&self) -> bool {
        false
    }
}

/// Monotonic stamp source shared by the recency-based policies.
///
/// Stamps start at 1 so that 0 can mean "never touched".
#[derive(Debug, Clone, Default)]
pub(crate) struct Stamp(u64);

impl Stamp {
    /// Returns the next stamp.
    pub(crate) fn next(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }
}

/// Returns the first candidate whose state has been invalidated.
pub(crate) fn first_invalid(candidates: &[VictimCandidate<'_>]) -> Option<usize> {
    candidates.iter().find(|c| !c.data.valid).map(|c| c.way)
}

/// Builds a boxed instance of a built-in policy.
pub fn build(kind: ReplacementPolicyKind) -> Box<dyn ReplacementPolicy> {
    match kind {
        ReplacementPolicyKind::Lru => Box::new(LruPolicy::new()),
        ReplacementPolicyKind::Plru => Box::new(PlruPolicy::new()),
        ReplacementPolicyKind::Fifo => Box::new(FifoPolicy::new()),
        ReplacementPolicyKind::Random => Box::new(RandomPolicy::new()),
        ReplacementPolicyKind::Mru => Box::new(MruPolicy::new()),
        ReplacementPolicyKind::WeightedLru => Box::new(WeightedLruPolicy::new()),
    }
}
