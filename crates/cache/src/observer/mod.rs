//! Instrumentation kept outside the cache's core state.
//!
//! This module provides:
//! 1. **Events:** [`CacheEvent`], emitted by a cache memory to every attached
//!    [`CacheObserver`] after a structural change.
//! 2. **Message counters:** [`MessageProfile`], per-route coherence message
//!    counts recorded by the protocol controller.
//! 3. **Latency tracking:** [`LatencyProfile`], start/finish duration tracking
//!    for miss and hit transactions.
//!
//! None of these feed back into cache behavior.

/// Start/finish transaction duration tracking.
pub mod latency;

/// Per-route coherence message counters.
pub mod messages;

use std::fmt;

pub use latency::{LatencyProfile, TransactionKind};
pub use messages::{MessageProfile, MessageRoute};

use crate::common::{Addr, Cycle};
use crate::resources::CacheResourceType;

/// Structural change reported by a cache memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEvent {
    /// A line was installed.
    Allocated {
        /// Line address.
        addr: Addr,
        /// Set index.
        set: usize,
        /// Way index.
        way: usize,
        /// Cycle of the allocation.
        now: Cycle,
    },
    /// A line was removed.
    Deallocated {
        /// Line address.
        addr: Addr,
        /// Set index.
        set: usize,
        /// Way index.
        way: usize,
    },
    /// An allocation displaced a stale entry left in a logically absent slot.
    StaleOverwritten {
        /// Address of the displaced entry.
        stale: Addr,
        /// Address installed in its place.
        addr: Addr,
        /// Set index.
        set: usize,
        /// Way index.
        way: usize,
    },
    /// An availability check was refused.
    ResourceStall {
        /// Contended resource.
        resource: CacheResourceType,
        /// Line address of the request.
        addr: Addr,
        /// Cycle of the check.
        now: Cycle,
    },
    /// A hardware transaction aborted.
    HtmAborted {
        /// Lines in the read set.
        read_set: u64,
        /// Lines in the write set, all now invalidated.
        write_set: u64,
    },
    /// A hardware transaction committed.
    HtmCommitted {
        /// Lines in the read set.
        read_set: u64,
        /// Lines in the write set.
        write_set: u64,
    },
}

/// Receives the events of a cache memory.
pub trait CacheObserver: fmt::Debug + Send {
    /// Called once per event, after the cache state has been updated.
    fn on_event(&mut self, event: &CacheEvent);
}
