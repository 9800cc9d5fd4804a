//! Contract violations reported by the cache.
//!
//! Every variant of [`CacheError`] is a bug in the calling protocol
//! controller, not a recoverable runtime condition. The simulation driver is
//! expected to stop the run when it receives one. Resource contention is not
//! an error and is reported through `check_resource_available` instead.

use thiserror::Error;

use super::addr::{Addr, Cycle};

/// Fatal contract violations of the cache storage model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The address is not the first byte of a cache line.
    #[error("address {addr:#x} is not aligned to the {block_size}-byte line")]
    Unaligned {
        /// Offending address.
        addr: Addr,
        /// Line size of the cache.
        block_size: usize,
    },

    /// `allocate` was called for an address that is already resident.
    #[error("address {0:#x} is already present")]
    AlreadyPresent(Addr),

    /// `allocate` was called while the target set has no free way.
    #[error("set {set} has no available way for address {addr:#x}")]
    SetFull {
        /// Address being allocated.
        addr: Addr,
        /// Target set.
        set: usize,
    },

    /// `cache_probe` was called although the target set still has room.
    #[error("set {set} still has an available way for address {addr:#x}")]
    SetNotFull {
        /// Address being probed.
        addr: Addr,
        /// Target set.
        set: usize,
    },

    /// The operation requires a resident entry for the address.
    #[error("address {0:#x} is not present")]
    NotPresent(Addr),

    /// `allocate` scanned a set it believed available and found no slot.
    #[error("allocate found no free slot for address {addr:#x} in set {set}")]
    NoFreeSlot {
        /// Address being allocated.
        addr: Addr,
        /// Target set.
        set: usize,
    },

    /// A `(set, way)` coordinate outside the cache geometry.
    #[error("slot (set {set}, way {way}) is outside the cache")]
    SlotOutOfRange {
        /// Requested set.
        set: usize,
        /// Requested way.
        way: usize,
    },

    /// The operation requires an entry in a slot that is empty.
    #[error("slot (set {set}, way {way}) holds no entry")]
    EmptySlot {
        /// Requested set.
        set: usize,
        /// Requested way.
        way: usize,
    },

    /// The replacement policy returned a way that is not a candidate.
    #[error("replacement policy chose way {way} in a {assoc}-way set")]
    InvalidVictim {
        /// Way returned by the policy.
        way: usize,
        /// Associativity of the cache.
        assoc: usize,
    },

    /// A bank was reserved while busy with a different set.
    #[error("{array} bank {bank} is busy with set {busy_set} until cycle {until}; cannot reserve set {set}")]
    BankConflict {
        /// Which banked array ("tag array" or "data array").
        array: &'static str,
        /// Bank index.
        bank: usize,
        /// Set the reservation was attempted for.
        set: usize,
        /// Set currently holding the bank.
        busy_set: usize,
        /// Last cycle of the current reservation.
        until: Cycle,
    },

    /// An atomic ALU was reserved without an available port.
    #[error("no atomic ALU available for line {line:#x} at cycle {now}")]
    AluConflict {
        /// Line address of the operation.
        line: Addr,
        /// Cycle of the attempted reservation.
        now: Cycle,
    },

    /// A resource name that does not denote a cache resource.
    #[error("unrecognized cache resource type `{0}`")]
    UnknownResource(String),

    /// A request name that does not denote a request kind.
    #[error("unrecognized cache request type `{0}`")]
    UnknownRequest(String),

    /// The configured geometry cannot be built.
    #[error("invalid cache geometry: {0}")]
    InvalidGeometry(String),
}

/// Result alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
