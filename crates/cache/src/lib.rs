//! Structural cache-storage model for a coherence protocol simulator.
//!
//! This crate implements the tag/entry store a protocol controller allocates
//! lines into, with the following:
//! 1. **Cache:** Set-associative entry store, tag directory, allocation and
//!    eviction lifecycle, access checks, locking, and HTM sweeps.
//! 2. **Policies:** Pluggable replacement policies (LRU, PLRU, FIFO, Random,
//!    MRU, `WeightedLRU`) with per-slot state that outlives evictions.
//! 3. **Resources:** Banked tag/data array and atomic ALU port contention.
//! 4. **Instrumentation:** Statistics, observers, message and latency profiles,
//!    and the warm-up checkpoint recorder.
//!
//! Protocol state machines, coherence message transport and the data path
//! are not modeled; the crate only owns and arbitrates cache storage.

/// Cache memory (entries, directory, lifecycle, access, locking, HTM).
pub mod cache;
/// Common types (addresses, cycles, request kinds, data blocks, errors).
pub mod common;
/// Cache configuration (defaults, policy selector, geometry parameters).
pub mod config;
/// Observers, coherence message counters and latency profiles.
pub mod observer;
/// Warm-up checkpoint records and sinks.
pub mod recorder;
/// Tag/data array banks and atomic ALU ports.
pub mod resources;
/// Cache statistics and histograms.
pub mod stats;

/// Main cache type; construct with `CacheMemory::new` from a [`CacheMemoryConfig`].
pub use crate::cache::CacheMemory;
/// Line entry and access permission.
pub use crate::cache::{AccessPermission, CacheEntry};
/// Fatal contract violations and the result alias.
pub use crate::common::{CacheError, CacheResult};
/// Cache parameters; use `CacheMemoryConfig::default()` or deserialize from JSON.
pub use crate::config::CacheMemoryConfig;
