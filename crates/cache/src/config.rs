//! Configuration of a cache memory instance.
//!
//! This module defines the parameters a cache is built from. It provides:
//! 1. **Defaults:** Baseline geometry and timing constants.
//! 2. **Structure:** [`CacheMemoryConfig`], deserializable from JSON with per-field defaults.
//! 3. **Enums:** The built-in replacement policy selector.
//!
//! Parameters are consumed once, at construction; changing a config afterwards
//! has no effect on an existing cache.

use serde::Deserialize;

/// Default configuration constants for a cache memory.
mod defaults {
    /// Default capacity in bytes (32 * 1024).
    pub const SIZE_BYTES: usize = 32 * 1024;

    /// Default associativity (4 ways).
    pub const ASSOC: usize = 4;

    /// Default line size; 0 defers to the system-wide block size.
    pub const BLOCK_SIZE: usize = 0;

    /// Default number of tag array banks.
    pub const TAG_ARRAY_BANKS: usize = 1;

    /// Default tag array access latency in cycles.
    pub const TAG_ACCESS_LATENCY: u64 = 1;

    /// Default number of data array banks.
    pub const DATA_ARRAY_BANKS: usize = 1;

    /// Default data array access latency in cycles.
    pub const DATA_ACCESS_LATENCY: u64 = 1;

    /// Default number of atomic ALU ports.
    pub const ATOMIC_ALUS: usize = 64;

    /// Default atomic ALU latency in cycles.
    pub const ATOMIC_LATENCY: u64 = 0;

    /// Default first address bit of the set index (64-byte lines).
    pub const START_INDEX_BIT: u32 = 6;
}

/// System-wide block size used when a cache is configured with `block_size = 0`.
pub const DEFAULT_SYSTEM_BLOCK_SIZE: usize = 64;

/// Built-in cache replacement policies.
///
/// Selects the algorithm used to choose a victim way when a set is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicyKind {
    /// Least Recently Used.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// Bit pseudo-LRU (one MRU bit per way).
    #[serde(alias = "Plru")]
    Plru,
    /// First In First Out.
    #[serde(alias = "Fifo")]
    Fifo,
    /// Pseudo-random selection.
    #[serde(alias = "Random")]
    Random,
    /// Most Recently Used.
    #[serde(alias = "Mru")]
    Mru,
    /// Occupancy-weighted LRU; the only built-in supporting weighted touches.
    #[serde(rename = "WEIGHTEDLRU", alias = "WeightedLru", alias = "WeightedLRU")]
    WeightedLru,
}

/// Parameters of a single cache memory.
///
/// # Examples
///
/// ```
/// use cohsim_cache::config::{CacheMemoryConfig, ReplacementPolicyKind};
///
/// let json = r#"{ "size_bytes": 256, "assoc": 2, "block_size": 64, "replacement_policy": "FIFO" }"#;
/// let config: CacheMemoryConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.assoc, 2);
/// assert_eq!(config.replacement_policy, ReplacementPolicyKind::Fifo);
/// assert!(!config.resource_stalls);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CacheMemoryConfig {
    /// Total capacity in bytes.
    #[serde(default = "CacheMemoryConfig::default_size")]
    pub size_bytes: usize,

    /// Number of ways per set.
    #[serde(default = "CacheMemoryConfig::default_assoc")]
    pub assoc: usize,

    /// Line size in bytes; 0 uses the system block size given at construction.
    #[serde(default = "CacheMemoryConfig::default_block_size")]
    pub block_size: usize,

    /// Number of tag array banks.
    #[serde(default = "CacheMemoryConfig::default_tag_banks")]
    pub tag_array_banks: usize,

    /// Tag array access latency in cycles; 0 disables the tag bank model.
    #[serde(default = "CacheMemoryConfig::default_tag_latency")]
    pub tag_access_latency: u64,

    /// Number of data array banks.
    #[serde(default = "CacheMemoryConfig::default_data_banks")]
    pub data_array_banks: usize,

    /// Data array access latency in cycles; 0 disables the data bank model.
    #[serde(default = "CacheMemoryConfig::default_data_latency")]
    pub data_access_latency: u64,

    /// Number of atomic ALU ports.
    #[serde(default = "CacheMemoryConfig::default_atomic_alus")]
    pub atomic_alus: usize,

    /// Atomic ALU occupancy in cycles.
    #[serde(default = "CacheMemoryConfig::default_atomic_latency")]
    pub atomic_latency: u64,

    /// First address bit of the set index field.
    #[serde(default = "CacheMemoryConfig::default_start_index_bit")]
    pub start_index_bit: u32,

    /// Marks an instruction-only cache; affects warm-up record kinds.
    #[serde(default)]
    pub is_icache: bool,

    /// Enables bank/port contention modeling.
    #[serde(default)]
    pub resource_stalls: bool,

    /// Replacement policy used when no custom policy is injected.
    #[serde(default)]
    pub replacement_policy: ReplacementPolicyKind,
}

impl CacheMemoryConfig {
    /// Returns the default capacity.
    fn default_size() -> usize {
        defaults::SIZE_BYTES
    }

    /// Returns the default associativity.
    fn default_assoc() -> usize {
        defaults::ASSOC
    }

    /// Returns the default line size.
    fn default_block_size() -> usize {
        defaults::BLOCK_SIZE
    }

    /// Returns the default tag bank count.
    fn default_tag_banks() -> usize {
        defaults::TAG_ARRAY_BANKS
    }

    fn default_tag_latency() -> u64 {
        defaults::TAG_ACCESS_LATENCY
    }

    fn default_data_banks() -> usize {
        defaults::DATA_ARRAY_BANKS
    }

    fn default_data_latency() -> u64 {
        defaults::DATA_ACCESS_LATENCY
    }

    fn default_atomic_alus() -> usize {
        defaults::ATOMIC_ALUS
    }

    fn default_atomic_latency() -> u64 {
        defaults::ATOMIC_LATENCY
    }

    fn default_start_index_bit() -> u32 {
        defaults::START_INDEX_BIT
    }
}

impl Default for CacheMemoryConfig {
    fn default() -> Self {
        Self {
            size_bytes: defaults::SIZE_BYTES,
            assoc: defaults::ASSOC,
            block_size: defaults::BLOCK_SIZE,
            tag_array_banks: defaults::TAG_ARRAY_BANKS,
            tag_access_latency: defaults::TAG_ACCESS_LATENCY,
            data_array_banks: defaults::DATA_ARRAY_BANKS,
            data_access_latency: defaults::DATA_ACCESS_LATENCY,
            atomic_alus: defaults::ATOMIC_ALUS,
            atomic_latency: defaults::ATOMIC_LATENCY,
            start_index_bit: defaults::START_INDEX_BIT,
            is_icache: false,
            resource_stalls: false,
            replacement_policy: ReplacementPolicyKind::default(),
        }
    }
}
