//! Set-Associative Cache Memory.
//!
//! This module implements the tag/entry store a coherence protocol controller
//! allocates lines into. It provides:
//! 1. **Addressing:** Set selection from a contiguous address bit-field and
//!    permission-aware tag lookup through a [`TagDirectory`].
//! 2. **Lifecycle:** `cache_avail`, `allocate`, `deallocate` and `cache_probe`,
//!    with victim choice delegated to a pluggable [`ReplacementPolicy`].
//! 3. **Access:** Permission-gated hit checks and explicit MRU aging.
//! 4. **Arbitration:** Tag/data bank and atomic ALU port contention.
//! 5. **Locking and HTM:** Per-line lock ownership and transactional sweeps.
//!
//! Entries and their replacement state live in two same-shaped flat arrays
//! indexed by `set * assoc + way`. The replacement array is built once and
//! outlives every entry that passes through its slots.

/// Address to slot index.
pub mod directory;

/// Cache entries and access permissions.
pub mod entry;

/// Replacement policy interface and built-in policies.
pub mod policies;

mod access;
mod arbitration;
mod checkpoint;
mod htm;
mod lifecycle;
mod locking;

use std::fmt;

use tracing::debug;

pub use self::directory::{SlotPos, TagDirectory};
pub use self::entry::{AccessPermission, CacheEntry};
use self::policies::{ReplacementData, ReplacementPolicy};
use crate::common::{Addr, CacheError, CacheResult, Cycle, bit_select, is_line_aligned};
use crate::config::CacheMemoryConfig;
use crate::observer::{CacheEvent, CacheObserver};
use crate::resources::ResourceState;
use crate::stats::CacheMemoryStats;

/// Set-associative cache memory of one protocol controller.
///
/// Owns every resident [`CacheEntry`] from `allocate` until `deallocate`.
/// All operations are synchronous; the current simulated cycle is passed in
/// by the caller wherever an operation timestamps or arbitrates.
#[derive(Debug)]
pub struct CacheMemory {
    cache_size: usize,
    assoc: usize,
    num_sets: usize,
    num_set_bits: u32,
    block_size: usize,
    start_index_bit: u32,
    is_icache: bool,
    slots: Vec<Option<CacheEntry>>,
    replacement_data: Vec<ReplacementData>,
    policy: Box<dyn ReplacementPolicy>,
    use_occupancy: bool,
    directory: TagDirectory,
    resources: ResourceState,
    stats: CacheMemoryStats,
    observers: Vec<Box<dyn CacheObserver>>,
    warned_stale: bool,
    stale: Vec<CacheEntry>,
}

impl CacheMemory {
    /// Creates a cache memory using the configured built-in replacement policy.
    ///
    /// # Arguments
    ///
    /// * `config` - Geometry, timing and policy selection.
    /// * `system_block_size` - Line size used when `config.block_size` is 0.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidGeometry`] if the geometry cannot be built.
    pub fn new(config: &CacheMemoryConfig, system_block_size: usize) -> CacheResult<Self> {
        Self::with_policy(
            config,
            system_block_size,
            policies::build(config.replacement_policy),
        )
    }

    /// Creates a cache memory with an injected replacement policy.
    ///
    /// `config.replacement_policy` is ignored. Whether weighted touches are
    /// forwarded is decided here, once, from [`ReplacementPolicy::uses_occupancy`].
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidGeometry`] if the block size is not a
    /// power of two, the associativity or a bank count is zero, the
    /// resulting number of sets is not a power of two greater than one, or
    /// the set index field extends past bit 63.
    pub fn with_policy(
        config: &CacheMemoryConfig,
        system_block_size: usize,
        mut policy: Box<dyn ReplacementPolicy>,
    ) -> CacheResult<Self> {
        let block_size = if config.block_size == 0 {
            system_block_size
        } else {
            config.block_size
        };
        if !block_size.is_power_of_two() {
            return Err(CacheError::InvalidGeometry(format!(
                "block size {block_size} is not a power of two"
            )));
        }
        if config.assoc == 0 {
            return Err(CacheError::InvalidGeometry("associativity is 0".to_owned()));
        }
        if config.tag_array_banks == 0 || config.data_array_banks == 0 {
            return Err(CacheError::InvalidGeometry(
                "bank count must be at least 1".to_owned(),
            ));
        }
        let num_blocks = config.size_bytes / block_size;
        let num_sets = num_blocks / config.assoc;
        if num_sets <= 1 || !num_sets.is_power_of_two() {
            return Err(CacheError::InvalidGeometry(format!(
                "{} bytes / {block_size}-byte lines / {} ways gives {num_sets} sets; \
                 need a power of two greater than 1",
                config.size_bytes, config.assoc
            )));
        }
        let num_set_bits = num_sets.trailing_zeros();
        if config
            .start_index_bit
            .checked_add(num_set_bits)
            .is_none_or(|end| end > u64::BITS)
        {
            return Err(CacheError::InvalidGeometry(format!(
                "{num_set_bits} set index bits starting at bit {} do not fit in a 64-bit address",
                config.start_index_bit
            )));
        }

        let mut replacement_data = Vec::with_capacity(num_sets * config.assoc);
        for set in 0..num_sets {
            for way in 0..config.assoc {
                replacement_data.push(policy.instantiate(set, way));
            }
        }
        let use_occupancy = policy.uses_occupancy();

        debug!(
            size = config.size_bytes,
            assoc = config.assoc,
            num_sets,
            block_size,
            ?policy,
            "cache memory built"
        );

        Ok(Self {
            cache_size: config.size_bytes,
            assoc: config.assoc,
            num_sets,
            num_set_bits,
            block_size,
            start_index_bit: config.start_index_bit,
            is_icache: config.is_icache,
            slots: vec![None; num_sets * config.assoc],
            replacement_data,
            policy,
            use_occupancy,
            directory: TagDirectory::with_capacity(num_sets * config.assoc),
            resources: ResourceState::new(config),
            stats: CacheMemoryStats::default(),
            observers: Vec::new(),
            warned_stale: false,
            stale: Vec::new(),
        })
    }

    /// Total capacity in bytes.
    #[inline]
    pub const fn cache_size(&self) -> usize {
        self.cache_size
    }

    /// Number of ways per set.
    #[inline]
    pub const fn assoc(&self) -> usize {
        self.assoc
    }

    /// Number of sets.
    #[inline]
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Number of line slots (`num_sets * assoc`).
    #[inline]
    pub const fn num_blocks(&self) -> usize {
        self.num_sets * self.assoc
    }

    /// Line size in bytes.
    #[inline]
    pub const fn block_size(&self) -> usize {
        self.block_size
    }

    /// Tag array access latency in cycles.
    pub const fn tag_latency(&self) -> Cycle {
        self.resources.tag_array().latency()
    }

    /// Data array access latency in cycles.
    pub const fn data_latency(&self) -> Cycle {
        self.resources.data_array().latency()
    }

    /// Whether weighted touches reach the replacement policy.
    pub const fn uses_occupancy(&self) -> bool {
        self.use_occupancy
    }

    /// Counters of this cache.
    pub const fn stats(&self) -> &CacheMemoryStats {
        &self.stats
    }

    /// Attaches an observer that receives every subsequent [`CacheEvent`].
    pub fn add_observer(&mut self, observer: Box<dyn CacheObserver>) {
        self.observers.push(observer);
    }

    /// Maps a line address to its set.
    ///
    /// The set index is bits `[start_index_bit, start_index_bit + log2(num_sets))`
    /// of the address.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Unaligned`] if `addr` is not line-aligned.
    pub fn set_of(&self, addr: Addr) -> CacheResult<usize> {
        if !is_line_aligned(addr, self.block_size) {
            return Err(CacheError::Unaligned {
                addr,
                block_size: self.block_size,
            });
        }
        let from = self.start_index_bit;
        Ok(bit_select(addr, from, from + self.num_set_bits - 1) as usize)
    }

    /// Returns the way of `set` holding `addr`, excluding logically absent lines.
    pub fn find_tag_in_set(&self, set: usize, addr: Addr) -> Option<usize> {
        let way = self.find_tag_in_set_ignore_permissions(set, addr)?;
        let entry = self.slots[self.slot_index(set, way)].as_ref()?;
        (entry.permission() != AccessPermission::NotPresent).then_some(way)
    }

    /// Returns the way of `set` holding `addr`, whatever its permission.
    pub fn find_tag_in_set_ignore_permissions(&self, set: usize, addr: Addr) -> Option<usize> {
        let pos = self.directory.get(addr)?;
        if pos.set != set {
            return None;
        }
        let entry = self.slots[self.slot_index(pos.set, pos.way)].as_ref()?;
        (entry.address() == addr).then_some(pos.way)
    }

    /// Returns the resident entry for `addr`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Unaligned`] if `addr` is not line-aligned.
    pub fn lookup(&self, addr: Addr) -> CacheResult<Option<&CacheEntry>> {
        Ok(self
            .resident(addr)?
            .and_then(|idx| self.slots[idx].as_ref()))
    }

    /// Returns the resident entry for `addr` for modification, if any.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Unaligned`] if `addr` is not line-aligned.
    pub fn lookup_mut(&mut self, addr: Addr) -> CacheResult<Option<&mut CacheEntry>> {
        let Some(idx) = self.resident(addr)? else {
            return Ok(None);
        };
        Ok(self.slots[idx].as_mut())
    }

    /// Returns the line address held at flat slot index `idx`.
    ///
    /// # Returns
    ///
    /// The address, or 0 if the slot is empty, `Invalid` or `NotPresent`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::SlotOutOfRange`] if `idx >= num_blocks()`.
    pub fn address_at_index(&self, idx: usize) -> CacheResult<Addr> {
        let (set, way) = (idx / self.assoc, idx % self.assoc);
        let idx = self.checked_index(set, way)?;
        Ok(self.slots[idx]
            .as_ref()
            .filter(|e| {
                !matches!(
                    e.permission(),
                    AccessPermission::Invalid | AccessPermission::NotPresent
                )
            })
            .map_or(0, CacheEntry::address))
    }

    /// Whether the entry at `(set, way)` is Invalid.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::SlotOutOfRange`] or [`CacheError::EmptySlot`].
    pub fn is_block_invalid(&self, set: usize, way: usize) -> CacheResult<bool> {
        Ok(self.entry_at(set, way)?.permission() == AccessPermission::Invalid)
    }

    /// Whether the entry at `(set, way)` is not Busy.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::SlotOutOfRange`] or [`CacheError::EmptySlot`].
    pub fn is_block_not_busy(&self, set: usize, way: usize) -> CacheResult<bool> {
        Ok(self.entry_at(set, way)?.permission() != AccessPermission::Busy)
    }

    /// Replacement weight of `(set, way)`: the entry's valid sub-block count,
    /// or 0 for an empty slot.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::SlotOutOfRange`] for a coordinate outside the cache.
    pub fn replacement_weight(&self, set: usize, way: usize) -> CacheResult<u32> {
        let idx = self.checked_index(set, way)?;
        Ok(self.slots[idx].as_ref().map_or(0, CacheEntry::valid_blocks))
    }

    /// Entries displaced from logically absent slots by `allocate`.
    ///
    /// They are kept here instead of being dropped so the protocol
    /// controller can account for them.
    pub fn stale_entries(&self) -> &[CacheEntry] {
        &self.stale
    }

    /// Hands the displaced stale entries back to the caller.
    pub fn take_stale_entries(&mut self) -> Vec<CacheEntry> {
        std::mem::take(&mut self.stale)
    }

    /// Counts a demand hit.
    pub fn profile_demand_hit(&mut self) {
        self.stats.demand_hits += 1;
    }

    /// Counts a demand miss.
    pub fn profile_demand_miss(&mut self) {
        self.stats.demand_misses += 1;
    }

    /// Counts a prefetch hit.
    pub fn profile_prefetch_hit(&mut self) {
        self.stats.prefetch_hits += 1;
    }

    /// Counts a prefetch miss.
    pub fn profile_prefetch_miss(&mut self) {
        self.stats.prefetch_misses += 1;
    }

    #[inline]
    const fn slot_index(&self, set: usize, way: usize) -> usize {
        set * self.assoc + way
    }

    fn checked_index(&self, set: usize, way: usize) -> CacheResult<usize> {
        if set >= self.num_sets || way >= self.assoc {
            return Err(CacheError::SlotOutOfRange { set, way });
        }
        Ok(self.slot_index(set, way))
    }

    fn entry_at(&self, set: usize, way: usize) -> CacheResult<&CacheEntry> {
        let idx = self.checked_index(set, way)?;
        self.slots[idx]
            .as_ref()
            .ok_or(CacheError::EmptySlot { set, way })
    }

    /// Flat index of the present (not `NotPresent`) entry for `addr`.
    fn resident(&self, addr: Addr) -> CacheResult<Option<usize>> {
        let set = self.set_of(addr)?;
        Ok(self
            .find_tag_in_set(set, addr)
            .map(|way| self.slot_index(set, way)))
    }

    /// Like [`resident`](Self::resident), but absence is an error.
    fn require_resident(&self, addr: Addr) -> CacheResult<usize> {
        self.resident(addr)?.ok_or(CacheError::NotPresent(addr))
    }

    /// Ages the entry at `idx` as an access at `now`.
    fn age(&mut self, idx: usize, now: Cycle) {
        self.policy.touch(&mut self.replacement_data[idx]);
        if let Some(entry) = self.slots[idx].as_mut() {
            entry.set_last_access(now);
        }
    }

    fn notify(&mut self, event: &CacheEvent) {
        for observer in &mut self.observers {
            observer.on_event(event);
        }
    }
}

impl fmt::Display for CacheMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Cache dump: {} sets x {} ways, {}-byte lines",
            self.num_sets, self.assoc, self.block_size
        )?;
        for set in 0..self.num_sets {
            for way in 0..self.assoc {
                if let Some(entry) = &self.slots[self.slot_index(set, way)] {
                    writeln!(f, "  set {set:>4} way {way:>2}: {entry}")?;
                }
            }
        }
        Ok(())
    }
}
