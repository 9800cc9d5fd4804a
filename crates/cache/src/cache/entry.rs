//! Cache entries and their coherence permissions.

use std::fmt;

use crate::common::{Addr, ContextId, Cycle, DataBlock};

/// Coherence-visible access right of a line.
///
/// Only the read/write gating in `try_cache_access` is enforced by the cache;
/// transitions between permissions are driven by the protocol controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessPermission {
    /// Allocated but holding no usable data.
    Invalid,
    /// Readable.
    ReadOnly,
    /// Readable and writable.
    ReadWrite,
    /// In a transient protocol state.
    Busy,
    /// Logically absent. Entries should never stay in this state; the
    /// lookups treat such slots as free.
    #[default]
    NotPresent,
}

impl fmt::Display for AccessPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Invalid => "Invalid",
            Self::ReadOnly => "Read_Only",
            Self::ReadWrite => "Read_Write",
            Self::Busy => "Busy",
            Self::NotPresent => "NotPresent",
        };
        f.write_str(name)
    }
}

/// One line resident in the cache.
///
/// Built by the protocol controller and handed to `allocate`, which fills in
/// the address, position, permission, and timestamp. From then on the cache
/// owns it until `deallocate`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheEntry {
    address: Addr,
    permission: AccessPermission,
    set: usize,
    way: usize,
    locked: Option<ContextId>,
    last_access: Cycle,
    in_htm_read_set: bool,
    in_htm_write_set: bool,
    valid_blocks: u32,
    data: DataBlock,
}

impl CacheEntry {
    /// Creates an unallocated entry carrying `data`.
    pub fn new(data: DataBlock) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Sets the sub-block occupancy reported as the slot's replacement weight.
    #[must_use]
    pub fn with_valid_blocks(mut self, valid_blocks: u32) -> Self {
        self.valid_blocks = valid_blocks;
        self
    }

    /// Line address of the entry.
    #[inline]
    pub const fn address(&self) -> Addr {
        self.address
    }

    /// Current permission.
    #[inline]
    pub const fn permission(&self) -> AccessPermission {
        self.permission
    }

    /// Changes the permission. Used by the protocol controller.
    pub fn set_permission(&mut self, permission: AccessPermission) {
        self.permission = permission;
    }

    /// `(set, way)` position of the entry.
    #[inline]
    pub const fn position(&self) -> (usize, usize) {
        (self.set, self.way)
    }

    /// Cycle of the last access that aged this entry.
    #[inline]
    pub const fn last_access(&self) -> Cycle {
        self.last_access
    }

    /// Current lock holder, if any.
    #[inline]
    pub const fn lock_holder(&self) -> Option<ContextId> {
        self.locked
    }

    /// Locks the line for `context`, replacing any previous holder.
    pub fn set_locked(&mut self, context: ContextId) {
        self.locked = Some(context);
    }

    /// Unlocks the line.
    pub fn clear_locked(&mut self) {
        self.locked = None;
    }

    /// Returns `true` only if the line is locked by `context`.
    pub fn is_locked(&self, context: ContextId) -> bool {
        self.locked == Some(context)
    }

    /// Whether the line is in the current transaction's read set.
    #[inline]
    pub const fn in_htm_read_set(&self) -> bool {
        self.in_htm_read_set
    }

    /// Whether the line is in the current transaction's write set.
    #[inline]
    pub const fn in_htm_write_set(&self) -> bool {
        self.in_htm_write_set
    }

    /// Adds or removes the line from the transactional read set.
    pub fn set_in_htm_read_set(&mut self, value: bool) {
        self.in_htm_read_set = value;
    }

    /// Adds or removes the line from the transactional write set.
    pub fn set_in_htm_write_set(&mut self, value: bool) {
        self.in_htm_write_set = value;
    }

    /// Number of valid sub-blocks, used as the replacement weight.
    #[inline]
    pub const fn valid_blocks(&self) -> u32 {
        self.valid_blocks
    }

    /// Updates the number of valid sub-blocks.
    pub fn set_valid_blocks(&mut self, valid_blocks: u32) {
        self.valid_blocks = valid_blocks;
    }

    /// Line payload.
    pub const fn data(&self) -> &DataBlock {
        &self.data
    }

    /// Line payload, mutable.
    pub fn data_mut(&mut self) -> &mut DataBlock {
        &mut self.data
    }

    /// Prepares the entry for its slot. Called only by `allocate`.
    pub(super) fn install(&mut self, address: Addr, set: usize, way: usize, now: Cycle) {
        self.address = address;
        self.permission = AccessPermission::Invalid;
        self.locked = None;
        self.set = set;
        self.way = way;
        self.last_access = now;
    }

    pub(super) fn set_last_access(&mut self, now: Cycle) {
        self.last_access = now;
    }
}

impl fmt::Display for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:#x}, {}", self.address, self.permission)?;
        if let Some(ctx) = self.locked {
            write!(f, ", locked by {ctx}")?;
        }
        write!(f, ", last access {}]", self.last_access)
    }
}
