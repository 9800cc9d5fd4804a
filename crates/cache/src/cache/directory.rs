//! Address to slot index.

use std::collections::HashMap;

use crate::common::Addr;

/// Position of a slot in the entry store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotPos {
    /// Set index.
    pub set: usize,
    /// Way index.
    pub way: usize,
}

/// Maps every resident line address to the slot that holds it.
///
/// Only the entry store mutates the directory, and it keeps exactly one
/// mapping per address it has installed.
#[derive(Debug, Clone, Default)]
pub struct TagDirectory {
    map: HashMap<Addr, SlotPos>,
}

impl TagDirectory {
    /// Creates an empty directory sized for `capacity` lines.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    /// Slot currently mapped for `addr`.
    #[inline]
    pub fn get(&self, addr: Addr) -> Option<SlotPos> {
        self.map.get(&addr).copied()
    }

    /// Records that `addr` lives at `pos`.
    pub fn insert(&mut self, addr: Addr, pos: SlotPos) {
        let _ = self.map.insert(addr, pos);
    }

    /// Drops the mapping of `addr`.
    pub fn remove(&mut self, addr: Addr) -> Option<SlotPos> {
        self.map.remove(&addr)
    }

    /// Drops the mapping of `addr` only if it still points at `pos`.
    pub fn remove_if_at(&mut self, addr: Addr, pos: SlotPos) {
        if self.map.get(&addr) == Some(&pos) {
            let _ = self.map.remove(&addr);
        }
    }

    /// Number of mapped addresses.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no address is mapped.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
