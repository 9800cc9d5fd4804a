//! Per-line lock ownership, used by load-linked/store-conditional.
//!
//! The cache only records who holds a lock. Deciding what a conflicting
//! context must do is left to the protocol.

use tracing::debug;

use super::CacheMemory;
use crate::common::{Addr, CacheResult, ContextId};

impl CacheMemory {
    /// Locks the line at `addr` for `context`.
    ///
    /// # Errors
    ///
    /// Returns `Unaligned` or `NotPresent`.
    pub fn set_locked(&mut self, addr: Addr, context: ContextId) -> CacheResult<()> {
        let idx = self.require_resident(addr)?;
        if let Some(entry) = self.slots[idx].as_mut() {
            entry.set_locked(context);
        }
        debug!(addr = format_args!("{addr:#x}"), %context, "set locked");
        Ok(())
    }

    /// Unlocks the line at `addr`, whoever holds it.
    ///
    /// # Errors
    ///
    /// Returns `Unaligned` or `NotPresent`.
    pub fn clear_locked(&mut self, addr: Addr) -> CacheResult<()> {
        let idx = self.require_resident(addr)?;
        if let Some(entry) = self.slots[idx].as_mut() {
            entry.clear_locked();
        }
        debug!(addr = format_args!("{addr:#x}"), "clear locked");
        Ok(())
    }

    /// Unlocks every line held by `context`.
    pub fn clear_locked_all(&mut self, context: ContextId) {
        let mut cleared = 0_usize;
        for entry in self.slots.iter_mut().flatten() {
            if entry.is_locked(context) {
                entry.clear_locked();
                cleared += 1;
            }
        }
        debug!(%context, cleared, "clear all locks");
    }

    /// Whether the line at `addr` is locked by `context`.
    ///
    /// A line locked by another context reports `false`.
    ///
    /// # Errors
    ///
    /// Returns `Unaligned` or `NotPresent`.
    pub fn is_locked(&self, addr: Addr, context: ContextId) -> CacheResult<bool> {
        let idx = self.require_resident(addr)?;
        Ok(self.slots[idx]
            .as_ref()
            .is_some_and(|entry| entry.is_locked(context)))
    }
}
