//! Hit checks and explicit aging.

use super::{AccessPermission, CacheMemory};
use crate::common::{Addr, CacheResult, Cycle, DataBlock, RequestType, make_line_address};

impl CacheMemory {
    /// Checks whether a request of kind `request` may be satisfied by `addr`.
    ///
    /// A resident line is aged (touched and stamped with `now`) whether or
    /// not access is granted. `ReadWrite` lines grant every request kind;
    /// `ReadOnly` lines grant loads and instruction fetches only.
    ///
    /// # Returns
    ///
    /// The line's data when granted, `None` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Unaligned`](crate::common::CacheError::Unaligned)
    /// if `addr` is not line-aligned.
    pub fn try_cache_access(
        &mut self,
        addr: Addr,
        request: RequestType,
        now: Cycle,
    ) -> CacheResult<Option<&mut DataBlock>> {
        let Some(idx) = self.resident(addr)? else {
            return Ok(None);
        };
        self.age(idx, now);
        Ok(self.slots[idx]
            .as_mut()
            .filter(|entry| match entry.permission() {
                AccessPermission::ReadWrite => true,
                AccessPermission::ReadOnly => request.is_read_only(),
                _ => false,
            })
            .map(super::CacheEntry::data_mut))
    }

    /// Non-committing probe: succeeds for any resident line, whatever the
    /// request kind is. Ages the line like [`try_cache_access`](Self::try_cache_access).
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Unaligned`](crate::common::CacheError::Unaligned)
    /// if `addr` is not line-aligned.
    pub fn test_cache_access(
        &mut self,
        addr: Addr,
        _request: RequestType,
        now: Cycle,
    ) -> CacheResult<Option<&mut DataBlock>> {
        let Some(idx) = self.resident(addr)? else {
            return Ok(None);
        };
        self.age(idx, now);
        Ok(self.slots[idx]
            .as_mut()
            .filter(|entry| entry.permission() != AccessPermission::NotPresent)
            .map(super::CacheEntry::data_mut))
    }

    /// Whether `addr` is resident. No aging.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Unaligned`](crate::common::CacheError::Unaligned)
    /// if `addr` is not line-aligned.
    pub fn is_tag_present(&self, addr: Addr) -> CacheResult<bool> {
        Ok(self.resident(addr)?.is_some())
    }

    /// Ages the line containing `addr`, if resident.
    ///
    /// `addr` may point anywhere inside the line.
    pub fn set_mru(&mut self, addr: Addr, now: Cycle) {
        let line = make_line_address(addr, self.block_size);
        if let Ok(Some(idx)) = self.resident(line) {
            self.age(idx, now);
        }
    }

    /// Ages the line containing `addr` with an occupancy weight, if resident.
    ///
    /// The weight reaches the policy only if it uses occupancy; otherwise
    /// this is a plain touch. `addr` may point anywhere inside the line.
    pub fn set_mru_weighted(&mut self, addr: Addr, occupancy: u32, now: Cycle) {
        let line = make_line_address(addr, self.block_size);
        let Ok(Some(idx)) = self.resident(line) else {
            return;
        };
        if self.use_occupancy {
            self.policy
                .touch_weighted(&mut self.replacement_data[idx], occupancy);
            if let Some(entry) = self.slots[idx].as_mut() {
                entry.set_last_access(now);
            }
        } else {
            self.age(idx, now);
        }
    }

    /// Ages the entry at `(set, way)`, e.g. one obtained through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::SlotOutOfRange`](crate::common::CacheError::SlotOutOfRange)
    /// or [`CacheError::EmptySlot`](crate::common::CacheError::EmptySlot).
    pub fn set_mru_at(&mut self, set: usize, way: usize, now: Cycle) -> CacheResult<()> {
        let _ = self.entry_at(set, way)?;
        let idx = self.slot_index(set, way);
        self.age(idx, now);
        Ok(())
    }
}
