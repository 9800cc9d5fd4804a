//! Allocation and eviction.
//!
//! A line enters a set through `allocate` and leaves it through `deallocate`.
//! When the protocol needs room in a full set it asks `cache_probe` for a
//! victim, writes it back or drops it, and deallocates it itself.

use tracing::{debug, warn};

use super::{AccessPermission, CacheEntry, CacheMemory, SlotPos};
use crate::cache::policies::VictimCandidate;
use crate::common::{Addr, CacheError, CacheResult, Cycle};
use crate::observer::CacheEvent;

impl CacheMemory {
    /// Returns whether `addr` is resident or its set has a free way.
    ///
    /// A slot holding a `NotPresent` entry counts as free.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Unaligned`] if `addr` is not line-aligned.
    pub fn cache_avail(&self, addr: Addr) -> CacheResult<bool> {
        let set = self.set_of(addr)?;
        let base = self.slot_index(set, 0);
        Ok(self.slots[base..base + self.assoc]
            .iter()
            .any(|slot| {
                slot.as_ref().is_none_or(|entry| {
                    entry.address() == addr || entry.permission() == AccessPermission::NotPresent
                })
            }))
    }

    /// Installs `entry` for `addr` in the first free way of its set.
    ///
    /// The entry is reset to Invalid, unlocked, positioned and stamped with
    /// `now`; the slot's replacement state is reset.
    ///
    /// A `NotPresent` entry for a different address already occupying the
    /// chosen slot is a protocol bug. It is logged once per cache and moved
    /// to [`stale_entries`](Self::stale_entries). A `NotPresent` entry for
    /// `addr` itself is simply replaced.
    ///
    /// # Returns
    ///
    /// The installed entry.
    ///
    /// # Errors
    ///
    /// * [`CacheError::Unaligned`] if `addr` is not line-aligned.
    /// * [`CacheError::AlreadyPresent`] if `addr` is already resident.
    /// * [`CacheError::SetFull`] if `cache_avail(addr)` is false.
    /// * [`CacheError::NoFreeSlot`] if the scan finds no free way anyway.
    pub fn allocate(
        &mut self,
        addr: Addr,
        mut entry: CacheEntry,
        now: Cycle,
    ) -> CacheResult<&mut CacheEntry> {
        let set = self.set_of(addr)?;
        if self.find_tag_in_set(set, addr).is_some() {
            return Err(CacheError::AlreadyPresent(addr));
        }
        if !self.cache_avail(addr)? {
            return Err(CacheError::SetFull { addr, set });
        }

        let base = self.slot_index(set, 0);
        let way = self.slots[base..base + self.assoc]
            .iter()
            .position(|slot| {
                slot.as_ref()
                    .is_none_or(|e| e.permission() == AccessPermission::NotPresent)
            })
            .ok_or(CacheError::NoFreeSlot { addr, set })?;
        let idx = base + way;
        let pos = SlotPos { set, way };

        if let Some(stale) = self.slots[idx].take().filter(|e| e.address() != addr) {
            if !self.warned_stale {
                warn!(
                    addr = format_args!("{addr:#x}"),
                    stale = format_args!("{:#x}", stale.address()),
                    set,
                    way,
                    "entries in the cache should never be NotPresent; \
                     the displaced entry leaks unless it is tracked elsewhere"
                );
                self.warned_stale = true;
            }
            self.directory.remove_if_at(stale.address(), pos);
            self.notify(&CacheEvent::StaleOverwritten {
                stale: stale.address(),
                addr,
                set,
                way,
            });
            self.stale.push(stale);
        }

        entry.install(addr, set, way, now);
        self.policy.reset(&mut self.replacement_data[idx]);
        self.directory.insert(addr, pos);
        self.slots[idx] = Some(entry);
        debug!(addr = format_args!("{addr:#x}"), set, way, "allocate");
        self.notify(&CacheEvent::Allocated {
            addr,
            set,
            way,
            now,
        });

        self.slots[idx]
            .as_mut()
            .ok_or(CacheError::EmptySlot { set, way })
    }

    /// Removes the entry for `addr` and hands it back to the caller.
    ///
    /// The slot's replacement state is invalidated, not discarded.
    ///
    /// # Errors
    ///
    /// * [`CacheError::Unaligned`] if `addr` is not line-aligned.
    /// * [`CacheError::NotPresent`] if `addr` is not resident.
    pub fn deallocate(&mut self, addr: Addr) -> CacheResult<CacheEntry> {
        let idx = self.require_resident(addr)?;
        self.policy.invalidate(&mut self.replacement_data[idx]);
        let entry = self.slots[idx].take().ok_or(CacheError::NotPresent(addr))?;
        let _ = self.directory.remove(addr);
        let (set, way) = entry.position();
        debug!(addr = format_args!("{addr:#x}"), set, way, "deallocate");
        self.notify(&CacheEvent::Deallocated { addr, set, way });
        Ok(entry)
    }

    /// Returns the address the replacement policy would evict to make room
    /// for `addr`.
    ///
    /// Every way of the target set is offered to the policy. Nothing is
    /// evicted; the caller deallocates the victim itself.
    ///
    /// # Errors
    ///
    /// * [`CacheError::Unaligned`] if `addr` is not line-aligned.
    /// * [`CacheError::SetNotFull`] if `cache_avail(addr)` is true.
    /// * [`CacheError::InvalidVictim`] if the policy returns a way outside the set.
    pub fn cache_probe(&mut self, addr: Addr) -> CacheResult<Addr> {
        let set = self.set_of(addr)?;
        if self.cache_avail(addr)? {
            return Err(CacheError::SetNotFull { addr, set });
        }

        let base = self.slot_index(set, 0);
        let candidates: Vec<VictimCandidate<'_>> = (0..self.assoc)
            .map(|way| VictimCandidate {
                way,
                occupied: self.slots[base + way].is_some(),
                data: &self.replacement_data[base + way],
            })
            .collect();
        let way = self.policy.victim(&candidates);
        if way >= self.assoc {
            return Err(CacheError::InvalidVictim {
                way,
                assoc: self.assoc,
            });
        }

        let victim = self.slots[base + way]
            .as_ref()
            .map(CacheEntry::address)
            .ok_or(CacheError::EmptySlot { set, way })?;
        debug!(
            addr = format_args!("{addr:#x}"),
            victim = format_args!("{victim:#x}"),
            set,
            way,
            "probe"
        );
        Ok(victim)
    }
}
