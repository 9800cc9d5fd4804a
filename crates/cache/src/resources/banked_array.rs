//! Banked tag/data array port model.
//!
//! A banked array has a fixed number of banks, each of which can start one
//! access per cycle and stays busy for the array's access latency. Sets are
//! interleaved across banks by `set % banks`.

use crate::common::{CacheError, CacheResult, Cycle};

/// The access currently occupying a bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AccessRecord {
    /// Set the bank was reserved for.
    set: usize,
    /// Cycle the reservation was made.
    start: Cycle,
    /// Last cycle the bank is busy.
    end: Cycle,
}

/// Port model of a banked SRAM array.
#[derive(Debug, Clone)]
pub struct BankedArray {
    name: &'static str,
    latency: Cycle,
    busy: Vec<Option<AccessRecord>>,
}

impl BankedArray {
    /// Creates an idle array.
    ///
    /// # Arguments
    ///
    /// * `name` - Label used in diagnostics ("tag array", "data array").
    /// * `banks` - Number of banks; must be non-zero.
    /// * `latency` - Cycles a bank stays busy per access; 0 disables the model.
    pub fn new(name: &'static str, banks: usize, latency: Cycle) -> Self {
        Self {
            name,
            latency,
            busy: vec![None; banks.max(1)],
        }
    }

    /// Access latency in cycles.
    #[inline]
    pub const fn latency(&self) -> Cycle {
        self.latency
    }

    /// Number of banks.
    #[inline]
    pub fn banks(&self) -> usize {
        self.busy.len()
    }

    /// Maps a set index to its bank.
    #[inline]
    pub fn bank_of(&self, set: usize) -> usize {
        if self.busy.len() == 1 {
            0
        } else {
            set % self.busy.len()
        }
    }

    /// Returns the reservation that still occupies the bank of `set` at `now`.
    fn occupant(&self, set: usize, now: Cycle) -> Option<AccessRecord> {
        self.busy[self.bank_of(set)].filter(|record| record.end >= now)
    }

    /// Returns whether an access to `set` may start at cycle `now`.
    ///
    /// A busy bank still admits the access it was reserved for in the same
    /// cycle, so several tag or data reads of one set can be issued together.
    pub fn try_access(&self, set: usize, now: Cycle) -> bool {
        if self.latency == 0 {
            return true;
        }
        self.occupant(set, now)
            .is_none_or(|record| record.start == now && record.set == set)
    }

    /// Reserves the bank of `set` for one access starting at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::BankConflict`] if the bank is busy with a
    /// different access, which means the caller skipped `try_access`.
    pub fn reserve(&mut self, set: usize, now: Cycle) -> CacheResult<()> {
        if self.latency == 0 {
            return Ok(());
        }
        if let Some(record) = self.occupant(set, now) {
            if record.start == now && record.set == set {
                return Ok(());
            }
            return Err(CacheError::BankConflict {
                array: self.name,
                bank: self.bank_of(set),
                set,
                busy_set: record.set,
                until: record.end,
            });
        }
        let bank = self.bank_of(set);
        self.busy[bank] = Some(AccessRecord {
            set,
            start: now,
            end: now + self.latency - 1,
        });
        Ok(())
    }
}
