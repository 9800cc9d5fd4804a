//! Atomic ALU pool port model.
//!
//! The pool has a fixed number of ALUs. Each reservation occupies one ALU for
//! a line for the pool's latency. A line can have only one operation in
//! flight, and no more than `alus` operations may start in the same cycle.

use std::collections::VecDeque;

use crate::common::{Addr, CacheError, CacheResult, Cycle};

/// An in-flight atomic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AluRecord {
    line: Addr,
    start: Cycle,
}

/// Port model of the atomic ALU pool.
#[derive(Debug, Clone)]
pub struct AluFreeList {
    alus: usize,
    latency: Cycle,
    in_flight: VecDeque<AluRecord>,
}

impl AluFreeList {
    /// Creates an idle pool of `alus` ALUs with the given occupancy latency.
    pub const fn new(alus: usize, latency: Cycle) -> Self {
        Self {
            alus,
            latency,
            in_flight: VecDeque::new(),
        }
    }

    /// Occupancy latency in cycles.
    #[inline]
    pub const fn latency(&self) -> Cycle {
        self.latency
    }

    /// Number of ALUs.
    #[inline]
    pub const fn alus(&self) -> usize {
        self.alus
    }

    fn active(&self, now: Cycle) -> impl Iterator<Item = &AluRecord> + '_ {
        let latency = self.latency;
        self.in_flight
            .iter()
            .filter(move |record| record.start + latency > now)
    }

    /// Returns whether an operation on `line` may start at cycle `now`.
    pub fn try_access(&self, line: Addr, now: Cycle) -> bool {
        let mut started_this_cycle = 0;
        for record in self.active(now) {
            if record.line == line {
                return false;
            }
            if record.start == now {
                started_this_cycle += 1;
            }
        }
        started_this_cycle < self.alus
    }

    /// Reserves an ALU for `line` starting at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::AluConflict`] if no ALU is available, which
    /// means the caller skipped `try_access`.
    pub fn reserve(&mut self, line: Addr, now: Cycle) -> CacheResult<()> {
        let latency = self.latency;
        self.in_flight.retain(|record| record.start + latency > now);
        if !self.try_access(line, now) {
            return Err(CacheError::AluConflict { line, now });
        }
        if latency > 0 {
            self.in_flight.push_back(AluRecord { line, start: now });
        }
        Ok(())
    }
}
