//! Hardware transactional memory sweeps.

use tracing::debug;

use super::{AccessPermission, CacheMemory};
use crate::observer::CacheEvent;

/// What a sweep does to write-set lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Abort,
    Commit,
}

impl CacheMemory {
    /// Ends the current transaction by discarding its speculative writes.
    ///
    /// Every line in the write set is invalidated. All lines leave both
    /// transactional sets and are unlocked.
    ///
    /// # Returns
    ///
    /// `(read_set, write_set)` sizes at the time of the abort.
    pub fn htm_abort_transaction(&mut self) -> (u64, u64) {
        let sizes = self.htm_sweep(Outcome::Abort);
        self.stats.htm_abort_read_set.sample(sizes.0);
        self.stats.htm_abort_write_set.sample(sizes.1);
        debug!(read_set = sizes.0, write_set = sizes.1, "htm abort");
        self.notify(&CacheEvent::HtmAborted {
            read_set: sizes.0,
            write_set: sizes.1,
        });
        sizes
    }

    /// Ends the current transaction, making its writes permanent.
    ///
    /// All lines leave both transactional sets and are unlocked; nothing is
    /// invalidated.
    ///
    /// # Returns
    ///
    /// `(read_set, write_set)` sizes at the time of the commit.
    pub fn htm_commit_transaction(&mut self) -> (u64, u64) {
        let sizes = self.htm_sweep(Outcome::Commit);
        self.stats.htm_commit_read_set.sample(sizes.0);
        self.stats.htm_commit_write_set.sample(sizes.1);
        debug!(read_set = sizes.0, write_set = sizes.1, "htm commit");
        self.notify(&CacheEvent::HtmCommitted {
            read_set: sizes.0,
            write_set: sizes.1,
        });
        sizes
    }

    fn htm_sweep(&mut self, outcome: Outcome) -> (u64, u64) {
        let (mut read_set, mut write_set) = (0, 0);
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            let Some(line) = slot.as_mut() else {
                continue;
            };
            read_set += u64::from(line.in_htm_read_set());
            write_set += u64::from(line.in_htm_write_set());
            if outcome == Outcome::Abort && line.in_htm_write_set() {
                line.set_permission(AccessPermission::Invalid);
                self.policy.invalidate(&mut self.replacement_data[idx]);
            }
            line.set_in_htm_read_set(false);
            line.set_in_htm_write_set(false);
            line.clear_locked();
        }
        (read_set, write_set)
    }
}
