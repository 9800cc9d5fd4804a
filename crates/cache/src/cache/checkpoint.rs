//! Warm-up record emission.

use tracing::debug;

use super::{AccessPermission, CacheMemory};
use crate::common::RequestType;
use crate::recorder::{RecordSink, TraceRecord};

impl CacheMemory {
    /// Emits one warm-up record per line holding usable data.
    ///
    /// `ReadOnly` lines are replayed as loads (instruction fetches for an
    /// instruction cache) and `ReadWrite` lines as stores. Invalid, Busy and
    /// `NotPresent` lines are skipped.
    ///
    /// # Arguments
    ///
    /// * `cntrl_id` - Id of the owning controller, copied into every record.
    /// * `sink` - Destination of the records.
    ///
    /// # Returns
    ///
    /// The number of records emitted.
    pub fn record_cache_contents(&self, cntrl_id: u32, sink: &mut dyn RecordSink) -> usize {
        let mut warmed = 0;
        for entry in self.slots.iter().flatten() {
            let request_type = match entry.permission() {
                AccessPermission::ReadOnly if self.is_icache => RequestType::InstructionFetch,
                AccessPermission::ReadOnly => RequestType::Load,
                AccessPermission::ReadWrite => RequestType::Store,
                _ => continue,
            };
            sink.add_record(TraceRecord {
                cntrl_id,
                address: entry.address(),
                pc: 0,
                request_type,
                time: entry.last_access(),
                data: entry.data().clone(),
            });
            warmed += 1;
        }
        let total = self.num_blocks();
        debug!(
            warmed,
            total,
            percent = format_args!("{:.2}", warmed as f64 / total as f64 * 100.0),
            "recorded cache contents"
        );
        warmed
    }
}
