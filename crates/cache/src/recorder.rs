//! Warm-up checkpoint records.
//!
//! When a simulation is checkpointed, every cache emits one [`TraceRecord`]
//! per line it holds with usable permission. Replaying the records in order
//! on restore warms the caches back up. Records go to a [`RecordSink`];
//! [`CacheRecorder`] is the in-memory sink serialized to JSON.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::common::{Addr, Cycle, DataBlock, RequestType};

/// One line reconstructed on restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Id of the controller that owns the cache.
    pub cntrl_id: u32,
    /// Line address.
    pub address: Addr,
    /// Program counter of the access; always 0 for warm-up records.
    pub pc: Addr,
    /// Request kind used to bring the line back in.
    pub request_type: RequestType,
    /// Last access cycle of the line.
    pub time: Cycle,
    /// Line payload.
    pub data: DataBlock,
}

/// Destination of warm-up records.
pub trait RecordSink {
    /// Accepts one record.
    fn add_record(&mut self, record: TraceRecord);
}

/// Collects warm-up records in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecorder {
    records: Vec<TraceRecord>,
}

impl CacheRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records collected so far.
    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    /// Number of records collected.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record was collected.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serializes the records to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns a serialization error from `serde_json`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Writes the records as JSON to `writer`.
    ///
    /// # Errors
    ///
    /// Returns the I/O or serialization error from `serde_json`.
    pub fn write_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer(writer, self)
    }

    /// Reads records previously written with [`write_json`](Self::write_json).
    ///
    /// # Errors
    ///
    /// Returns the I/O or parse error from `serde_json`.
    pub fn read_json<R: Read>(reader: R) -> serde_json::Result<Self> {
        serde_json::from_reader(reader)
    }
}

impl RecordSink for CacheRecorder {
    fn add_record(&mut self, record: TraceRecord) {
        self.records.push(record);
    }
}
