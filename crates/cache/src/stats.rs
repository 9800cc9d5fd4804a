//! Cache memory statistics.
//!
//! This module tracks the counters a cache memory owns. It provides:
//! 1. **Demand and prefetch:** Hit/miss counts reported by the protocol controller.
//! 2. **Array usage:** Tag/data array reads and writes, atomic ALU operations.
//! 3. **Stalls:** Per-resource contention counts.
//! 4. **HTM:** Read/write-set size distributions sampled on commit and abort.
//!
//! Counters only count; nothing in the cache reads them back.

use std::fmt;

/// Number of buckets in every [`Histogram`].
const HISTOGRAM_BUCKETS: usize = 8;

/// Fixed-bucket-count distribution with doubling bucket width.
///
/// Starts with unit-width buckets. When a sample falls past the last bucket,
/// adjacent buckets are merged pairwise and the width doubles until it fits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    buckets: [u64; HISTOGRAM_BUCKETS],
    bucket_size: u64,
    samples: u64,
    sum: u64,
    min: Option<u64>,
    max: Option<u64>,
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            buckets: [0; HISTOGRAM_BUCKETS],
            bucket_size: 1,
            samples: 0,
            sum: 0,
            min: None,
            max: None,
        }
    }
}

impl Histogram {
    /// Records one sample.
    pub fn sample(&mut self, value: u64) {
        while value / self.bucket_size >= HISTOGRAM_BUCKETS as u64 {
            self.grow();
        }
        let index = (value / self.bucket_size) as usize;
        self.buckets[index] += 1;
        self.samples += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    fn grow(&mut self) {
        let half = HISTOGRAM_BUCKETS / 2;
        for i in 0..half {
            self.buckets[i] = self.buckets[2 * i] + self.buckets[2 * i + 1];
        }
        for bucket in &mut self.buckets[half..] {
            *bucket = 0;
        }
        self.bucket_size *= 2;
    }

    /// Bucket counts, lowest first.
    pub const fn buckets(&self) -> &[u64; HISTOGRAM_BUCKETS] {
        &self.buckets
    }

    /// Width of each bucket.
    pub const fn bucket_size(&self) -> u64 {
        self.bucket_size
    }

    /// Number of samples recorded.
    pub const fn samples(&self) -> u64 {
        self.samples
    }

    /// Sum of all samples.
    pub const fn sum(&self) -> u64 {
        self.sum
    }

    /// Smallest sample, if any.
    pub const fn min(&self) -> Option<u64> {
        self.min
    }

    /// Largest sample, if any.
    pub const fn max(&self) -> Option<u64> {
        self.max
    }

    /// Mean of all samples; 0 when empty.
    pub fn mean(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.sum as f64 / self.samples as f64
        }
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "samples {} mean {:.2}", self.samples, self.mean())?;
        for (i, count) in self.buckets.iter().enumerate() {
            let lo = i as u64 * self.bucket_size;
            write!(f, " [{}-{}]:{}", lo, lo + self.bucket_size - 1, count)?;
        }
        Ok(())
    }
}

/// Counters of one cache memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheMemoryStats {
    /// Demand accesses that hit.
    pub demand_hits: u64,
    /// Demand accesses that missed.
    pub demand_misses: u64,
    /// Prefetches that found the line resident.
    pub prefetch_hits: u64,
    /// Prefetches that missed.
    pub prefetch_misses: u64,

    /// Data array reads recorded.
    pub data_array_reads: u64,
    /// Data array writes recorded.
    pub data_array_writes: u64,
    /// Tag array reads recorded.
    pub tag_array_reads: u64,
    /// Tag array writes recorded.
    pub tag_array_writes: u64,
    /// Atomic ALU operations recorded.
    pub atomic_alu_accesses: u64,

    /// Tag array availability checks refused due to bank contention.
    pub tag_array_stalls: u64,
    /// Data array availability checks refused due to bank contention.
    pub data_array_stalls: u64,
    /// Atomic ALU availability checks refused due to port contention.
    pub atomic_alu_stalls: u64,

    /// Read-set sizes of committed transactions.
    pub htm_commit_read_set: Histogram,
    /// Write-set sizes of committed transactions.
    pub htm_commit_write_set: Histogram,
    /// Read-set sizes of aborted transactions.
    pub htm_abort_read_set: Histogram,
    /// Write-set sizes of aborted transactions.
    pub htm_abort_write_set: Histogram,
}

impl CacheMemoryStats {
    /// Total demand accesses.
    pub const fn demand_accesses(&self) -> u64 {
        self.demand_hits + self.demand_misses
    }

    /// Total prefetch accesses.
    pub const fn prefetch_accesses(&self) -> u64 {
        self.prefetch_hits + self.prefetch_misses
    }
}

impl fmt::Display for CacheMemoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "demand_hits              {}", self.demand_hits)?;
        writeln!(f, "demand_misses            {}", self.demand_misses)?;
        writeln!(f, "demand_accesses          {}", self.demand_accesses())?;
        writeln!(f, "prefetch_hits            {}", self.prefetch_hits)?;
        writeln!(f, "prefetch_misses          {}", self.prefetch_misses)?;
        writeln!(f, "prefetch_accesses        {}", self.prefetch_accesses())?;
        writeln!(f, "data_array_reads         {}", self.data_array_reads)?;
        writeln!(f, "data_array_writes        {}", self.data_array_writes)?;
        writeln!(f, "tag_array_reads          {}", self.tag_array_reads)?;
        writeln!(f, "tag_array_writes         {}", self.tag_array_writes)?;
        writeln!(f, "atomic_alu_accesses      {}", self.atomic_alu_accesses)?;
        writeln!(f, "tag_array_stalls         {}", self.tag_array_stalls)?;
        writeln!(f, "data_array_stalls        {}", self.data_array_stalls)?;
        writeln!(f, "atomic_alu_stalls        {}", self.atomic_alu_stalls)?;
        writeln!(f, "htm_commit_read_set      {}", self.htm_commit_read_set)?;
        writeln!(f, "htm_commit_write_set     {}", self.htm_commit_write_set)?;
        writeln!(f, "htm_abort_read_set       {}", self.htm_abort_read_set)?;
        write!(f, "htm_abort_write_set      {}", self.htm_abort_write_set)
    }
}
