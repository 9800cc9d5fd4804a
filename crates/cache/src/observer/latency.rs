//! Transaction duration tracking.
//!
//! A [`LatencyProfile`] holds one open start timestamp. The protocol
//! controller calls `start` when a transaction begins and `finish` with the
//! transaction's kind when it completes; the elapsed cycles are accumulated
//! per kind. Keep one profile per viewpoint (e.g. controller-side and
//! network-side) rather than interleaving them.

use tracing::debug;

use crate::common::Cycle;

/// Transaction kinds tracked by a [`LatencyProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// A store that missed.
    WriteMiss,
    /// A load that missed.
    ReadMiss,
    /// A store that hit a shared line and needed an upgrade.
    WriteHit,
}

impl TransactionKind {
    /// Every kind, in counter order.
    pub const ALL: [Self; 3] = [Self::WriteMiss, Self::ReadMiss, Self::WriteHit];

    const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct DurationTotals {
    count: u64,
    total: Cycle,
}

/// Start/finish duration tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatencyProfile {
    started: Option<Cycle>,
    totals: [DurationTotals; TransactionKind::ALL.len()],
    durations: Vec<Cycle>,
}

impl LatencyProfile {
    /// Creates an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a transaction at `now`, replacing any unfinished one.
    pub fn start(&mut self, now: Cycle) {
        self.started = Some(now);
    }

    /// Closes the open transaction as `kind` at `now`.
    ///
    /// # Returns
    ///
    /// The elapsed cycles, or `None` (and nothing recorded) if no transaction
    /// was open. The start timestamp is kept, so several completions can be
    /// measured against one start.
    pub fn finish(&mut self, kind: TransactionKind, now: Cycle) -> Option<Cycle> {
        let start = self.started?;
        let duration = now.saturating_sub(start);
        let totals = &mut self.totals[kind.index()];
        totals.count += 1;
        totals.total += duration;
        self.durations.push(duration);
        debug!(?kind, duration, "transaction finished");
        Some(duration)
    }

    /// Completed transactions of `kind`.
    pub const fn count(&self, kind: TransactionKind) -> u64 {
        self.totals[kind.index()].count
    }

    /// Summed duration of completed transactions of `kind`.
    pub const fn total(&self, kind: TransactionKind) -> Cycle {
        self.totals[kind.index()].total
    }

    /// Mean duration of `kind`, or `None` before the first completion.
    pub fn average(&self, kind: TransactionKind) -> Option<f64> {
        let totals = self.totals[kind.index()];
        (totals.count > 0).then(|| totals.total as f64 / totals.count as f64)
    }

    /// Every recorded duration, in completion order.
    pub fn durations(&self) -> &[Cycle] {
        &self.durations
    }
}
