//! Coherence message counters.
//!
//! Counts one message per call to [`MessageProfile::record`]. The protocol
//! controller decides which route a message takes; this type only tallies.

use std::fmt;

/// Endpoint pair of a coherence message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageRoute {
    /// L1 to L2.
    L1ToL2,
    /// L1 to a peer L1.
    L1ToL1,
    /// L1 to the directory.
    L1ToDir,
    /// Directory to L1.
    DirToL1,
    /// L2 to L1.
    L2ToL1,
    /// L2 to the directory.
    L2ToDir,
    /// Directory to L2.
    DirToL2,
    /// L2 to the memory controller.
    L2ToMem,
    /// Memory controller to L2.
    MemToL2,
}

impl MessageRoute {
    /// Every route, in counter order.
    pub const ALL: [Self; 9] = [
        Self::L1ToL2,
        Self::L1ToL1,
        Self::L1ToDir,
        Self::DirToL1,
        Self::L2ToL1,
        Self::L2ToDir,
        Self::DirToL2,
        Self::L2ToMem,
        Self::MemToL2,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    /// Short statistic name of the route.
    pub const fn name(self) -> &'static str {
        match self {
            Self::L1ToL2 => "l1_l2",
            Self::L1ToL1 => "l1_l1",
            Self::L1ToDir => "l1_dir",
            Self::DirToL1 => "dir_l1",
            Self::L2ToL1 => "l2_l1",
            Self::L2ToDir => "l2_dir",
            Self::DirToL2 => "dir_l2",
            Self::L2ToMem => "l2_mem",
            Self::MemToL2 => "mem_l2",
        }
    }
}

/// Per-route message counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageProfile {
    counts: [u64; MessageRoute::ALL.len()],
}

impl MessageProfile {
    /// Creates a profile with every counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one message on `route`.
    pub fn record(&mut self, route: MessageRoute) {
        self.counts[route.index()] += 1;
    }

    /// Messages counted on `route`.
    pub const fn count(&self, route: MessageRoute) -> u64 {
        self.counts[route.index()]
    }

    /// Messages exchanged between cache levels (L1/L2 in both directions, L1 to L1).
    pub const fn cache_level(&self) -> u64 {
        self.count(MessageRoute::L1ToL2)
            + self.count(MessageRoute::L2ToL1)
            + self.count(MessageRoute::L1ToL1)
    }

    /// Messages exchanged between a cache and the directory.
    pub const fn cache_directory(&self) -> u64 {
        self.count(MessageRoute::L1ToDir)
            + self.count(MessageRoute::L2ToDir)
            + self.count(MessageRoute::DirToL1)
            + self.count(MessageRoute::DirToL2)
    }

    /// Messages exchanged between L2 and memory.
    pub const fn l2_memory(&self) -> u64 {
        self.count(MessageRoute::L2ToMem) + self.count(MessageRoute::MemToL2)
    }

    /// All messages counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl fmt::Display for MessageProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for route in MessageRoute::ALL {
            writeln!(f, "num_{}_messages {:>12}", route.name(), self.count(route))?;
        }
        writeln!(f, "total_cache_level_messages {}", self.cache_level())?;
        writeln!(f, "total_cache_dir_messages {}", self.cache_directory())?;
        write!(f, "total_l2cache_memory_messages {}", self.l2_memory())
    }
}
