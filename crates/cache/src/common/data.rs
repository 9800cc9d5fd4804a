//! Request kinds, lock contexts, and the opaque line payload.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CacheError;

/// Kind of memory request issued by the protocol controller.
///
/// Only the distinction between read-like and write-like requests matters to
/// the permission check in `try_cache_access`; the remaining kinds are carried
/// for the warm-up recorder and for the controller's own bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestType {
    /// Data load.
    #[serde(rename = "LD")]
    Load,
    /// Data store.
    #[serde(rename = "ST")]
    Store,
    /// Atomic memory operation.
    #[serde(rename = "ATOMIC")]
    Atomic,
    /// Instruction fetch.
    #[serde(rename = "IFETCH")]
    InstructionFetch,
    /// Read half of a read-modify-write.
    #[serde(rename = "RMW_Read")]
    RmwRead,
    /// Write half of a read-modify-write.
    #[serde(rename = "RMW_Write")]
    RmwWrite,
    /// Read half of a locked read-modify-write.
    #[serde(rename = "Locked_RMW_Read")]
    LockedRmwRead,
    /// Write half of a locked read-modify-write.
    #[serde(rename = "Locked_RMW_Write")]
    LockedRmwWrite,
    /// Cache line flush.
    #[serde(rename = "FLUSH")]
    Flush,
}

impl RequestType {
    /// Every request kind, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Load,
        Self::Store,
        Self::Atomic,
        Self::InstructionFetch,
        Self::RmwRead,
        Self::RmwWrite,
        Self::LockedRmwRead,
        Self::LockedRmwWrite,
        Self::Flush,
    ];

    /// Returns `true` for requests satisfiable with read-only permission.
    #[inline]
    pub const fn is_read_only(self) -> bool {
        matches!(self, Self::Load | Self::InstructionFetch)
    }

    /// Canonical protocol name of the request kind.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Load => "LD",
            Self::Store => "ST",
            Self::Atomic => "ATOMIC",
            Self::InstructionFetch => "IFETCH",
            Self::RmwRead => "RMW_Read",
            Self::RmwWrite => "RMW_Write",
            Self::LockedRmwRead => "Locked_RMW_Read",
            Self::LockedRmwWrite => "Locked_RMW_Write",
            Self::Flush => "FLUSH",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RequestType {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CacheError::UnknownRequest(s.to_owned()))
    }
}

/// Opaque identifier of the hardware context holding a line lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContextId(pub i32);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx{}", self.0)
    }
}

/// Payload of a cache line.
///
/// The cache stores and returns it but never interprets its contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataBlock(Vec<u8>);

impl DataBlock {
    /// Creates a zero-filled block of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self(vec![0; size])
    }

    /// Wraps existing bytes as a block.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the block contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the block contents for in-place modification.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }

    /// Copies `bytes` into the block starting at `offset`.
    ///
    /// # Returns
    ///
    /// `false` if the write would run past the end of the block, in which case
    /// the block is left unchanged.
    pub fn write_at(&mut self, offset: usize, bytes: &[u8]) -> bool {
        match offset
            .checked_add(bytes.len())
            .and_then(|end| self.0.get_mut(offset..end))
        {
            Some(dst) => {
                dst.copy_from_slice(bytes);
                true
            }
            None => false,
        }
    }

    /// Size of the block in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for a zero-length block.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
