//! Finite tag/data array banks and atomic ALU ports.
//!
//! This module provides:
//! 1. **Selectors:** [`CacheResourceType`] and [`CacheRequestType`], parsed from
//!    their protocol names.
//! 2. **Port models:** [`BankedArray`] for the tag and data arrays, and
//!    [`AluFreeList`] for the atomic ALU pool.
//! 3. **State:** [`ResourceState`], bundling the three port models behind the
//!    contention-modeling switch.

/// Banked SRAM array port model.
pub mod banked_array;

/// Atomic ALU pool port model.
pub mod alu_free_list;

use std::fmt;
use std::str::FromStr;

pub use alu_free_list::AluFreeList;
pub use banked_array::BankedArray;

use crate::common::{Addr, CacheError, CacheResult, Cycle};
use crate::config::CacheMemoryConfig;

/// Hardware resource a request may need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheResourceType {
    /// Tag array banks, keyed by set.
    TagArray,
    /// Data array banks, keyed by set.
    DataArray,
    /// Atomic ALU ports, keyed by line address.
    AtomicAluArray,
}

impl CacheResourceType {
    /// Protocol name of the resource.
    pub const fn name(self) -> &'static str {
        match self {
            Self::TagArray => "TagArray",
            Self::DataArray => "DataArray",
            Self::AtomicAluArray => "AtomicALUArray",
        }
    }
}

impl fmt::Display for CacheResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CacheResourceType {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TagArray" => Ok(Self::TagArray),
            "DataArray" => Ok(Self::DataArray),
            "AtomicALUArray" => Ok(Self::AtomicAluArray),
            other => Err(CacheError::UnknownResource(other.to_owned())),
        }
    }
}

/// Usage recorded against a resource once a request is admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheRequestType {
    /// Read of a data array line.
    DataArrayRead,
    /// Write of a data array line.
    DataArrayWrite,
    /// Read of a tag array entry.
    TagArrayRead,
    /// Write of a tag array entry.
    TagArrayWrite,
    /// Atomic read-modify-write on the ALU pool.
    AtomicAluOperation,
}

impl CacheRequestType {
    /// Protocol name of the request.
    pub const fn name(self) -> &'static str {
        match self {
            Self::DataArrayRead => "DataArrayRead",
            Self::DataArrayWrite => "DataArrayWrite",
            Self::TagArrayRead => "TagArrayRead",
            Self::TagArrayWrite => "TagArrayWrite",
            Self::AtomicAluOperation => "AtomicALUOperation",
        }
    }

    /// Resource the request occupies.
    pub const fn resource(self) -> CacheResourceType {
        match self {
            Self::DataArrayRead | Self::DataArrayWrite => CacheResourceType::DataArray,
            Self::TagArrayRead | Self::TagArrayWrite => CacheResourceType::TagArray,
            Self::AtomicAluOperation => CacheResourceType::AtomicAluArray,
        }
    }
}

impl fmt::Display for CacheRequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CacheRequestType {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DataArrayRead" => Ok(Self::DataArrayRead),
            "DataArrayWrite" => Ok(Self::DataArrayWrite),
            "TagArrayRead" => Ok(Self::TagArrayRead),
            "TagArrayWrite" => Ok(Self::TagArrayWrite),
            "AtomicALUOperation" => Ok(Self::AtomicAluOperation),
            other => Err(CacheError::UnknownRequest(other.to_owned())),
        }
    }
}

/// Port state of one cache memory.
#[derive(Debug, Clone)]
pub struct ResourceState {
    enabled: bool,
    tag_array: BankedArray,
    data_array: BankedArray,
    atomic_alus: AluFreeList,
}

impl ResourceState {
    /// Builds idle port models from the cache configuration.
    pub fn new(config: &CacheMemoryConfig) -> Self {
        Self {
            enabled: config.resource_stalls,
            tag_array: BankedArray::new(
                "tag array",
                config.tag_array_banks,
                config.tag_access_latency,
            ),
            data_array: BankedArray::new(
                "data array",
                config.data_array_banks,
                config.data_access_latency,
            ),
            atomic_alus: AluFreeList::new(config.atomic_alus, config.atomic_latency),
        }
    }

    /// Whether contention modeling is enabled.
    #[inline]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Tag array port model.
    pub const fn tag_array(&self) -> &BankedArray {
        &self.tag_array
    }

    /// Data array port model.
    pub const fn data_array(&self) -> &BankedArray {
        &self.data_array
    }

    /// Atomic ALU pool.
    pub const fn atomic_alus(&self) -> &AluFreeList {
        &self.atomic_alus
    }

    /// Returns whether `resource` can start an access for `set`/`line` at `now`.
    ///
    /// Never changes reservation state.
    pub fn is_available(
        &self,
        resource: CacheResourceType,
        set: usize,
        line: Addr,
        now: Cycle,
    ) -> bool {
        if !self.enabled {
            return true;
        }
        match resource {
            CacheResourceType::TagArray => self.tag_array.try_access(set, now),
            CacheResourceType::DataArray => self.data_array.try_access(set, now),
            CacheResourceType::AtomicAluArray => self.atomic_alus.try_access(line, now),
        }
    }

    /// Reserves `resource` for one access starting at `now`.
    ///
    /// # Errors
    ///
    /// Propagates the port model's conflict error when the resource is busy.
    pub fn reserve(
        &mut self,
        resource: CacheResourceType,
        set: usize,
        line: Addr,
        now: Cycle,
    ) -> CacheResult<()> {
        if !self.enabled {
            return Ok(());
        }
        match resource {
            CacheResourceType::TagArray => self.tag_array.reserve(set, now),
            CacheResourceType::DataArray => self.data_array.reserve(set, now),
            CacheResourceType::AtomicAluArray => self.atomic_alus.reserve(line, now),
        }
    }
}
