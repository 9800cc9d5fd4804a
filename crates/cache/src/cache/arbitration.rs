//! Check-then-record resource arbitration.
//!
//! A request first asks [`CacheMemory::check_resource_available`] for every
//! resource it needs, and only once all of them answered `true` calls
//! [`CacheMemory::record_request_type`] for each. A refused check means the
//! caller retries on a later cycle.

use tracing::debug;

use super::CacheMemory;
use crate::common::{Addr, CacheResult, Cycle, make_line_address};
use crate::observer::CacheEvent;
use crate::resources::{CacheRequestType, CacheResourceType};

impl CacheMemory {
    /// Returns whether `resource` can start an access for `addr` at `now`.
    ///
    /// Always `true` when contention modeling is disabled. A refusal bumps
    /// the resource's stall counter; reservation state never changes.
    ///
    /// # Errors
    ///
    /// Returns `Unaligned` for a tag or data array check on an unaligned
    /// address.
    pub fn check_resource_available(
        &mut self,
        resource: CacheResourceType,
        addr: Addr,
        now: Cycle,
    ) -> CacheResult<bool> {
        if !self.resources.enabled() {
            return Ok(true);
        }
        let (set, line) = self.resource_key(resource, addr)?;
        if self.resources.is_available(resource, set, line, now) {
            return Ok(true);
        }
        match resource {
            CacheResourceType::TagArray => self.stats.tag_array_stalls += 1,
            CacheResourceType::DataArray => self.stats.data_array_stalls += 1,
            CacheResourceType::AtomicAluArray => self.stats.atomic_alu_stalls += 1,
        }
        debug!(
            %resource,
            addr = format_args!("{addr:#x}"),
            set,
            now,
            "resource stall"
        );
        self.notify(&CacheEvent::ResourceStall {
            resource,
            addr,
            now,
        });
        Ok(false)
    }

    /// Records one admitted request of kind `request` for `addr` at `now`.
    ///
    /// Reserves the resource when contention modeling is enabled and always
    /// bumps the usage counter.
    ///
    /// # Errors
    ///
    /// * `Unaligned` for an array request on an unaligned address.
    /// * `BankConflict` or `AluConflict` if the resource was not available,
    ///   i.e. the caller recorded without a successful check.
    pub fn record_request_type(
        &mut self,
        request: CacheRequestType,
        addr: Addr,
        now: Cycle,
    ) -> CacheResult<()> {
        let resource = request.resource();
        if self.resources.enabled() {
            let (set, line) = self.resource_key(resource, addr)?;
            self.resources.reserve(resource, set, line, now)?;
        }
        let counter = match request {
            CacheRequestType::DataArrayRead => &mut self.stats.data_array_reads,
            CacheRequestType::DataArrayWrite => &mut self.stats.data_array_writes,
            CacheRequestType::TagArrayRead => &mut self.stats.tag_array_reads,
            CacheRequestType::TagArrayWrite => &mut self.stats.tag_array_writes,
            CacheRequestType::AtomicAluOperation => &mut self.stats.atomic_alu_accesses,
        };
        *counter += 1;
        Ok(())
    }

    /// `(set, line)` a resource is arbitrated on. Banks are picked by set;
    /// the ALU pool is keyed by line, so any address inside it is accepted.
    fn resource_key(
        &self,
        resource: CacheResourceType,
        addr: Addr,
    ) -> CacheResult<(usize, Addr)> {
        match resource {
            CacheResourceType::TagArray | CacheResourceType::DataArray => {
                Ok((self.set_of(addr)?, addr))
            }
            CacheResourceType::AtomicAluArray => Ok((0, make_line_address(addr, self.block_size))),
        }
    }
}
