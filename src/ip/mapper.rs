//! Device table to address space mapping.
//!
//! Addresses already held by devices are reserved first so the allocator
//! can never hand one of them out again; only then do devices without an
//! address get one.

use super::space::{AddressSpace, AddressSpaceError};
use crate::device::DeviceTable;
use std::collections::HashSet;
use std::net::Ipv4Addr;

/// Fatal errors for a mapping run
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("Mapping conflict for device {mac} at {ip}: {source}")]
    Conflict {
        mac: String,
        ip: Ipv4Addr,
        #[source]
        source: AddressSpaceError,
    },

    #[error("Mapping exhausted while assigning device {mac}: {source}")]
    Exhausted {
        mac: String,
        #[source]
        source: AddressSpaceError,
    },
}

/// What a mapping run did to the device table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingSummary {
    /// Addresses that were already held by devices
    pub reserved: usize,
    /// Newly assigned addresses, in assignment order
    pub assigned: Vec<(String, Ipv4Addr)>,
    /// MACs left without an address because several rows share them
    pub skipped: Vec<String>,
}

/// Maps a device table onto one address space
#[derive(Debug)]
pub struct NetworkMapper {
    space: AddressSpace,
}

impl NetworkMapper {
    pub fn new(space: AddressSpace) -> Self {
        NetworkMapper { space }
    }

    pub fn for_subnet(cidr: &str) -> Result<Self, AddressSpaceError> {
        Ok(NetworkMapper::new(AddressSpace::new(cidr)?))
    }

    /// Reserve every address already in the table, then fill the gaps
    ///
    /// Addresses on rows whose MAC appears more than once are reserved too,
    /// so they are never reissued; such MACs are only left out of new
    /// assignment and listed in [`MappingSummary::skipped`].
    ///
    /// On error the space is left partially filled and should be dropped.
    pub fn map_to_space<T>(&mut self, table: &mut T) -> Result<MappingSummary, MappingError>
    where
        T: DeviceTable + ?Sized,
    {
        let mut summary = MappingSummary::default();

        // Rows repeating the same mac/ip pair describe one holder of the address
        let mut held = HashSet::new();
        let holders: Vec<(String, Ipv4Addr)> = table
            .select(&|d| d.has_ip())
            .into_iter()
            .filter_map(|d| d.ip.map(|ip| (d.mac.clone(), ip)))
            .filter(|pair| held.insert(pair.clone()))
            .collect();

        for (mac, ip) in holders {
            self.space
                .reserve(ip)
                .map_err(|source| MappingError::Conflict { mac: mac.clone(), ip, source })?;
            log::debug!("Reserved {} for device {}", ip, mac);
            summary.reserved += 1;
        }

        let ambiguous = table.ambiguous_macs();
        let mut seen = HashSet::new();
        let needing_ip: Vec<String> = table
            .select(&|d| !d.has_ip())
            .into_iter()
            .map(|d| d.mac.clone())
            .filter(|mac| seen.insert(mac.clone()))
            .collect();

        for mac in needing_ip {
            if ambiguous.contains(&mac) {
                log::warn!("Device {} appears on more than one row; not assigning an address", mac);
                summary.skipped.push(mac);
                continue;
            }
            let ip = self
                .space
                .allocate()
                .map_err(|source| MappingError::Exhausted { mac: mac.clone(), source })?;
            table.set_ip(&mac, ip);
            log::debug!("Assigned {} to device {}", ip, mac);
            summary.assigned.push((mac, ip));
        }

        Ok(summary)
    }

    pub fn percent_used(&self) -> f64 {
        self.space.percent_used()
    }

    pub fn space(&self) -> &AddressSpace {
        &self.space
    }
}
