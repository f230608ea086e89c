//! Private IPv4 address space.
//!
//! This file tracks which host addresses of a single RFC 1918 block are in
//! use and hands out free ones. The space is rebuilt from the device table
//! on every run, so nothing here is persisted.

use crate::utils::ip_utils::{host_bounds, is_private_net, parse_ipv4_net};
use ipnet::Ipv4Net;
use std::collections::BTreeSet;
use std::net::Ipv4Addr;

/// Errors raised while building or drawing from an address space
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressSpaceError {
    #[error("Invalid CIDR: {reason}")]
    InvalidCidr { reason: String },

    #[error("CIDR {cidr} must be in the private address space")]
    InvalidRange { cidr: Ipv4Net },

    #[error("Address {ip} is not a usable host address in {cidr}")]
    NotInRange { ip: Ipv4Addr, cidr: Ipv4Net },

    #[error("Address {ip} is already in use")]
    AlreadyInUse { ip: Ipv4Addr },

    #[error("Network {cidr} is out of space")]
    OutOfSpace { cidr: Ipv4Net },
}

/// Pool of usable host addresses for one private IPv4 CIDR block
///
/// The full range is a pair of inclusive bounds and only the used subset is
/// stored; the unused set is always derived from the two.
#[derive(Debug, Clone)]
pub struct AddressSpace {
    cidr: Ipv4Net,
    /// First usable host address
    first_host: u32,
    /// Last usable host address
    last_host: u32,
    used: BTreeSet<u32>,
}

impl AddressSpace {
    /// Build an empty space for `cidr`
    ///
    /// Fails with `InvalidRange` unless the whole block lies in RFC 1918 space.
    pub fn new(cidr: &str) -> Result<Self, AddressSpaceError> {
        let net = parse_ipv4_net(cidr).map_err(|reason| AddressSpaceError::InvalidCidr { reason })?;
        Self::from_net(net)
    }

    pub fn from_net(cidr: Ipv4Net) -> Result<Self, AddressSpaceError> {
        if !is_private_net(&cidr) {
            return Err(AddressSpaceError::InvalidRange { cidr });
        }
        let (first_host, last_host) = host_bounds(&cidr);
        Ok(AddressSpace {
            cidr,
            first_host,
            last_host,
            used: BTreeSet::new(),
        })
    }

    pub fn cidr(&self) -> Ipv4Net {
        self.cidr
    }

    /// Check if `ip` is one of the usable host addresses of the block
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        let ip = u32::from(ip);
        ip >= self.first_host && ip <= self.last_host
    }

    pub fn is_used(&self, ip: Ipv4Addr) -> bool {
        self.used.contains(&u32::from(ip))
    }

    /// Allocate the lowest unused address
    pub fn allocate(&mut self) -> Result<Ipv4Addr, AddressSpaceError> {
        let ip = self
            .unused()
            .next()
            .ok_or(AddressSpaceError::OutOfSpace { cidr: self.cidr })?;
        self.used.insert(u32::from(ip));
        Ok(ip)
    }

    /// Mark a specific address as used
    ///
    /// Leaves the space untouched on failure.
    pub fn reserve(&mut self, ip: Ipv4Addr) -> Result<(), AddressSpaceError> {
        if !self.contains(ip) {
            return Err(AddressSpaceError::NotInRange { ip, cidr: self.cidr });
        }
        if !self.used.insert(u32::from(ip)) {
            return Err(AddressSpaceError::AlreadyInUse { ip });
        }
        Ok(())
    }

    /// Addresses currently in use, ascending
    pub fn used(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.used.iter().map(|ip| Ipv4Addr::from(*ip))
    }

    /// Addresses still free, ascending
    pub fn unused(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        (self.first_host..=self.last_host)
            .filter(move |ip| !self.used.contains(ip))
            .map(Ipv4Addr::from)
    }

    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    pub fn total_count(&self) -> usize {
        (self.last_host - self.first_host) as usize + 1
    }

    pub fn percent_used(&self) -> f64 {
        self.used_count() as f64 / self.total_count() as f64 * 100.0
    }
}
