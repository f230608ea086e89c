//! Device table.
//!
//! A device table is the inventory of every MAC address seen on or
//! configured for the network. It is built elsewhere (DHCP leases, ARP
//! scans, prior classification); the mapping and reservation code only
//! reads it through [`DeviceTable`] and writes back newly assigned IPs.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::net::Ipv4Addr;
use std::sync::LazyLock;

/// Group given to devices nobody has classified yet
pub const UNCLASSIFIED: &str = "unclassified";

static MAC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[0-9a-f]{2}:){5}[0-9a-f]{2}$|^(?:[0-9a-f]{2}-){5}[0-9a-f]{2}$")
        .expect("Invalid MAC regex")
});

/// One row of the device table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub mac: String,
    pub name: String,
    /// `None` until an address has been assigned
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub ip: Option<Ipv4Addr>,
    /// Identity is confirmed by configuration
    #[serde(default)]
    pub known: bool,
    /// A fixed-IP reservation currently exists
    #[serde(default)]
    pub reserved: bool,
    /// Recently observed on the network
    #[serde(default)]
    pub active: bool,
    #[serde(default = "default_group")]
    pub group: String,
}

fn default_group() -> String {
    UNCLASSIFIED.to_string()
}

/// Accept a missing value, `null` or `""` as "no address"
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<Ipv4Addr>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(ip) => ip.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

impl DeviceRecord {
    pub fn new(mac: &str, name: &str) -> Self {
        DeviceRecord {
            mac: mac.to_string(),
            name: name.to_string(),
            ip: None,
            known: false,
            reserved: false,
            active: false,
            group: default_group(),
        }
    }

    pub fn with_ip(mut self, ip: Ipv4Addr) -> Self {
        self.ip = Some(ip);
        self
    }

    pub fn with_flags(mut self, known: bool, reserved: bool, active: bool) -> Self {
        self.known = known;
        self.reserved = reserved;
        self.active = active;
        self
    }

    pub fn with_group(mut self, group: &str) -> Self {
        self.group = group.to_string();
        self
    }

    pub fn has_ip(&self) -> bool {
        self.ip.is_some()
    }
}

/// Normalise a MAC address to lower-case, colon-separated form
///
/// Returns `None` unless the input is six hex octets joined consistently by
/// `:` or `-`.
pub fn normalize_mac(mac: &str) -> Option<String> {
    let mac = mac.trim();
    if !MAC_PATTERN.is_match(mac) {
        return None;
    }
    Some(mac.to_ascii_lowercase().replace('-', ":"))
}

/// Predicate over a device row
pub type DeviceFilter<'a> = dyn Fn(&DeviceRecord) -> bool + 'a;

/// Query capability over a device table
///
/// `select` returns matching rows in a stable order.
pub trait DeviceTable {
    fn select(&self, filter: &DeviceFilter<'_>) -> Vec<&DeviceRecord>;

    /// Set the address of every row with `mac`; returns the number of rows touched
    fn set_ip(&mut self, mac: &str, ip: Ipv4Addr) -> usize;

    fn records(&self) -> Vec<&DeviceRecord> {
        self.select(&|_| true)
    }

    /// MACs that appear on more than one row
    fn ambiguous_macs(&self) -> BTreeSet<String> {
        let records = self.records();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in &records {
            *counts.entry(record.mac.as_str()).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(mac, _)| mac.to_string())
            .collect()
    }
}

/// In-memory device table backed by a vector of rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceList {
    records: Vec<DeviceRecord>,
}

impl DeviceList {
    pub fn new(records: Vec<DeviceRecord>) -> Self {
        DeviceList { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeviceRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<DeviceRecord> {
        self.records
    }

    /// Rewrite every MAC in canonical form
    ///
    /// Returns the first MAC that does not look like one.
    pub fn normalize_macs(&mut self) -> Result<(), String> {
        for record in &mut self.records {
            match normalize_mac(&record.mac) {
                Some(mac) => record.mac = mac,
                None => return Err(format!("'{}' (device '{}') is not a MAC address", record.mac, record.name)),
            }
        }
        Ok(())
    }
}

impl From<Vec<DeviceRecord>> for DeviceList {
    fn from(records: Vec<DeviceRecord>) -> Self {
        DeviceList::new(records)
    }
}

impl DeviceTable for DeviceList {
    fn select(&self, filter: &DeviceFilter<'_>) -> Vec<&DeviceRecord> {
        self.records.iter().filter(|record| filter(record)).collect()
    }

    fn set_ip(&mut self, mac: &str, ip: Ipv4Addr) -> usize {
        let mut touched = 0;
        for record in self.records.iter_mut().filter(|record| record.mac == mac) {
            record.ip = Some(ip);
            touched += 1;
        }
        touched
    }
}
