//! # Netorg - keeps DHCP fixed-IP reservations in step with the device inventory
//!
//! This library reconciles a table of network devices against a private
//! IPv4 subnet and against a set of classification rules, so that the
//! fixed IP reservations held by the DHCP controller match what is
//! actually on the network.
//!
//! ## Overview
//!
//! An organize run works in four steps:
//!
//! 1. **Map**: every address already held by a device is reserved in a fresh
//!    [`ip::AddressSpace`], then devices without an address are given the
//!    lowest free one ([`ip::NetworkMapper`]).
//! 2. **Classify**: every device falls into one of eight buckets keyed on its
//!    `known`/`reserved`/`active` flags, plus an overlapping bucket for
//!    active devices that are still unclassified ([`classify::DeviceClassifier`]).
//! 3. **Generate**: the reservation map for the next organize is built from
//!    the table, leaving out retired devices and ambiguous MACs
//!    ([`reservation::generate_reservations`]).
//! 4. **Diff**: the new map is compared with the one in place and the
//!    additions and removals are reported ([`reservation::diff`]).
//!
//! ## Architecture
//!
//! - `config`: Type-safe configuration structures and YAML parsing
//! - `config_loader`: Loading configuration, device tables and reservation files
//! - `device`: Device records and the device table query capability
//! - `ip`: Address space and device-to-address mapping
//! - `classify`: Rule catalogue and classifier
//! - `reservation`: Reservation generation and diffing
//! - `report`: Text rendering of run results
//! - `orchestrator`: The organize pipeline
//! - `utils`: CIDR helpers and column layout
//!
//! ## Example Usage
//!
//! ```rust
//! use netorg::device::{DeviceList, DeviceRecord};
//! use netorg::orchestrator::organize;
//! use netorg::reservation::ReservationMap;
//!
//! let mut table = DeviceList::new(vec![
//!     DeviceRecord::new("aa:bb:cc:dd:ee:01", "printer").with_flags(true, false, true),
//! ]);
//!
//! let summary = organize(&mut table, "192.168.128.0/24", &ReservationMap::new())?;
//! assert_eq!(summary.reservations.len(), 1);
//! assert_eq!(summary.diff.added.len(), 1);
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Configuration Format
//!
//! ```yaml
//! general:
//!   log_level: info
//! network:
//!   vlan_subnet: "192.168.128.0/24"
//! devices: "devices.yaml"
//! reservations:
//!   previous: "reservations.json"
//!   output: "reservations.new.json"
//! report:
//!   width: 80
//!   left_margin: 3
//! ```
//!
//! ## Error Handling
//!
//! Domain errors ([`ip::AddressSpaceError`], [`ip::MappingError`],
//! [`config::ValidationError`]) are `thiserror` enums. File and pipeline
//! functions return `color_eyre::Result` with context attached.

pub mod config;
pub mod config_loader;
pub mod device;
pub mod ip;
pub mod classify;
pub mod reservation;
pub mod report;
pub mod orchestrator;
pub mod utils;
