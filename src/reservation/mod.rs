//! Fixed-IP reservations.
//!
//! A reservation map binds MAC addresses to `{ip, name}` pairs, in the same
//! shape the DHCP controller stores its fixed IP assignments. This module
//! builds the map the next organize should push and compares it with the
//! one currently in place.

pub mod diff;
pub mod generate;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::Ipv4Addr;

pub use diff::{diff, ReservationDiff};
pub use generate::generate_reservations;

/// The value half of a reservation map entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub ip: Ipv4Addr,
    pub name: String,
}

/// MAC address -> reservation, ordered by MAC
pub type ReservationMap = BTreeMap<String, Reservation>;

/// A flattened reservation, used in change reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationEntry {
    pub mac: String,
    pub ip: Ipv4Addr,
    pub name: String,
}

impl ReservationEntry {
    pub fn new(mac: &str, reservation: &Reservation) -> Self {
        ReservationEntry {
            mac: mac.to_string(),
            ip: reservation.ip,
            name: reservation.name.clone(),
        }
    }
}
