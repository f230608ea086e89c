//! Build the reservation map from the device table.

use super::{Reservation, ReservationMap};
use crate::classify::is_retired;
use crate::device::DeviceTable;
use std::collections::BTreeSet;

/// Reservations the next organize should hold
///
/// Retired devices are dropped, as are MACs that appear on more than one
/// row; neither is an error. Devices without an address get no entry.
pub fn generate_reservations<T>(table: &T) -> ReservationMap
where
    T: DeviceTable + ?Sized,
{
    let retired: BTreeSet<String> = table
        .select(&is_retired)
        .into_iter()
        .map(|d| d.mac.clone())
        .collect();
    let ambiguous = table.ambiguous_macs();

    let mut reservations = ReservationMap::new();
    let mut skipped = BTreeSet::new();
    for device in table.records() {
        if retired.contains(&device.mac) {
            if skipped.insert(device.mac.clone()) {
                log::debug!("Skipping retired device {} ({})", device.mac, device.name);
            }
            continue;
        }
        if ambiguous.contains(&device.mac) {
            if skipped.insert(device.mac.clone()) {
                log::warn!("Skipping device {}: it appears on more than one row", device.mac);
            }
            continue;
        }
        let Some(ip) = device.ip else {
            log::debug!("Skipping device {} ({}): no address assigned", device.mac, device.name);
            continue;
        };
        reservations.insert(
            device.mac.clone(),
            Reservation {
                ip,
                name: device.name.clone(),
            },
        );
    }

    log::debug!("Generated {} fixed IP reservations", reservations.len());
    reservations
}
