//! Compare two reservation maps.
//!
//! Only keys are compared. A MAC present in both maps with a different ip
//! or name is neither added nor removed.

use super::{ReservationEntry, ReservationMap};
use serde::Serialize;

/// Reservations to create and to delete, each ordered by MAC
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReservationDiff {
    pub added: Vec<ReservationEntry>,
    pub removed: Vec<ReservationEntry>,
}

impl ReservationDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// `added = keys(new) - keys(old)`, `removed = keys(old) - keys(new)`
pub fn diff(old: &ReservationMap, new: &ReservationMap) -> ReservationDiff {
    let added = new
        .iter()
        .filter(|(mac, _)| !old.contains_key(*mac))
        .map(|(mac, reservation)| ReservationEntry::new(mac, reservation))
        .collect();
    let removed = old
        .iter()
        .filter(|(mac, _)| !new.contains_key(*mac))
        .map(|(mac, reservation)| ReservationEntry::new(mac, reservation))
        .collect();
    ReservationDiff { added, removed }
}
