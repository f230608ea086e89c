//! Rule-based device classification.
//!
//! Every device lands in exactly one of eight buckets keyed on its
//! `known`/`reserved`/`active` flags. A ninth rule, active devices still in
//! the unclassified group, may overlap any of them. Each rule carries the
//! action the next organize will take for the devices it matches.

use crate::device::{DeviceRecord, DeviceTable, UNCLASSIFIED};
use serde::Serialize;

pub const NOT_KNOWN_NOT_RESERVED_NOT_ACTIVE: &str = "not_known_not_reserved_not_active";
pub const NOT_KNOWN_NOT_RESERVED_ACTIVE: &str = "not_known_not_reserved_active";
pub const NOT_KNOWN_RESERVED_NOT_ACTIVE: &str = "not_known_reserved_not_active";
pub const NOT_KNOWN_RESERVED_ACTIVE: &str = "not_known_reserved_active";
pub const KNOWN_NOT_RESERVED_NOT_ACTIVE: &str = "known_not_reserved_not_active";
pub const KNOWN_NOT_RESERVED_ACTIVE: &str = "known_not_reserved_active";
pub const KNOWN_RESERVED_NOT_ACTIVE: &str = "known_reserved_not_active";
pub const KNOWN_RESERVED_ACTIVE: &str = "known_reserved_active";
pub const ACTIVE_UNCLASSIFIED: &str = "active_unclassified";

fn has_state(device: &DeviceRecord, known: bool, reserved: bool, active: bool) -> bool {
    device.known == known && device.reserved == reserved && device.active == active
}

/// Unknown device holding a reservation that has not been seen lately
///
/// Its reservation is dropped on the next organize.
pub fn is_retired(device: &DeviceRecord) -> bool {
    has_state(device, false, true, false)
}

pub fn is_active_unclassified(device: &DeviceRecord) -> bool {
    device.active && device.group == UNCLASSIFIED
}

/// A named predicate with its recommended action
#[derive(Clone)]
pub struct Rule {
    pub name: &'static str,
    /// Plain-language form of the predicate, used in reports
    pub query: &'static str,
    pub action: &'static str,
    /// Part of the eight-way partition on the device flags
    pub exclusive: bool,
    predicate: fn(&DeviceRecord) -> bool,
}

impl Rule {
    pub fn matches(&self, device: &DeviceRecord) -> bool {
        (self.predicate)(device)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("query", &self.query)
            .field("exclusive", &self.exclusive)
            .finish()
    }
}

/// The fixed, ordered rule catalogue
pub fn rule_catalogue() -> Vec<Rule> {
    vec![
        Rule {
            name: NOT_KNOWN_NOT_RESERVED_NOT_ACTIVE,
            query: "not known and not reserved and not active",
            action: "not seen recently; no action",
            exclusive: true,
            predicate: |d| has_state(d, false, false, false),
        },
        Rule {
            name: NOT_KNOWN_NOT_RESERVED_ACTIVE,
            query: "not known and not reserved and active",
            action: "new device; becomes unclassified on next organize",
            exclusive: true,
            predicate: |d| has_state(d, false, false, true),
        },
        Rule {
            name: NOT_KNOWN_RESERVED_NOT_ACTIVE,
            query: "not known and reserved and not active",
            action: "retired device; reservation removed on next organize",
            exclusive: true,
            predicate: is_retired,
        },
        Rule {
            name: NOT_KNOWN_RESERVED_ACTIVE,
            query: "not known and reserved and active",
            action: "becomes unclassified on next organize",
            exclusive: true,
            predicate: |d| has_state(d, false, true, true),
        },
        Rule {
            name: KNOWN_NOT_RESERVED_NOT_ACTIVE,
            query: "known and not reserved and not active",
            action: "reservation created on next organize",
            exclusive: true,
            predicate: |d| has_state(d, true, false, false),
        },
        Rule {
            name: KNOWN_NOT_RESERVED_ACTIVE,
            query: "known and not reserved and active",
            action: "current IP converted to static on next organize",
            exclusive: true,
            predicate: |d| has_state(d, true, false, true),
        },
        Rule {
            name: KNOWN_RESERVED_NOT_ACTIVE,
            query: "known and reserved and not active",
            action: "inactive; no action",
            exclusive: true,
            predicate: |d| has_state(d, true, true, false),
        },
        Rule {
            name: KNOWN_RESERVED_ACTIVE,
            query: "known and reserved and active",
            action: "normal state; no action",
            exclusive: true,
            predicate: |d| has_state(d, true, true, true),
        },
        Rule {
            name: ACTIVE_UNCLASSIFIED,
            query: "active and group == 'unclassified'",
            action: "should be classified before next organize",
            exclusive: false,
            predicate: is_active_unclassified,
        },
    ]
}

/// Devices matched by one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    pub rule: &'static str,
    pub query: &'static str,
    pub action: &'static str,
    pub device_names: Vec<String>,
}

/// Buckets the devices of a table by the rule catalogue
#[derive(Debug)]
pub struct DeviceClassifier {
    rules: Vec<Rule>,
    outcomes: Vec<RuleOutcome>,
}

impl Default for DeviceClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceClassifier {
    pub fn new() -> Self {
        let rules = rule_catalogue();
        let outcomes = rules
            .iter()
            .map(|rule| RuleOutcome {
                rule: rule.name,
                query: rule.query,
                action: rule.action,
                device_names: Vec::new(),
            })
            .collect();
        DeviceClassifier { rules, outcomes }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Evaluate every rule against the table, replacing earlier results
    pub fn run<T>(&mut self, table: &T)
    where
        T: DeviceTable + ?Sized,
    {
        for (rule, outcome) in self.rules.iter().zip(self.outcomes.iter_mut()) {
            outcome.device_names = table
                .select(&|d| rule.matches(d))
                .into_iter()
                .map(|d| d.name.clone())
                .collect();
        }
    }

    /// One entry per rule, in catalogue order
    pub fn report(&self) -> &[RuleOutcome] {
        &self.outcomes
    }

    pub fn outcome(&self, rule: &str) -> Option<&RuleOutcome> {
        self.outcomes.iter().find(|outcome| outcome.rule == rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceList;

    fn every_flag_combination() -> Vec<DeviceRecord> {
        let mut devices = Vec::new();
        for known in [false, true] {
            for reserved in [false, true] {
                for active in [false, true] {
                    let name = format!("k{}r{}a{}", known as u8, reserved as u8, active as u8);
                    devices.push(DeviceRecord::new(&name, &name).with_flags(known, reserved, active));
                }
            }
        }
        devices
    }

    #[test]
    fn test_catalogue_order_and_shape() {
        let rules = rule_catalogue();
        assert_eq!(rules.len(), 9);
        assert_eq!(rules.iter().filter(|r| r.exclusive).count(), 8);
        assert_eq!(rules[1].name, NOT_KNOWN_NOT_RESERVED_ACTIVE);
        assert_eq!(rules[8].name, ACTIVE_UNCLASSIFIED);
        assert_eq!(rules[2].action, "retired device; reservation removed on next organize");
    }

    #[test]
    fn test_exclusive_rules_partition_every_device() {
        let rules = rule_catalogue();
        for device in every_flag_combination() {
            let hits: Vec<_> = rules.iter().filter(|r| r.exclusive && r.matches(&device)).collect();
            assert_eq!(hits.len(), 1, "{} matched {:?}", device.name, hits);
        }
    }

    #[test]
    fn test_retired_device_matches_one_bucket() {
        let table = DeviceList::new(vec![DeviceRecord::new("aa", "old-tv").with_flags(false, true, false)]);
        let mut classifier = DeviceClassifier::new();
        classifier.run(&table);

        let matched: Vec<_> = classifier
            .report()
            .iter()
            .filter(|o| !o.device_names.is_empty())
            .map(|o| o.rule)
            .collect();
        assert_eq!(matched, vec![NOT_KNOWN_RESERVED_NOT_ACTIVE]);
    }

    #[test]
    fn test_active_unclassified_overlaps() {
        let table = DeviceList::new(vec![
            DeviceRecord::new("a", "tablet").with_flags(false, false, true),
            DeviceRecord::new("b", "nas").with_flags(true, true, true).with_group("servers"),
            DeviceRecord::new("c", "idle").with_flags(true, true, false),
        ]);
        let mut classifier = DeviceClassifier::new();
        classifier.run(&table);

        let unclassified = classifier.outcome(ACTIVE_UNCLASSIFIED).unwrap();
        assert_eq!(unclassified.device_names, vec!["tablet".to_string()]);
        let new_devices = classifier.outcome(NOT_KNOWN_NOT_RESERVED_ACTIVE).unwrap();
        assert_eq!(new_devices.device_names, vec!["tablet".to_string()]);
        let normal = classifier.outcome(KNOWN_RESERVED_ACTIVE).unwrap();
        assert_eq!(normal.device_names, vec!["nas".to_string()]);
    }

    #[test]
    fn test_run_replaces_previous_results() {
        let mut classifier = DeviceClassifier::new();
        classifier.run(&DeviceList::new(vec![DeviceRecord::new("a", "x").with_flags(true, true, true)]));
        classifier.run(&DeviceList::default());
        assert!(classifier.report().iter().all(|o| o.device_names.is_empty()));
    }
}
