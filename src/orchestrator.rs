//! Organize orchestrator.
//!
//! Runs the pieces in the order that keeps the invariants intact: map the
//! device table onto the subnet, classify the (possibly updated) table,
//! generate the new reservation map and compare it with the previous one.

use crate::classify::{DeviceClassifier, RuleOutcome};
use crate::config::Config;
use crate::config_loader::{load_device_table, load_reservations, save_reservations};
use crate::device::DeviceTable;
use crate::ip::{AddressSpace, MappingSummary, NetworkMapper};
use crate::report;
use crate::reservation::{self, ReservationDiff, ReservationMap};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;

/// Switches for a run that come from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizeOptions {
    /// Classify and report only; no mapping and no reservations
    pub scan_only: bool,
    /// Do everything except writing the new reservation map
    pub dry_run: bool,
}

/// Everything an organize run produced
#[derive(Debug, Clone)]
pub struct OrganizeSummary {
    pub percent_used: f64,
    pub mapping: MappingSummary,
    pub classification: Vec<RuleOutcome>,
    pub reservations: ReservationMap,
    pub diff: ReservationDiff,
}

/// Classify the table without touching any address
pub fn scan<T>(table: &T) -> Vec<RuleOutcome>
where
    T: DeviceTable + ?Sized,
{
    let mut classifier = DeviceClassifier::new();
    classifier.run(table);
    classifier.report().to_vec()
}

/// The in-memory organize pipeline
///
/// Writes newly assigned addresses into `table`. A fresh address space is
/// built for `vlan_subnet` and dropped afterwards.
pub fn organize<T>(table: &mut T, vlan_subnet: &str, previous: &ReservationMap) -> Result<OrganizeSummary>
where
    T: DeviceTable + ?Sized,
{
    let space = AddressSpace::new(vlan_subnet)
        .wrap_err_with(|| format!("Cannot build address space for {}", vlan_subnet))?;
    let mut mapper = NetworkMapper::new(space);
    let mapping = mapper.map_to_space(&mut *table)?;
    let percent_used = mapper.percent_used();

    let classification = scan(&*table);
    let reservations = reservation::generate_reservations(&*table);
    let diff = reservation::diff(previous, &reservations);

    Ok(OrganizeSummary {
        percent_used,
        mapping,
        classification,
        reservations,
        diff,
    })
}

/// Run an organize from configuration: load inputs, report, write the new map
///
/// Returns `None` for a scan-only run.
pub fn run(config: &Config, options: &OrganizeOptions) -> Result<Option<OrganizeSummary>> {
    let mut table = load_device_table(&config.devices)?;

    if options.scan_only {
        info!("Scan only: classifying {} devices", table.len());
        report::log_lines(&report::classification_lines(&scan(&table), &config.report));
        return Ok(None);
    }

    let previous = match &config.reservations.previous {
        Some(path) => load_reservations(path)?,
        None => {
            info!("No previous reservations configured; treating as empty");
            ReservationMap::new()
        }
    };

    let summary = organize(&mut table, &config.network.vlan_subnet, &previous)?;

    info!(
        "Mapped device table: {} addresses already held, {} newly assigned",
        summary.mapping.reserved,
        summary.mapping.assigned.len()
    );
    info!("{}", report::utilization_line(summary.percent_used));
    report::log_lines(&report::classification_lines(&summary.classification, &config.report));
    report::log_lines(&report::diff_lines(&summary.diff));

    match (&config.reservations.output, options.dry_run) {
        (Some(_), true) => info!("Dry run: new fixed IP reservations not written"),
        (Some(path), false) => save_reservations(path, &summary.reservations)?,
        (None, _) => info!("No reservations output configured; nothing written"),
    }

    Ok(Some(summary))
}
