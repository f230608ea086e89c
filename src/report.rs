//! Human-readable reports.
//!
//! Renders the results of an organize run as text lines, which the binary
//! emits through the logger.

use crate::classify::RuleOutcome;
use crate::config::ReportConfig;
use crate::reservation::{ReservationDiff, ReservationEntry};
use crate::utils::columns::adaptive_columnize;

pub fn utilization_line(percent_used: f64) -> String {
    format!("Network space is {:.2}% full", percent_used)
}

/// One block per rule: the match count, the action and the device names
pub fn classification_lines(outcomes: &[RuleOutcome], layout: &ReportConfig) -> Vec<String> {
    let mut lines = Vec::new();
    for outcome in outcomes {
        if outcome.device_names.is_empty() {
            lines.push(format!("Did not find any devices that are: {}", outcome.query));
            continue;
        }
        lines.push(format!(
            "Found {} device(s) that are: {}",
            outcome.device_names.len(),
            outcome.query
        ));
        lines.push(outcome.action.to_string());
        lines.extend(adaptive_columnize(&outcome.device_names, layout.width, layout.left_margin));
    }
    lines
}

fn entry_line(entry: &ReservationEntry) -> String {
    format!("    {} for device {} named {}", entry.ip, entry.mac, entry.name)
}

pub fn diff_lines(diff: &ReservationDiff) -> Vec<String> {
    if diff.is_empty() {
        return vec!["There are no changes to fixed IP reservations".to_string()];
    }

    let mut lines = vec!["Fixed IP reservation differences are as follows:".to_string()];
    if diff.added.is_empty() {
        lines.push("  There are no new fixed IP reservations".to_string());
    } else {
        lines.push("  Adding reservations:".to_string());
        lines.extend(diff.added.iter().map(entry_line));
    }
    if !diff.removed.is_empty() {
        lines.push("  Removing reservations:".to_string());
        lines.extend(diff.removed.iter().map(entry_line));
    }
    lines
}

/// Emit report lines at info level
pub fn log_lines(lines: &[String]) {
    for line in lines {
        log::info!("{}", line);
    }
}
