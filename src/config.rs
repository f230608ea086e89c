use crate::utils::ip_utils::{is_private_net, parse_ipv4_net};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration for an organize run
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    pub network: NetworkConfig,
    /// Device table file (YAML, or JSON by extension)
    pub devices: PathBuf,
    #[serde(default)]
    pub reservations: ReservationsConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct GeneralConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// The managed subnet
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NetworkConfig {
    pub vlan_subnet: String,
}

/// Where reservation maps are read from and written to
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ReservationsConfig {
    /// Reservations currently in place; treated as empty when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<PathBuf>,
    /// Destination for the newly generated map
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

/// Layout of device name lists in the classification report
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReportConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_left_margin")]
    pub left_margin: usize,
}

fn default_width() -> usize {
    80
}

fn default_left_margin() -> usize {
    3
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            left_margin: default_left_margin(),
        }
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let subnet = parse_ipv4_net(&self.network.vlan_subnet).map_err(ValidationError::InvalidNetwork)?;
        if !is_private_net(&subnet) {
            return Err(ValidationError::InvalidNetwork(format!(
                "vlan_subnet {} must be in the private address space",
                subnet
            )));
        }

        if self.devices.as_os_str().is_empty() {
            return Err(ValidationError::InvalidDevices(
                "devices path cannot be empty".to_string(),
            ));
        }

        if self.report.width <= self.report.left_margin {
            return Err(ValidationError::InvalidReport(format!(
                "width ({}) must be greater than left_margin ({})",
                self.report.width, self.report.left_margin
            )));
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid network configuration: {0}")]
    InvalidNetwork(String),
    #[error("Invalid device table configuration: {0}")]
    InvalidDevices(String),
    #[error("Invalid report configuration: {0}")]
    InvalidReport(String),
}
