use crate::config::Config;
use crate::device::{normalize_mac, DeviceList, DeviceRecord};
use crate::reservation::ReservationMap;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use log::info;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Load and parse configuration from a YAML file
///
/// Relative `devices` and `reservations` paths are taken relative to the
/// directory holding the configuration file.
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;
    let mut config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?;

    config.validate()?;

    if let Some(base) = config_path.parent() {
        config.devices = resolve_relative(base, &config.devices);
        config.reservations.previous = config.reservations.previous.map(|p| resolve_relative(base, &p));
        config.reservations.output = config.reservations.output.map(|p| resolve_relative(base, &p));
    }

    Ok(config)
}

/// Read `general.log_level` without logging or validating anything
///
/// Used before the logger exists; any read or parse problem yields `None`
/// and is reported properly by [`load_config`] afterwards.
pub fn peek_log_level(config_path: &Path) -> Option<String> {
    let content = fs::read_to_string(config_path).ok()?;
    let value: serde_yaml::Value = serde_yaml::from_str(&content).ok()?;
    value.get("general")?.get("log_level")?.as_str().map(str::to_string)
}

fn resolve_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}

/// Load the device table from a YAML or JSON list of records
///
/// MAC addresses are normalised to lower-case colon form.
pub fn load_device_table(path: &Path) -> Result<DeviceList> {
    info!("Loading device table from: {:?}", path);

    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read device table '{}'", path.display()))?;
    let records: Vec<DeviceRecord> = if is_json(path) {
        serde_json::from_str(&content)
            .wrap_err_with(|| format!("Failed to parse device table '{}'", path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .wrap_err_with(|| format!("Failed to parse device table '{}'", path.display()))?
    };

    let mut table = DeviceList::new(records);
    table
        .normalize_macs()
        .map_err(|e| eyre!("Invalid device table '{}': {}", path.display(), e))?;

    info!("Loaded {} devices", table.len());
    Ok(table)
}

/// Load a reservation map (`{"<mac>": {"ip": ..., "name": ...}}`)
///
/// Keys are normalised the same way as device table MACs, so the map
/// compares cleanly against one generated from the table.
pub fn load_reservations(path: &Path) -> Result<ReservationMap> {
    info!("Loading fixed IP reservations from: {:?}", path);

    let file = File::open(path)
        .wrap_err_with(|| format!("Failed to open reservations '{}'", path.display()))?;
    let raw: ReservationMap = serde_json::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse reservations '{}'", path.display()))?;

    let mut reservations = ReservationMap::new();
    for (key, reservation) in raw {
        let mac = normalize_mac(&key).ok_or_else(|| {
            eyre!("Invalid reservations '{}': '{}' is not a MAC address", path.display(), key)
        })?;
        if reservations.insert(mac.clone(), reservation).is_some() {
            return Err(eyre!(
                "Invalid reservations '{}': more than one entry for MAC {}",
                path.display(),
                mac
            ));
        }
    }

    log::debug!("Loaded {} fixed IP reservations", reservations.len());
    Ok(reservations)
}

/// Write a reservation map as pretty-printed JSON
pub fn save_reservations(path: &Path, reservations: &ReservationMap) -> Result<()> {
    let json = serde_json::to_string_pretty(reservations)
        .wrap_err("Failed to serialize fixed IP reservations")?;

    fs::write(path, json)
        .wrap_err_with(|| format!("Failed to write reservations to {}", path.display()))?;

    info!("Fixed IP reservations written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceTable;
    use crate::reservation::Reservation;
    use std::io::Write;
    use std::net::Ipv4Addr;
    use tempfile::{Builder, NamedTempFile};

    #[test]
    fn test_load_config() {
        let yaml = r#"
network:
  vlan_subnet: "192.168.128.0/24"
devices: "devices.yaml"
"#;
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.network.vlan_subnet, "192.168.128.0/24");
    }

    #[test]
    fn test_load_config_runs_validation() {
        let yaml = r#"
network:
  vlan_subnet: "8.8.8.0/24"
devices: "devices.yaml"
"#;
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        assert!(load_config(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_yaml_device_table_normalises_macs() {
        let yaml = r#"
- mac: "AA-BB-CC-DD-EE-01"
  name: "printer"
  ip: "192.168.128.10"
  known: true
  reserved: true
"#;
        let mut temp_file = Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let table = load_device_table(temp_file.path()).unwrap();
        let records = table.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].mac, "aa:bb:cc:dd:ee:01");
        assert_eq!(records[0].ip, Some(Ipv4Addr::new(192, 168, 128, 10)));
    }

    #[test]
    fn test_load_json_device_table() {
        let json = r#"[{"mac": "aa:bb:cc:dd:ee:02", "name": "tv", "ip": "", "active": true}]"#;
        let mut temp_file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(temp_file, "{}", json).unwrap();

        let table = load_device_table(temp_file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.records()[0].active);
        assert!(!table.records()[0].has_ip());
    }

    #[test]
    fn test_load_device_table_rejects_bad_mac() {
        let yaml = r#"
- mac: "not-a-mac"
  name: "printer"
"#;
        let mut temp_file = Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        assert!(load_device_table(temp_file.path()).is_err());
    }

    #[test]
    fn test_reservations_save_then_load() {
        let mut reservations = ReservationMap::new();
        reservations.insert(
            "aa:bb:cc:dd:ee:01".to_string(),
            Reservation { ip: Ipv4Addr::new(192, 168, 128, 10), name: "printer".to_string() },
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reservations.json");
        save_reservations(&path, &reservations).unwrap();

        assert_eq!(load_reservations(&path).unwrap(), reservations);
    }

    #[test]
    fn test_load_controller_shaped_reservations() {
        let json = r#"{
  "aa:bb:cc:dd:ee:01": {"ip": "192.168.128.10", "name": "printer"},
  "aa:bb:cc:dd:ee:02": {"ip": "192.168.128.11", "name": "nas"}
}"#;
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", json).unwrap();

        let reservations = load_reservations(temp_file.path()).unwrap();
        assert_eq!(reservations.len(), 2);
        assert_eq!(reservations["aa:bb:cc:dd:ee:02"].name, "nas");
    }

    #[test]
    fn test_load_reservations_normalises_macs() {
        let json = r#"{
  "AA:BB:CC:DD:EE:01": {"ip": "192.168.128.10", "name": "printer"},
  "aa-bb-cc-dd-ee-02": {"ip": "192.168.128.11", "name": "nas"}
}"#;
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", json).unwrap();

        let reservations = load_reservations(temp_file.path()).unwrap();
        let macs: Vec<&str> = reservations.keys().map(String::as_str).collect();
        assert_eq!(macs, vec!["aa:bb:cc:dd:ee:01", "aa:bb:cc:dd:ee:02"]);
        assert_eq!(reservations["aa:bb:cc:dd:ee:01"].ip, Ipv4Addr::new(192, 168, 128, 10));
    }

    #[test]
    fn test_load_reservations_rejects_bad_key() {
        let json = r#"{"printer": {"ip": "192.168.128.10", "name": "printer"}}"#;
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", json).unwrap();

        let err = load_reservations(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("'printer' is not a MAC address"));
    }

    #[test]
    fn test_load_reservations_rejects_keys_for_same_mac() {
        let json = r#"{
  "AA:BB:CC:DD:EE:01": {"ip": "192.168.128.10", "name": "printer"},
  "aa:bb:cc:dd:ee:01": {"ip": "192.168.128.12", "name": "printer-2"}
}"#;
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", json).unwrap();

        let err = load_reservations(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("more than one entry for MAC aa:bb:cc:dd:ee:01"));
    }

    #[test]
    fn test_peek_log_level() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "general:\n  log_level: debug\ndevices: \"d.yaml\"\n").unwrap();
        assert_eq!(peek_log_level(temp_file.path()), Some("debug".to_string()));

        let mut without = NamedTempFile::new().unwrap();
        write!(without, "devices: \"d.yaml\"\n").unwrap();
        assert_eq!(peek_log_level(without.path()), None);

        let dir = tempfile::tempdir().unwrap();
        assert_eq!(peek_log_level(&dir.path().join("missing.yaml")), None);
    }

    #[test]
    fn test_config_paths_are_relative_to_config_file() {
        let yaml = r#"
network:
  vlan_subnet: "192.168.128.0/24"
devices: "devices.yaml"
reservations:
  previous: "state/reservations.json"
  output: "/var/lib/netorg/reservations.json"
"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("netorg.yaml");
        fs::write(&path, yaml).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.devices, dir.path().join("devices.yaml"));
        assert_eq!(config.reservations.previous, Some(dir.path().join("state/reservations.json")));
        assert_eq!(config.reservations.output, Some(PathBuf::from("/var/lib/netorg/reservations.json")));
    }
}
