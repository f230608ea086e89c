use clap::Parser;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use netorg::config_loader;
use netorg::orchestrator::{self, OrganizeOptions};

/// Keeps DHCP fixed-IP reservations in step with the device inventory
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the netorg configuration YAML file
    #[arg(short, long)]
    config: PathBuf,

    /// Device table file, overriding `devices` in the configuration
    #[arg(long)]
    devices: Option<PathBuf>,

    /// Reservations currently in place (JSON), overriding the configuration
    #[arg(long)]
    previous: Option<PathBuf>,

    /// Where to write the new reservations (JSON), overriding the configuration
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Classify and report only; no addresses or reservations are computed
    #[arg(long, conflicts_with = "dry_run")]
    scan_only: bool,

    /// Compute and report everything but do not write the new reservations
    #[arg(long)]
    dry_run: bool,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // Initialize logging before anything is loaded
    let level = default_log_level(args.log_level.clone(), || config_loader::peek_log_level(&args.config));
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    info!("Starting netorg");

    let mut config = config_loader::load_config(&args.config)?;

    if let Some(devices) = args.devices {
        config.devices = devices;
    }
    if let Some(previous) = args.previous {
        config.reservations.previous = Some(previous);
    }
    if let Some(output) = args.output {
        config.reservations.output = Some(output);
    }

    let options = OrganizeOptions {
        scan_only: args.scan_only,
        dry_run: args.dry_run,
    };
    orchestrator::run(&config, &options)?;

    info!("Organize completed successfully");
    Ok(())
}

/// `--log-level`, then `general.log_level` from the configuration, then info
///
/// RUST_LOG still overrides whatever this returns.
fn default_log_level<F>(cli: Option<String>, from_config: F) -> String
where
    F: FnOnce() -> Option<String>,
{
    cli.or_else(from_config).unwrap_or_else(|| "info".to_string())
}
