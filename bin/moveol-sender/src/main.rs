//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "binary"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Binary entrypoint for the MovEol sender."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::{ArgAction, Parser};
use moveol_common::config::AppConfig;
use moveol_common::logging::{flush_tracing, init_tracing, LogFormat};
use moveol_common::version::VersionInfo;
use moveol_core::{run_serial, RunSummary, TransmitError};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const DEFAULT_CONFIG_CANDIDATES: &[&str] = &["configs/moveol.toml", "moveol.toml"];

#[derive(Debug, Parser)]
#[command(
    author,
    disable_version_flag = true,
    version,
    about = "Stream simulated wind-turbine telemetry over a serial link",
    long_about = None
)]
struct Cli {
    #[arg(long, value_name = "FILE", help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "PORT", help = "Serial port to write to (e.g. COM3, /dev/rfcomm0)")]
    port: Option<String>,

    #[arg(long, value_name = "BAUD", help = "Baud rate")]
    baud: Option<u32>,

    #[arg(long, help = "Seed for a reproducible reading sequence")]
    seed: Option<u64>,

    #[arg(long, value_name = "FRAMES", help = "Stop after sending this many frames")]
    count: Option<u64>,

    #[arg(long, value_name = "MS", help = "Milliseconds between frames")]
    interval_ms: Option<u64>,

    #[arg(long, value_name = "FORMAT", help = "Console log format: operator, pretty, structured-json")]
    log_format: Option<LogFormat>,

    #[arg(
        short = 'V',
        long = "version",
        action = ArgAction::SetTrue,
        help = "Print extended version information and exit"
    )]
    version: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let version = VersionInfo::current();
    if cli.version {
        println!("{}", version.extended());
        return ExitCode::SUCCESS;
    }

    let (config, source) = match load_config(&cli) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("configuration error: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_tracing("moveol-sender", &config.logging) {
        eprintln!("failed to initialise logging: {err:#}");
        return ExitCode::FAILURE;
    }
    debug!(
        banner = %version.banner(),
        config_path = ?source,
        port = %config.serial.port,
        baud_rate = config.serial.baud_rate,
        "configuration loaded"
    );

    let code = match run_sender(&config).await {
        Ok(summary) => {
            debug!(frames_sent = summary.frames_sent, reason = %summary.reason, "sender stopped");
            ExitCode::SUCCESS
        }
        Err(err) => {
            // Already reported on the operator log by the transmitter.
            debug!(error = %err, port_open = err.is_port_open(), "sender failed");
            ExitCode::FAILURE
        }
    };
    flush_tracing();
    code
}

/// Resolve configuration: explicit `--config`, then `MOVEOL_CONFIG`, then the default
/// candidates, then built-in defaults. CLI flags are applied last.
fn load_config(cli: &Cli) -> Result<(AppConfig, Option<PathBuf>)> {
    let mut candidates = Vec::new();
    if let Some(path) = &cli.config {
        if !path.exists() {
            bail!("config file {} does not exist", path.display());
        }
        candidates.push(path.clone());
    }
    candidates.extend(DEFAULT_CONFIG_CANDIDATES.iter().map(PathBuf::from));

    let loaded = AppConfig::load_with_source(&candidates)?;
    let mut config = loaded.config;
    apply_overrides(&mut config, cli);
    config.validate()?;
    Ok((config, loaded.source))
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(port) = &cli.port {
        config.serial.port = port.clone();
    }
    if let Some(baud) = cli.baud {
        config.serial.baud_rate = baud;
    }
    if let Some(seed) = cli.seed {
        config.simulation.seed = Some(seed);
    }
    if let Some(count) = cli.count {
        config.transmit.max_frames = Some(count);
    }
    if let Some(interval_ms) = cli.interval_ms {
        config.transmit.interval = std::time::Duration::from_millis(interval_ms);
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
}

async fn run_sender(config: &AppConfig) -> Result<RunSummary, TransmitError> {
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let signal_tx = shutdown_tx.clone();
    let signal_task = tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("ctrl-c received; shutting down");
                let _ = signal_tx.send(());
            }
            Err(err) => warn!(error = %err, "unable to listen for ctrl-c"),
        }
    });

    let result = run_serial(config, shutdown_rx).await;
    signal_task.abort();
    drop(shutdown_tx);
    result
}
