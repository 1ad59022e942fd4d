//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Shared primitives and utilities for the sender runtime."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use tracing::debug;

use crate::logging::LogFormat;

#[cfg(windows)]
fn default_port() -> String {
    "COM3".to_owned()
}

#[cfg(not(windows))]
fn default_port() -> String {
    "/dev/rfcomm0".to_owned()
}

fn default_baud_rate() -> u32 {
    9600
}

fn default_port_timeout() -> Duration {
    Duration::from_secs(1)
}

fn default_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_settle_delay() -> Duration {
    Duration::from_secs(2)
}

fn default_voltage_nominal() -> f64 {
    12.0
}

fn default_voltage_spread() -> f64 {
    1.0
}

fn default_current_nominal() -> f64 {
    2.0
}

fn default_current_spread() -> f64 {
    0.5
}

fn default_rpm_nominal() -> i64 {
    300
}

fn default_rpm_spread() -> i64 {
    50
}

fn default_log_format() -> LogFormat {
    LogFormat::Operator
}

/// Primary configuration object for the sender.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub transmit: TransmitConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
///
/// `source` is `None` when no file was found and the compiled-in defaults apply.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    pub source: Option<PathBuf>,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &'static str = "MOVEOL_CONFIG";

    /// Load configuration from disk, respecting the `MOVEOL_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration together with the effective source path.
    ///
    /// An explicit `MOVEOL_CONFIG` path must exist. Missing candidates are skipped, and
    /// when none exist the defaults are returned.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        for candidate in candidates {
            let path = candidate.as_ref();
            if path.exists() {
                let config = Self::from_path(path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path.to_path_buf()),
                });
            }
        }

        debug!(
            inspected = %candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            "no configuration file found; using built-in defaults"
        );
        Ok(LoadedAppConfig {
            config: Self::default(),
            source: None,
        })
    }

    fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<AppConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.serial.validate()?;
        self.transmit.validate()?;
        self.simulation.validate()?;
        Ok(())
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Serial link settings. Static for the life of the process.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerialConfig {
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    #[serde(default = "default_port_timeout", rename = "timeout_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud_rate: default_baud_rate(),
            timeout: default_port_timeout(),
        }
    }
}

impl SerialConfig {
    pub fn validate(&self) -> Result<()> {
        if self.port.trim().is_empty() {
            return Err(anyhow!("serial.port must not be empty"));
        }
        if self.baud_rate == 0 {
            return Err(anyhow!("serial.baud_rate must be greater than zero"));
        }
        Ok(())
    }
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransmitConfig {
    #[serde(default = "default_interval", rename = "interval_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub interval: Duration,
    /// Pause after opening the port; many boards reset when a host connects.
    #[serde(default = "default_settle_delay", rename = "settle_delay_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub settle_delay: Duration,
    /// Stop after this many frames. Unbounded when absent.
    #[serde(default)]
    pub max_frames: Option<u64>,
}

impl Default for TransmitConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            settle_delay: default_settle_delay(),
            max_frames: None,
        }
    }
}

impl TransmitConfig {
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(anyhow!("transmit.interval_ms must be greater than zero"));
        }
        if self.max_frames == Some(0) {
            return Err(anyhow!("transmit.max_frames must be greater than zero when set"));
        }
        Ok(())
    }
}

/// Largest voltage/current spread a uniform draw over `[-spread, spread]` can cover
/// without its width overflowing `f64`.
pub const MAX_FLOAT_SPREAD: f64 = f64::MAX / 4.0;

/// Nominal values and symmetric spreads for the simulated turbine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_voltage_nominal")]
    pub voltage_nominal: f64,
    #[serde(default = "default_voltage_spread")]
    pub voltage_spread: f64,
    #[serde(default = "default_current_nominal")]
    pub current_nominal: f64,
    #[serde(default = "default_current_spread")]
    pub current_spread: f64,
    #[serde(default = "default_rpm_nominal")]
    pub rpm_nominal: i64,
    #[serde(default = "default_rpm_spread")]
    pub rpm_spread: i64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            voltage_nominal: default_voltage_nominal(),
            voltage_spread: default_voltage_spread(),
            current_nominal: default_current_nominal(),
            current_spread: default_current_spread(),
            rpm_nominal: default_rpm_nominal(),
            rpm_spread: default_rpm_spread(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("voltage_nominal", self.voltage_nominal),
            ("voltage_spread", self.voltage_spread),
            ("current_nominal", self.current_nominal),
            ("current_spread", self.current_spread),
        ] {
            if !value.is_finite() {
                return Err(anyhow!("simulation.{} must be finite", name));
            }
        }
        if self.voltage_spread < 0.0 || self.current_spread < 0.0 || self.rpm_spread < 0 {
            return Err(anyhow!("simulation spreads must not be negative"));
        }
        for (name, nominal, spread) in [
            ("voltage", self.voltage_nominal, self.voltage_spread),
            ("current", self.current_nominal, self.current_spread),
        ] {
            if spread > MAX_FLOAT_SPREAD
                || !(nominal + spread).is_finite()
                || !(nominal - spread).is_finite()
            {
                return Err(anyhow!(
                    "simulation.{name}_nominal +/- {name}_spread is out of range"
                ));
            }
        }
        if self.rpm_nominal.checked_add(self.rpm_spread).is_none()
            || self.rpm_nominal.checked_sub(self.rpm_spread).is_none()
        {
            return Err(anyhow!(
                "simulation.rpm_nominal +/- rpm_spread overflows a 64-bit integer"
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    /// Directory for the rolling JSON log file. No file is written when absent.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
            directory: None,
            file_prefix: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_the_reference_link() {
        let config = AppConfig::default();
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.serial.timeout, Duration::from_secs(1));
        assert_eq!(config.transmit.interval, Duration::from_secs(1));
        assert_eq!(config.transmit.settle_delay, Duration::from_secs(2));
        assert_eq!(config.transmit.max_frames, None);
        assert_eq!(config.simulation.rpm_spread, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_partial_toml() {
        let config: AppConfig = r#"
            [serial]
            port = "/dev/ttyUSB0"

            [transmit]
            interval_ms = 250
            max_frames = 3

            [logging]
            format = "structured-json"
        "#
        .parse()
        .unwrap();
        assert_eq!(config.serial.port, "/dev/ttyUSB0");
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.transmit.interval, Duration::from_millis(250));
        assert_eq!(config.transmit.max_frames, Some(3));
        assert_eq!(config.logging.format, LogFormat::StructuredJson);
        assert_eq!(config.simulation, SimulationConfig::default());
    }

    #[test]
    fn rejects_zero_baud() {
        let result = "[serial]\nbaud_rate = 0\n".parse::<AppConfig>();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_zero_interval() {
        let result = "[transmit]\ninterval_ms = 0\n".parse::<AppConfig>();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_negative_spread() {
        let result = "[simulation]\nvoltage_spread = -1.0\n".parse::<AppConfig>();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_spread_too_wide_to_sample() {
        let result = "[simulation]\nvoltage_spread = 1e308\n".parse::<AppConfig>();
        assert!(result.is_err());
        let result = "[simulation]\ncurrent_spread = 1e308\n".parse::<AppConfig>();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_nominal_plus_spread_overflowing_f64() {
        let result = "[simulation]\nvoltage_nominal = 1.7e308\nvoltage_spread = 1e307\n"
            .parse::<AppConfig>();
        assert!(result.is_err());
        let result = "[simulation]\ncurrent_nominal = -1.7e308\ncurrent_spread = 1e307\n"
            .parse::<AppConfig>();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_rpm_range_overflowing_i64() {
        let config = AppConfig {
            simulation: SimulationConfig {
                rpm_nominal: i64::MAX,
                ..SimulationConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            simulation: SimulationConfig {
                rpm_nominal: i64::MIN + 10,
                rpm_spread: 50,
                ..SimulationConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn accepts_wide_but_representable_ranges() {
        let config = AppConfig {
            simulation: SimulationConfig {
                voltage_spread: 1e100,
                rpm_nominal: 0,
                rpm_spread: i64::MAX,
                ..SimulationConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_with_source_picks_first_existing_candidate() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[serial]\nport = \"COM7\"\nbaud_rate = 115200").unwrap();
        file.flush().unwrap();
        let missing = PathBuf::from("definitely/not/here.toml");
        let loaded =
            AppConfig::load_with_source(&[missing, file.path().to_path_buf()]).unwrap();
        assert_eq!(loaded.config.serial.port, "COM7");
        assert_eq!(loaded.config.serial.baud_rate, 115200);
        assert_eq!(loaded.source.as_deref(), Some(file.path()));
    }

    #[test]
    fn load_with_source_falls_back_to_defaults() {
        let loaded = AppConfig::load_with_source(&["definitely/not/here.toml"]).unwrap();
        assert!(loaded.source.is_none());
        assert_eq!(loaded.config.serial, SerialConfig::default());
    }
}
