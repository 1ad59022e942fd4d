//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Shared primitives and utilities for the sender runtime."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Shared primitives for the MovEol workspace: configuration loading,
//! tracing initialisation, and build version metadata.

pub mod config;
pub mod logging;
pub mod version;

pub use config::{
    AppConfig, LoadedAppConfig, LoggingConfig, SerialConfig, SimulationConfig, TransmitConfig,
};
pub use logging::{flush_tracing, init_tracing, LogFormat};
pub use version::VersionInfo;
