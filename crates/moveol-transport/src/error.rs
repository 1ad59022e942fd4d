//! ---
//! ems_section: "02-transport"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Byte sinks for telemetry lines."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use thiserror::Error;

/// Failures of a telemetry link.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The configured device could not be opened. Fatal; there is no reconnect.
    #[error("error opening serial port {port}: {source}")]
    PortOpen {
        port: String,
        #[source]
        source: serialport::Error,
    },

    /// A write failed after the port was opened.
    #[error("error writing to serial port {port}: {source}")]
    Write {
        port: String,
        #[source]
        source: std::io::Error,
    },
}

impl TransportError {
    /// Port identifier the failure relates to.
    pub fn port(&self) -> &str {
        match self {
            TransportError::PortOpen { port, .. } | TransportError::Write { port, .. } => port,
        }
    }

    pub fn is_port_open(&self) -> bool {
        matches!(self, TransportError::PortOpen { .. })
    }
}
