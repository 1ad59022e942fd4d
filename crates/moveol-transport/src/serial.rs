//! ---
//! ems_section: "02-transport"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Byte sinks for telemetry lines."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::io::Write;

use moveol_common::config::SerialConfig;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::debug;

use crate::{Transport, TransportError};

/// Exclusively owned serial port, 8N1 without flow control.
///
/// The port is closed when the transport is dropped.
pub struct SerialTransport {
    name: String,
    port: Box<dyn SerialPort>,
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl SerialTransport {
    pub fn open(config: &SerialConfig) -> Result<Self, TransportError> {
        let port = serialport::new(config.port.as_str(), config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.timeout)
            .open()
            .map_err(|source| TransportError::PortOpen {
                port: config.port.clone(),
                source,
            })?;

        debug!(port = %config.port, baud_rate = config.baud_rate, timeout_ms = config.timeout.as_millis() as u64, "serial port opened");
        Ok(Self {
            name: config.port.clone(),
            port,
        })
    }
}

impl Transport for SerialTransport {
    fn port_name(&self) -> &str {
        &self.name
    }

    fn send(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        self.port
            .write_all(payload)
            .and_then(|()| self.port.flush())
            .map_err(|source| TransportError::Write {
                port: self.name.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_a_missing_device_is_a_port_open_error() {
        let config = SerialConfig {
            port: "/dev/moveol-no-such-device".into(),
            ..SerialConfig::default()
        };
        let err = SerialTransport::open(&config).unwrap_err();
        assert!(err.is_port_open());
        assert_eq!(err.port(), "/dev/moveol-no-such-device");
        assert!(err.to_string().contains("/dev/moveol-no-such-device"));
    }
}
