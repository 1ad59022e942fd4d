//! ---
//! ems_section: "02-transport"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Byte sinks for telemetry lines."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Transports accept fully framed payload lines and push them to a device.
//!
//! [`SerialTransport`] drives a real port through `serialport`;
//! [`MemoryTransport`] records writes for tests and dry runs.

mod error;
mod memory;
mod serial;

pub use error::TransportError;
pub use memory::MemoryTransport;
pub use serial::SerialTransport;

/// Write side of a telemetry link.
pub trait Transport: Send {
    /// Human-readable identifier of the underlying device.
    fn port_name(&self) -> &str;

    /// Write the whole payload. Partial writes are reported as errors.
    fn send(&mut self, payload: &[u8]) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn port_name(&self) -> &str {
        (**self).port_name()
    }

    fn send(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        (**self).send(payload)
    }
}
