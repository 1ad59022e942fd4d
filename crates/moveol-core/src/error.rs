//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Transmitter lifecycle management."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use moveol_transport::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransmitError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to encode reading: {0}")]
    Encode(#[from] serde_json::Error),
}

impl TransmitError {
    /// True for the one recognized startup failure: the port could not be opened.
    pub fn is_port_open(&self) -> bool {
        matches!(self, TransmitError::Transport(err) if err.is_port_open())
    }
}
