//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Transmitter lifecycle management."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Transmitter runtime: opens the link once, then streams one simulated
//! reading per interval until cancelled.

pub mod error;
pub mod transmitter;

pub use error::TransmitError;
pub use transmitter::{
    run_serial, RunSummary, SentFrame, StopReason, Transmitter, TransmitterState, PORT_HINT,
};
