//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "01-bootstrap"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Simulation module exports and shared types."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
//! Turbine telemetry simulation: reading generation and the line-oriented
//! JSON encoding written to the serial link.

pub mod frames;
pub mod generator;
pub mod wire;

pub use frames::{round_to, Reading};
pub use generator::{SampleGenerator, TurbineProfile};
pub use wire::{encode_line, encode_payload};
