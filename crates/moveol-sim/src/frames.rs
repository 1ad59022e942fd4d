//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Turbine reading model."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};

/// One simulated turbine sample. Field order is the wire key order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
    pub rpm: i64,
}

impl Reading {
    /// Build a reading from unrounded electrical values.
    ///
    /// Power is the product of the raw inputs, rounded afterwards. It is never
    /// recomputed from the rounded voltage and current.
    pub fn from_raw(voltage_raw: f64, current_raw: f64, rpm: i64) -> Self {
        let power_raw = voltage_raw * current_raw;
        Self {
            voltage: round_to(voltage_raw, 2),
            current: round_to(current_raw, 2),
            power: round_to(power_raw, 2),
            rpm,
        }
    }
}

/// Round to `places` decimal digits.
///
/// Rounds the exact binary value once, ties to even, so `1.115` (stored just
/// below the midpoint) becomes `1.11` and the exact tie `0.125` becomes `0.12`.
/// Scaling by `10^places` first would round twice and disagree on both.
pub fn round_to(value: f64, places: usize) -> f64 {
    format!("{value:.places$}").parse().unwrap_or(value)
}
