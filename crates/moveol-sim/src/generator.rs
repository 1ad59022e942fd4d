//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Randomized turbine reading generator."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use moveol_common::config::{SimulationConfig, MAX_FLOAT_SPREAD};
use rand::distributions::Uniform;
use rand::prelude::*;

use crate::frames::Reading;

/// Nominal operating point and uniform spread of each simulated quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurbineProfile {
    pub voltage_nominal: f64,
    pub voltage_spread: f64,
    pub current_nominal: f64,
    pub current_spread: f64,
    pub rpm_nominal: i64,
    pub rpm_spread: i64,
}

impl Default for TurbineProfile {
    fn default() -> Self {
        Self {
            voltage_nominal: 12.0,
            voltage_spread: 1.0,
            current_nominal: 2.0,
            current_spread: 0.5,
            rpm_nominal: 300,
            rpm_spread: 50,
        }
    }
}

impl From<&SimulationConfig> for TurbineProfile {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            voltage_nominal: config.voltage_nominal,
            voltage_spread: config.voltage_spread,
            current_nominal: config.current_nominal,
            current_spread: config.current_spread,
            rpm_nominal: config.rpm_nominal,
            rpm_spread: config.rpm_spread,
        }
    }
}

/// Produces independent uniformly perturbed readings around a [`TurbineProfile`].
///
/// Spreads are taken by magnitude; all ranges are inclusive at both ends. rpm
/// saturates at the `i64` bounds instead of overflowing.
#[derive(Debug)]
pub struct SampleGenerator {
    profile: TurbineProfile,
    rng: StdRng,
    voltage: Uniform<f64>,
    current: Uniform<f64>,
    rpm: Uniform<i64>,
}

impl SampleGenerator {
    /// A seeded generator replays the same sequence; `None` seeds from OS entropy.
    pub fn new(profile: TurbineProfile, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let voltage_spread = float_span(profile.voltage_spread);
        let current_spread = float_span(profile.current_spread);
        let rpm_spread = profile.rpm_spread.saturating_abs();
        Self {
            profile,
            rng,
            voltage: Uniform::new_inclusive(-voltage_spread, voltage_spread),
            current: Uniform::new_inclusive(-current_spread, current_spread),
            rpm: Uniform::new_inclusive(-rpm_spread, rpm_spread),
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(TurbineProfile::from(config), config.seed)
    }

    pub fn profile(&self) -> &TurbineProfile {
        &self.profile
    }

    pub fn sample(&mut self) -> Reading {
        let voltage_raw = self.profile.voltage_nominal + self.voltage.sample(&mut self.rng);
        let current_raw = self.profile.current_nominal + self.current.sample(&mut self.rng);
        let rpm = self
            .profile
            .rpm_nominal
            .saturating_add(self.rpm.sample(&mut self.rng));
        Reading::from_raw(voltage_raw, current_raw, rpm)
    }
}

/// Half-width of a float draw. Non-finite spreads collapse to zero and huge ones
/// are capped so the range width stays representable.
fn float_span(spread: f64) -> f64 {
    let spread = spread.abs();
    if spread.is_finite() {
        spread.min(MAX_FLOAT_SPREAD)
    } else {
        0.0
    }
}

impl Iterator for SampleGenerator {
    type Item = Reading;

    fn next(&mut self) -> Option<Reading> {
        Some(self.sample())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::round_to;

    #[test]
    fn power_is_rounded_product_of_raw_draws() {
        let profile = TurbineProfile::default();
        let mut generator = SampleGenerator::new(profile, Some(515));
        let mut rng = StdRng::seed_from_u64(515);
        let voltage = Uniform::new_inclusive(-1.0, 1.0);
        let current = Uniform::new_inclusive(-0.5, 0.5);
        let rpm = Uniform::new_inclusive(-50i64, 50);
        for reading in generator.by_ref().take(5_000) {
            let voltage_raw = profile.voltage_nominal + voltage.sample(&mut rng);
            let current_raw = profile.current_nominal + current.sample(&mut rng);
            let rpm_value = profile.rpm_nominal + rpm.sample(&mut rng);
            assert_eq!(reading.voltage, round_to(voltage_raw, 2));
            assert_eq!(reading.current, round_to(current_raw, 2));
            assert_eq!(reading.rpm, rpm_value);
            let expected_power = round_to(voltage_raw * current_raw, 2);
            assert!(
                (reading.power - expected_power).abs() < 1e-9,
                "{reading:?} vs {voltage_raw} * {current_raw}"
            );
        }
    }

    #[test]
    fn extreme_profile_samples_without_panicking() {
        let profile = TurbineProfile {
            voltage_spread: 1e308,
            current_spread: f64::NAN,
            rpm_nominal: i64::MAX,
            rpm_spread: i64::MIN,
            ..TurbineProfile::default()
        };
        let mut generator = SampleGenerator::new(profile, Some(8));
        for reading in generator.by_ref().take(64) {
            assert_eq!(reading.current, 2.0);
            assert!(reading.rpm >= 0, "{reading:?}");
        }
    }

    #[test]
    fn readings_stay_within_default_bounds() {
        let mut generator = SampleGenerator::new(TurbineProfile::default(), Some(42));
        for reading in generator.by_ref().take(10_000) {
            assert!((11.0..=13.0).contains(&reading.voltage), "{reading:?}");
            assert!((1.5..=2.5).contains(&reading.current), "{reading:?}");
            assert!((250..=350).contains(&reading.rpm), "{reading:?}");
            // Rounding the raw product can only move it by half a cent.
            assert!(reading.power >= 11.0 * 1.5 - 0.005);
            assert!(reading.power <= 13.0 * 2.5 + 0.005);
        }
    }

    #[test]
    fn same_seed_replays_sequence() {
        let first: Vec<Reading> = SampleGenerator::new(TurbineProfile::default(), Some(7))
            .take(32)
            .collect();
        let second: Vec<Reading> = SampleGenerator::new(TurbineProfile::default(), Some(7))
            .take(32)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn different_seeds_diverge() {
        let first: Vec<Reading> = SampleGenerator::new(TurbineProfile::default(), Some(1))
            .take(8)
            .collect();
        let second: Vec<Reading> = SampleGenerator::new(TurbineProfile::default(), Some(2))
            .take(8)
            .collect();
        assert_ne!(first, second);
    }

    #[test]
    fn rpm_covers_both_extremes() {
        let mut generator = SampleGenerator::new(TurbineProfile::default(), Some(99));
        let rpms: Vec<i64> = generator.by_ref().take(20_000).map(|r| r.rpm).collect();
        assert!(rpms.contains(&250));
        assert!(rpms.contains(&350));
    }

    #[test]
    fn zero_spread_is_constant() {
        let profile = TurbineProfile {
            voltage_spread: 0.0,
            current_spread: 0.0,
            rpm_spread: 0,
            ..TurbineProfile::default()
        };
        let mut generator = SampleGenerator::new(profile, None);
        let reading = generator.sample();
        assert_eq!(reading, Reading::from_raw(12.0, 2.0, 300));
        assert_eq!(reading.power, 24.0);
    }

    #[test]
    fn profile_follows_config() {
        let config = SimulationConfig {
            seed: Some(3),
            rpm_nominal: 1200,
            rpm_spread: 0,
            ..SimulationConfig::default()
        };
        let mut generator = SampleGenerator::from_config(&config);
        assert_eq!(generator.profile().rpm_nominal, 1200);
        assert_eq!(generator.sample().rpm, 1200);
    }
}
