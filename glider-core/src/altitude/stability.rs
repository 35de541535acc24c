//! Rest/motion classification for baseline drift compensation
//!
//! The adaptive baseline must follow genuine atmospheric drift, but a launch
//! or a hand-carried climb must not be absorbed into it. The monitor counts
//! consecutive near-identical altitude samples and picks a fast blend
//! coefficient only after the device has been still for a while.

use crate::config::AltimeterConfig;

/// Counts consecutive stable altitude samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityMonitor {
    last_raw_altitude: f32,
    stable_readings: u32,
    threshold: f32,
    stable_count: u32,
    alpha_stable: f64,
    alpha_moving: f64,
}

impl StabilityMonitor {
    /// Monitor tuned from the altimeter config
    pub fn new(config: &AltimeterConfig) -> Self {
        Self {
            last_raw_altitude: 0.0,
            stable_readings: 0,
            threshold: config.stability_threshold,
            stable_count: config.stable_count,
            alpha_stable: config.alpha_stable,
            alpha_moving: config.alpha_moving,
        }
    }

    /// Classify one raw altitude sample and return the baseline blend coefficient
    pub fn process(&mut self, raw_altitude: f32) -> f64 {
        let change = libm::fabsf(raw_altitude - self.last_raw_altitude);
        self.stable_readings = if change < self.threshold {
            self.stable_readings.saturating_add(1)
        } else {
            0
        };
        self.last_raw_altitude = raw_altitude;

        if self.is_stable() {
            self.alpha_stable
        } else {
            self.alpha_moving
        }
    }

    /// More than `stable_count` consecutive stable samples
    pub fn is_stable(&self) -> bool {
        self.stable_readings > self.stable_count
    }

    /// Consecutive stable samples so far
    pub fn stable_readings(&self) -> u32 {
        self.stable_readings
    }

    /// Forget the stable streak (after a re-zero)
    pub fn reset(&mut self) {
        self.stable_readings = 0;
    }
}

impl Default for StabilityMonitor {
    fn default() -> Self {
        Self::new(&AltimeterConfig::default())
    }
}
