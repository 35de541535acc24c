//! Altitude Estimation Engine
//!
//! ## Pipeline
//!
//! Runs only while the barometer is present and monitoring is enabled. Every
//! loop tick contributes one raw reading; every sampling interval the readings
//! are reduced into one telemetry update:
//!
//! ```text
//! readings ──► PressureSampler ──► interval mean P
//!                                      │
//!                  calibrated? ── no ──┴─► pressure only
//!                      │ yes
//!                      ▼
//!   raw h = 44330·(1 - (P / baseline)^0.190295)
//!                      │
//!          StabilityMonitor ──► alpha ──► baseline ← baseline·(1-α) + P·α
//!                      │
//!               Kalman filter ──► dead-zone ──► telemetry.altitude
//! ```
//!
//! ## Drift Compensation
//!
//! Atmospheric pressure wanders by tens of pascals per hour, which is metres
//! of apparent altitude. Instead of requiring a recalibration before every
//! launch the baseline is continuously blended towards the live pressure,
//! quickly while the glider sits still and very slowly while it moves.

pub mod kalman;
pub mod sampler;
pub mod stability;

use serde::{Deserialize, Serialize};

use crate::calibration::{CalibrationData, CalibrationOutcome};
use crate::config::AltimeterConfig;
use crate::hal::Barometer;
use crate::status::SystemStatus;
use crate::time::{elapsed_ms, Timestamp};

pub use kalman::KalmanState;
pub use sampler::PressureSampler;
pub use stability::StabilityMonitor;

/// Latest telemetry, recomputed every sampling interval and never persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryData {
    /// Filtered height above the baseline (m)
    pub altitude: f32,
    /// Sensor temperature (°C)
    pub temperature: f32,
    /// Device has been at rest for the configured streak
    pub is_stable: bool,
    /// Interval-averaged pressure (Pa)
    pub pressure: f64,
}

/// Owns the sampler, filter, stability monitor and calibration data
#[derive(Debug, Clone)]
pub struct AltitudeEngine {
    config: AltimeterConfig,
    sampler: PressureSampler,
    kalman: KalmanState,
    stability: StabilityMonitor,
    calibration: CalibrationData,
    telemetry: TelemetryData,
    last_reduction: Timestamp,
}

impl AltitudeEngine {
    /// Engine with an empty baseline
    pub fn new(config: AltimeterConfig) -> Self {
        Self {
            kalman: KalmanState::new(
                config.process_noise,
                config.measurement_noise,
                config.initial_covariance,
            ),
            stability: StabilityMonitor::new(&config),
            sampler: PressureSampler::new(),
            calibration: CalibrationData::default(),
            telemetry: TelemetryData::default(),
            last_reduction: 0,
            config,
        }
    }

    /// Advance one loop tick
    ///
    /// Returns the new telemetry when this tick produced an altitude, `None`
    /// when it only accumulated, only refreshed pressure, or was skipped.
    pub fn update<B: Barometer>(
        &mut self,
        now: Timestamp,
        barometer: &mut B,
        status: &SystemStatus,
    ) -> Option<TelemetryData> {
        if !status.hardware_ok() || !status.monitoring() {
            return None;
        }

        self.sampler.add(barometer.read_pressure());

        if elapsed_ms(self.last_reduction, now) < self.config.sample_interval_ms {
            return None;
        }
        self.last_reduction = now;
        self.telemetry.pressure = self.sampler.drain_average();

        if !status.calibrated() || self.calibration.adaptive_baseline <= 0.0 {
            return None;
        }

        let pressure = self.telemetry.pressure;
        let raw_altitude = self.raw_altitude(pressure);

        let alpha = self.stability.process(raw_altitude);
        self.calibration.blend_baseline(pressure, alpha);

        let filtered = kalman::update(&mut self.kalman, raw_altitude);
        self.telemetry.altitude = apply_dead_zone(filtered, self.config.dead_zone);
        self.telemetry.temperature = barometer.read_temperature();
        self.telemetry.is_stable = self.stability.is_stable();

        Some(self.telemetry)
    }

    /// Barometric height of `pressure` above the current adaptive baseline
    pub fn raw_altitude(&self, pressure: f64) -> f32 {
        let ratio = pressure / self.calibration.adaptive_baseline;
        let scale = 1.0 - libm::pow(ratio, f64::from(self.config.altitude_exponent));
        self.config.altitude_factor * scale as f32
    }

    /// Install the result of a completed calibration or re-zero
    pub fn apply(&mut self, outcome: CalibrationOutcome) {
        match outcome {
            CalibrationOutcome::Calibrated { base_pressure } => {
                self.calibration.apply_calibration(base_pressure);
            }
            CalibrationOutcome::Zeroed { baseline } => {
                self.calibration.apply_zero(baseline);
                self.stability.reset();
            }
        }
        // Readings taken against the old baseline never reach the new one
        self.sampler.drain_average();
        self.kalman.reset_estimate();
    }

    /// Restart the filter from zero (after loading a stored baseline)
    pub fn reset_filter(&mut self) {
        self.kalman.reset_estimate();
    }

    /// Latest telemetry
    pub fn telemetry(&self) -> &TelemetryData {
        &self.telemetry
    }

    /// Baseline and persisted pressure
    pub fn calibration(&self) -> &CalibrationData {
        &self.calibration
    }

    /// Mutable access for the persistence boundary
    pub fn calibration_mut(&mut self) -> &mut CalibrationData {
        &mut self.calibration
    }

    /// Stability classifier
    pub fn stability(&self) -> &StabilityMonitor {
        &self.stability
    }

    /// Filter state
    pub fn kalman(&self) -> &KalmanState {
        &self.kalman
    }
}

/// Snap values within `dead_zone` of zero to exactly zero
pub fn apply_dead_zone(altitude: f32, dead_zone: f32) -> f32 {
    if libm::fabsf(altitude) < dead_zone {
        0.0
    } else {
        altitude
    }
}
