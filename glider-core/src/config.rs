//! Runtime configuration
//!
//! Every subsystem takes its tuning from one of these value objects instead of
//! reading constants directly, so a bench test can shorten the warm-up or a
//! different sensor can get different filter noise without touching the
//! state machines. Defaults reproduce the values in [`constants`](crate::constants).
//!
//! ```rust
//! use glider_core::{AltimeterConfig, CalibrationTiming, FlightConfig};
//!
//! // Bench profile: quick warm-up, heavier filtering
//! let config = FlightConfig {
//!     altimeter: AltimeterConfig::default().with_kalman_noise(0.02, 0.5),
//!     calibration: CalibrationTiming::default().with_warmup_ms(1_000),
//!     ..FlightConfig::default()
//! };
//! assert_eq!(config.calibration.warmup_ms, 1_000);
//! ```

use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::constants::{altitude, calibration, gestures};
use crate::errors::ConfigError;

/// Altitude engine tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AltimeterConfig {
    /// Interval between telemetry reductions (ms)
    pub sample_interval_ms: u64,
    /// Barometric formula scale (m)
    pub altitude_factor: f32,
    /// Barometric formula exponent
    pub altitude_exponent: f32,
    /// Max sample-to-sample change counted as stable (m)
    pub stability_threshold: f32,
    /// Consecutive stable samples before reporting stable
    pub stable_count: u32,
    /// Baseline blend coefficient at rest
    pub alpha_stable: f64,
    /// Baseline blend coefficient in motion
    pub alpha_moving: f64,
    /// Dead-zone half-width around zero (m)
    pub dead_zone: f32,
    /// Kalman process noise `q`
    pub process_noise: f32,
    /// Kalman measurement noise `r`
    pub measurement_noise: f32,
    /// Kalman initial covariance `p`
    pub initial_covariance: f32,
}

impl Default for AltimeterConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: altitude::SAMPLE_INTERVAL_MS,
            altitude_factor: altitude::ALTITUDE_FACTOR_M,
            altitude_exponent: altitude::ALTITUDE_EXPONENT,
            stability_threshold: altitude::STABILITY_THRESHOLD_M,
            stable_count: altitude::STABLE_COUNT_THRESHOLD,
            alpha_stable: altitude::BASELINE_ALPHA_STABLE,
            alpha_moving: altitude::BASELINE_ALPHA_MOVING,
            dead_zone: altitude::DEAD_ZONE_M,
            process_noise: altitude::KALMAN_PROCESS_NOISE,
            measurement_noise: altitude::KALMAN_MEASUREMENT_NOISE,
            initial_covariance: altitude::KALMAN_INITIAL_COVARIANCE,
        }
    }
}

impl AltimeterConfig {
    /// Set filter noise (higher `q` = faster response, higher `r` = smoother)
    pub fn with_kalman_noise(mut self, process: f32, measurement: f32) -> Self {
        self.process_noise = process;
        self.measurement_noise = measurement;
        self
    }

    /// Set the telemetry reduction interval
    pub fn with_sample_interval_ms(mut self, interval_ms: u64) -> Self {
        self.sample_interval_ms = interval_ms;
        self
    }

    /// Set the dead-zone half-width
    pub fn with_dead_zone(mut self, dead_zone: f32) -> Self {
        self.dead_zone = dead_zone;
        self
    }
}

/// Calibration state machine timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationTiming {
    /// Thermal stabilization length (ms)
    pub warmup_ms: u64,
    /// Sensor poll period during warm-up (ms)
    pub warmup_poll_ms: u64,
    /// Samples in a full calibration
    pub measuring_samples: u32,
    /// Spacing of full-calibration samples (ms)
    pub measuring_interval_ms: u64,
    /// Samples in a re-zero
    pub zeroing_samples: u32,
}

impl Default for CalibrationTiming {
    fn default() -> Self {
        Self {
            warmup_ms: calibration::WARMUP_DURATION_MS,
            warmup_poll_ms: calibration::WARMUP_POLL_MS,
            measuring_samples: calibration::MEASURING_SAMPLES,
            measuring_interval_ms: calibration::MEASURING_INTERVAL_MS,
            zeroing_samples: calibration::ZEROING_SAMPLES,
        }
    }
}

impl CalibrationTiming {
    /// Override the warm-up length
    pub fn with_warmup_ms(mut self, warmup_ms: u64) -> Self {
        self.warmup_ms = warmup_ms;
        self
    }

    /// Override the sample counts; zero is bumped to one
    pub fn with_samples(mut self, measuring: u32, zeroing: u32) -> Self {
        self.measuring_samples = measuring.max(1);
        self.zeroing_samples = zeroing.max(1);
        self
    }
}

/// Hall button timing thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureTiming {
    /// Shortest press counted as a click (ms)
    pub debounce_ms: u64,
    /// Hold length of a long press (ms)
    pub long_press_ms: u64,
    /// Quiet window closing a click sequence (ms)
    pub double_click_ms: u64,
}

impl Default for GestureTiming {
    fn default() -> Self {
        Self {
            debounce_ms: gestures::DEBOUNCE_MS,
            long_press_ms: gestures::LONG_PRESS_MS,
            double_click_ms: gestures::DOUBLE_CLICK_MS,
        }
    }
}

/// Board pin assignment, remappable without reflashing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinConfig {
    /// Hall sensor input
    pub hall: u8,
    /// Status LED
    pub led: u8,
    /// I2C data
    pub sda: u8,
    /// I2C clock
    pub scl: u8,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            hall: 2,
            led: 16,
            sda: 4,
            scl: 5,
        }
    }
}

/// Partial pin document; absent keys keep the current assignment
#[derive(Deserialize)]
struct PinPatch {
    hall: Option<u8>,
    led: Option<u8>,
    sda: Option<u8>,
    scl: Option<u8>,
}

impl PinConfig {
    /// Restore factory pins
    pub fn load_defaults(&mut self) {
        *self = Self::default();
    }

    /// Encode as a JSON object
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(|_| ConfigError::Malformed)
    }

    /// Apply a JSON document over the current pins
    ///
    /// Keys missing from the document keep their current value. A malformed
    /// document leaves the config untouched.
    pub fn apply_json(&mut self, json: &str) -> Result<(), ConfigError> {
        if json.trim().is_empty() {
            return Err(ConfigError::Malformed);
        }
        let patch: PinPatch = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;

        self.hall = patch.hall.unwrap_or(self.hall);
        self.led = patch.led.unwrap_or(self.led);
        self.sda = patch.sda.unwrap_or(self.sda);
        self.scl = patch.scl.unwrap_or(self.scl);
        Ok(())
    }
}

/// Complete controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlightConfig {
    /// Altitude engine tuning
    pub altimeter: AltimeterConfig,
    /// Calibration timing
    pub calibration: CalibrationTiming,
    /// Button timing
    pub gestures: GestureTiming,
    /// Pin assignment
    pub pins: PinConfig,
}
