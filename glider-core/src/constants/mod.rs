//! Constants for the flight core
//!
//! Every tuning value lives here with its unit in the name, so the state
//! machines and the defaults in [`config`](crate::config) never carry magic
//! numbers.
//!
//! ## Organization
//!
//! - **Altitude**: barometric formula, filter and drift-compensation tuning
//! - **Calibration**: warm-up duration and sample counts
//! - **Gestures**: hall button timing thresholds

/// Barometric conversion, Kalman and baseline drift tuning.
pub mod altitude;

/// Warm-up, full calibration and re-zero timing.
pub mod calibration;

/// Hall button debounce, long-press and double-click windows.
pub mod gestures;

pub use altitude::{
    ALTITUDE_EXPONENT, ALTITUDE_FACTOR_M, DEAD_ZONE_M, SAMPLE_INTERVAL_MS, STABLE_COUNT_THRESHOLD,
    STABILITY_THRESHOLD_M,
};

pub use calibration::{MEASURING_SAMPLES, WARMUP_DURATION_MS, ZEROING_SAMPLES};

pub use gestures::{DEBOUNCE_MS, DOUBLE_CLICK_MS, LONG_PRESS_MS};
