//! Scalar Kalman Filter for Altitude Smoothing
//!
//! ## Overview
//!
//! A one-dimensional random-walk Kalman filter: the state is the altitude
//! itself, there is no control input and no velocity term. It trades a small
//! lag for rejecting the ±0.3 m of noise a BMP-class sensor produces at rest.
//!
//! ## Algorithm
//!
//! ```text
//! Prediction:   p = p + q
//! Gain:         k = p / (p + r)
//! Update:       x = x + k·(z - x)
//! Covariance:   p = (1 - k)·p
//! ```
//!
//! With fixed `q` and `r` the covariance converges to the positive root of
//! `p² + q·p - q·r = 0`; the gain settles accordingly and the estimate follows
//! a constant measurement monotonically.
//!
//! ## Usage Example
//!
//! ```rust
//! use glider_core::altitude::kalman::{self, KalmanState};
//!
//! let mut state = KalmanState::new(0.05, 0.3, 1.0);
//! for _ in 0..50 {
//!     kalman::update(&mut state, 12.0);
//! }
//! assert!((state.estimate() - 12.0).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};

/// Filter state record, exclusively owned by the altitude engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KalmanState {
    /// Process noise
    q: f32,
    /// Measurement noise
    r: f32,
    /// Current estimate
    x: f32,
    /// Error covariance, never negative
    p: f32,
    /// Last gain
    k: f32,
}

impl KalmanState {
    /// Create a filter starting at zero
    ///
    /// `q` and `r` must both be positive.
    pub fn new(q: f32, r: f32, initial_covariance: f32) -> Self {
        debug_assert!(q > 0.0 && r > 0.0, "kalman noise must be positive");
        Self {
            q,
            r,
            x: 0.0,
            p: if initial_covariance > 0.0 { initial_covariance } else { 0.0 },
            k: 0.0,
        }
    }

    /// Current estimate
    pub fn estimate(&self) -> f32 {
        self.x
    }

    /// Current error covariance
    pub fn covariance(&self) -> f32 {
        self.p
    }

    /// Gain applied by the last update
    pub fn gain(&self) -> f32 {
        self.k
    }

    /// Drop the estimate back to zero after a new baseline is set
    ///
    /// Covariance is kept: the filter's confidence in the sensor is unchanged.
    pub fn reset_estimate(&mut self) {
        self.x = 0.0;
    }
}

/// Fold one measurement into `state` and return the new estimate
pub fn update(state: &mut KalmanState, measurement: f32) -> f32 {
    state.p += state.q;
    state.k = state.p / (state.p + state.r);
    state.x += state.k * (measurement - state.x);
    state.p *= 1.0 - state.k;
    state.x
}
