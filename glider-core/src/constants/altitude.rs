//! Altitude Estimation Constants

// ===== BAROMETRIC FORMULA =====

/// Scale factor of the international barometric formula (m).
///
/// `h = 44330 * (1 - (P / P0) ^ 0.190295)`, valid in the troposphere. With
/// `P0` taken as the launch-site baseline the result is height above launch.
pub const ALTITUDE_FACTOR_M: f32 = 44_330.0;

/// Exponent of the international barometric formula (dimensionless).
///
/// Equals `R * L / (g * M)` for the standard atmosphere.
pub const ALTITUDE_EXPONENT: f32 = 0.190_295;

/// Standard sea-level pressure (Pa), the sensor's native unit.
pub const SEA_LEVEL_PRESSURE_PA: f64 = 101_325.0;

// ===== SAMPLING =====

/// Interval between telemetry reductions (ms).
///
/// Raw readings are averaged over this window, giving a 2 Hz altitude update.
pub const SAMPLE_INTERVAL_MS: u64 = 500;

// ===== KALMAN FILTER =====

/// Process noise `q` of the scalar altitude filter.
pub const KALMAN_PROCESS_NOISE: f32 = 0.05;

/// Measurement noise `r` of the scalar altitude filter.
pub const KALMAN_MEASUREMENT_NOISE: f32 = 0.3;

/// Initial error covariance `p` of the scalar altitude filter.
pub const KALMAN_INITIAL_COVARIANCE: f32 = 1.0;

// ===== STABILITY & DRIFT COMPENSATION =====

/// Largest sample-to-sample altitude change still counted as "stable" (m).
pub const STABILITY_THRESHOLD_M: f32 = 0.25;

/// Consecutive stable samples required before the device reports stable.
pub const STABLE_COUNT_THRESHOLD: u32 = 5;

/// Baseline blend coefficient while the device is at rest.
///
/// Lets the baseline follow real atmospheric drift within a few seconds.
pub const BASELINE_ALPHA_STABLE: f64 = 0.05;

/// Baseline blend coefficient while the device is moving.
///
/// Small enough that a climb does not drag the zero reference along with it.
pub const BASELINE_ALPHA_MOVING: f64 = 0.001;

/// Filtered altitudes closer to zero than this are reported as exactly 0 (m).
pub const DEAD_ZONE_M: f32 = 0.12;
