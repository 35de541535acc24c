//! Calibration Timing Constants

/// Length of the thermal stabilization phase (ms).
///
/// The sensor's self-heating shifts its readings for several seconds after
/// it starts converting continuously.
pub const WARMUP_DURATION_MS: u64 = 10_000;

/// Poll period during warm-up (ms).
pub const WARMUP_POLL_MS: u64 = 50;

/// Samples averaged into the base pressure by a full calibration.
pub const MEASURING_SAMPLES: u32 = 2_000;

/// Minimum spacing between full-calibration samples (ms).
pub const MEASURING_INTERVAL_MS: u64 = 5;

/// Samples averaged into the new baseline by a re-zero.
pub const ZEROING_SAMPLES: u32 = 500;

/// Highest progress value reported while a phase is still running.
///
/// 100 is never reported: completion shows up as the return to idle.
pub const MAX_REPORTED_PROGRESS: u8 = 99;
