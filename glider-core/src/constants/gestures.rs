//! Hall Button Gesture Timing

/// Shortest press counted as a click (ms). Anything shorter is contact bounce.
pub const DEBOUNCE_MS: u64 = 50;

/// Hold duration that triggers a long press (ms).
pub const LONG_PRESS_MS: u64 = 3_000;

/// Quiet time after the last release that closes a click sequence (ms).
pub const DOUBLE_CLICK_MS: u64 = 500;
