//! Non-blocking Calibration State Machine
//!
//! ## Why Incremental?
//!
//! A full calibration averages 2000 readings after a ten second thermal
//! warm-up. As one blocking loop it would stall the control loop and the web
//! server for twenty seconds. Instead every phase advances by at most one
//! sensor read per [`CalibrationStateMachine::update`] and yields.
//!
//! ## Phases
//!
//! ```text
//!        start_calibration              10 s elapsed            2000 samples, 5 ms apart
//!  Idle ──────────────────► Warmup ──────────────────► Measuring ─────────────────────────► Idle
//!
//!        start_zeroing                500 samples, one per tick
//!  Idle ──────────────────► Zeroing ─────────────────────────────► Idle
//!
//!  cancel(): any phase ──► Idle, accumulators dropped
//! ```
//!
//! Completion is reported as a [`CalibrationOutcome`] for the owner to apply;
//! the machine never touches the baseline itself. A cancelled run leaves no
//! partial sum behind.
//!
//! ## Preconditions
//!
//! The machine does not guard re-entry. Callers check [`is_idle`] (and the
//! hardware flag) before starting, and reject with a conflict instead of
//! resetting samples already in flight.
//!
//! [`is_idle`]: CalibrationStateMachine::is_idle

mod data;

pub use data::CalibrationData;

use serde::Serialize;

use crate::config::CalibrationTiming;
use crate::constants::calibration::MAX_REPORTED_PROGRESS;
use crate::hal::Barometer;
use crate::time::{elapsed_ms, Timestamp};

/// Active phase and its private counters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationPhase {
    /// Nothing running
    Idle,
    /// Thermal stabilization, readings discarded
    Warmup {
        /// Entry time
        started_at: Timestamp,
        /// Last sensor poll
        last_poll: Timestamp,
        /// Time spent in warm-up as of the last tick
        elapsed: u64,
    },
    /// Averaging the base pressure
    Measuring {
        /// Samples taken
        samples: u32,
        /// Running sum (Pa)
        sum: f64,
        /// Time of the last sample
        last_sample: Timestamp,
    },
    /// Averaging a new zero reference
    Zeroing {
        /// Samples taken
        samples: u32,
        /// Running sum (Pa)
        sum: f64,
    },
}

/// Result of advancing a phase by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseResult {
    /// Stay in the current phase
    Continue,
    /// Move to another phase
    Advance(CalibrationPhase),
    /// Finished; return to idle and apply the outcome
    Complete(CalibrationOutcome),
}

/// Values produced by a finished run
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationOutcome {
    /// Full calibration: new base pressure and baseline
    Calibrated {
        /// Mean of the measuring samples (Pa)
        base_pressure: f64,
    },
    /// Re-zero: new live baseline only
    Zeroed {
        /// Mean of the zeroing samples (Pa)
        baseline: f64,
    },
}

/// Calibration state as reported to the network layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalibrationSnapshot {
    /// Any phase other than idle
    pub calibrating: bool,
    /// Phase name
    pub phase: &'static str,
    /// 0–99
    pub progress: u8,
}

impl CalibrationPhase {
    fn warmup(now: Timestamp) -> Self {
        CalibrationPhase::Warmup {
            started_at: now,
            last_poll: now,
            elapsed: 0,
        }
    }

    fn measuring(now: Timestamp) -> Self {
        CalibrationPhase::Measuring {
            samples: 0,
            sum: 0.0,
            last_sample: now,
        }
    }

    fn zeroing() -> Self {
        CalibrationPhase::Zeroing { samples: 0, sum: 0.0 }
    }

    /// Advance this phase by one tick
    pub fn step<B: Barometer>(
        &mut self,
        now: Timestamp,
        barometer: &mut B,
        timing: &CalibrationTiming,
    ) -> PhaseResult {
        match self {
            CalibrationPhase::Idle => PhaseResult::Continue,

            CalibrationPhase::Warmup { started_at, last_poll, elapsed } => {
                if elapsed_ms(*last_poll, now) >= timing.warmup_poll_ms {
                    *last_poll = now;
                    barometer.read_pressure();
                    barometer.read_temperature();
                }
                *elapsed = elapsed_ms(*started_at, now);
                if *elapsed >= timing.warmup_ms {
                    log_info!("Thermal stabilization complete, collecting samples");
                    PhaseResult::Advance(CalibrationPhase::measuring(now))
                } else {
                    PhaseResult::Continue
                }
            }

            CalibrationPhase::Measuring { samples, sum, last_sample } => {
                if elapsed_ms(*last_sample, now) < timing.measuring_interval_ms {
                    return PhaseResult::Continue;
                }
                *last_sample = now;
                *sum += barometer.read_pressure();
                *samples += 1;

                if *samples >= timing.measuring_samples {
                    PhaseResult::Complete(CalibrationOutcome::Calibrated {
                        base_pressure: *sum / f64::from(*samples),
                    })
                } else {
                    PhaseResult::Continue
                }
            }

            CalibrationPhase::Zeroing { samples, sum } => {
                *sum += barometer.read_pressure();
                *samples += 1;

                if *samples >= timing.zeroing_samples {
                    PhaseResult::Complete(CalibrationOutcome::Zeroed {
                        baseline: *sum / f64::from(*samples),
                    })
                } else {
                    PhaseResult::Continue
                }
            }
        }
    }

    /// Name reported to the network layer
    pub const fn name(&self) -> &'static str {
        match self {
            CalibrationPhase::Idle => "idle",
            CalibrationPhase::Warmup { .. } => "stabilization",
            CalibrationPhase::Measuring { .. } => "measuring",
            CalibrationPhase::Zeroing { .. } => "zeroing",
        }
    }

    /// Completion percentage, clamped to 0–99
    pub fn progress(&self, timing: &CalibrationTiming) -> u8 {
        let (done, total) = match *self {
            CalibrationPhase::Idle => return 0,
            CalibrationPhase::Warmup { elapsed, .. } => (elapsed, timing.warmup_ms),
            CalibrationPhase::Measuring { samples, .. } => {
                (u64::from(samples), u64::from(timing.measuring_samples))
            }
            CalibrationPhase::Zeroing { samples, .. } => {
                (u64::from(samples), u64::from(timing.zeroing_samples))
            }
        };
        if total == 0 {
            return MAX_REPORTED_PROGRESS;
        }
        let percent = done.saturating_mul(100) / total;
        percent.min(u64::from(MAX_REPORTED_PROGRESS)) as u8
    }
}

/// Drives the calibration phases
#[derive(Debug, Clone)]
pub struct CalibrationStateMachine {
    phase: CalibrationPhase,
    timing: CalibrationTiming,
}

impl CalibrationStateMachine {
    /// Idle machine
    pub fn new(timing: CalibrationTiming) -> Self {
        Self {
            phase: CalibrationPhase::Idle,
            timing,
        }
    }

    /// Begin warm-up followed by a full calibration
    pub fn start_calibration(&mut self, now: Timestamp) {
        log_info!("Starting non-blocking calibration");
        self.phase = CalibrationPhase::warmup(now);
    }

    /// Begin a re-zero
    pub fn start_zeroing(&mut self) {
        log_info!("Starting non-blocking zeroing");
        self.phase = CalibrationPhase::zeroing();
    }

    /// Abort whatever is running; returns whether anything was running
    pub fn cancel(&mut self) -> bool {
        if self.is_idle() {
            return false;
        }
        log_warn!("Calibration phase '{}' cancelled", self.phase.name());
        self.phase = CalibrationPhase::Idle;
        true
    }

    /// Advance one tick; returns the outcome when a run finishes
    pub fn update<B: Barometer>(
        &mut self,
        now: Timestamp,
        barometer: &mut B,
    ) -> Option<CalibrationOutcome> {
        match self.phase.step(now, barometer, &self.timing) {
            PhaseResult::Continue => None,
            PhaseResult::Advance(next) => {
                self.phase = next;
                None
            }
            PhaseResult::Complete(outcome) => {
                match outcome {
                    CalibrationOutcome::Calibrated { base_pressure } => {
                        log_info!("Calibration complete, base: {:.2} Pa", base_pressure);
                    }
                    CalibrationOutcome::Zeroed { baseline } => {
                        log_info!("Zero set: {:.2} Pa", baseline);
                    }
                }
                self.phase = CalibrationPhase::Idle;
                Some(outcome)
            }
        }
    }

    /// Nothing running
    pub fn is_idle(&self) -> bool {
        matches!(self.phase, CalibrationPhase::Idle)
    }

    /// Sensor is busy with calibration; altitude updates pause
    pub fn is_measuring(&self) -> bool {
        !self.is_idle()
    }

    /// Current phase
    pub fn phase(&self) -> &CalibrationPhase {
        &self.phase
    }

    /// Name of the current phase
    pub fn phase_name(&self) -> &'static str {
        self.phase.name()
    }

    /// Progress of the current phase, 0–99
    pub fn progress(&self) -> u8 {
        self.phase.progress(&self.timing)
    }

    /// Reportable snapshot
    pub fn snapshot(&self) -> CalibrationSnapshot {
        CalibrationSnapshot {
            calibrating: !self.is_idle(),
            phase: self.phase_name(),
            progress: self.progress(),
        }
    }
}

impl Default for CalibrationStateMachine {
    fn default() -> Self {
        Self::new(CalibrationTiming::default())
    }
}
