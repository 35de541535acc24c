//! Top-level owner of every subsystem and collaborator
//!
//! ## Tick Order
//!
//! ```text
//! tick(now)
//!   1. CalibrationStateMachine::update  ──► completed outcome applied to the engine
//!   2. AltitudeEngine::update           (skipped while calibration owns the sensor)
//!   3. HallSensorHandler::update        ──► gestures
//!   4. FlightModeStateMachine           ──► radio side effects
//! ```
//!
//! Calibration writes the baseline the altitude step reads, so the order is
//! fixed. Commands from the network layer are executed between ticks through
//! [`FlightController::execute`] and never call back into `tick`.

use core::fmt;

use heapless::Vec;

use crate::altitude::{AltitudeEngine, TelemetryData};
use crate::calibration::{CalibrationOutcome, CalibrationSnapshot, CalibrationStateMachine};
use crate::config::{FlightConfig, PinConfig};
use crate::errors::CommandError;
use crate::flight::{FlightModeStateMachine, FlightState, HallSensorHandler, Transition};
use crate::hal::{Barometer, CalibrationStore, HallInput, RadioPower};
use crate::status::{StatusReport, SystemStatus};
use crate::time::{elapsed_ms, Timestamp};

/// Requests accepted from the network/control layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Warm-up followed by a full calibration
    StartCalibration,
    /// Re-zero the live baseline
    StartZeroing,
    /// Abort calibration or zeroing
    Cancel,
    /// Persist the current base pressure
    SaveCalibration,
    /// Enable or pause altitude updates
    SetMonitoring(bool),
    /// Enable or stop diagnostic lines
    SetLogging(bool),
}

/// Successful command results
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandAck {
    /// Warm-up has begun
    CalibrationStarted,
    /// Zeroing has begun
    ZeroingStarted,
    /// Cancel handled; `false` when nothing was running
    Cancelled {
        /// A phase was actually aborted
        was_running: bool,
    },
    /// Base pressure written to storage
    Saved {
        /// Value persisted (Pa)
        base_pressure: f64,
    },
    /// Monitoring flag applied
    Monitoring(bool),
    /// Logging flag applied
    Logging(bool),
}

/// Everything one tick produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// Calibration or zeroing finished this tick
    pub calibration: Option<CalibrationOutcome>,
    /// New altitude computed this tick
    pub telemetry: Option<TelemetryData>,
    /// Mode changes caused by this tick's gestures
    pub transitions: Vec<Transition, 3>,
}

/// Serial diagnostic line, formatted without allocating
///
/// `[12.5s] Alt: 3.27m | P: 101284.6Pa | MOVING`
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticLine<'a> {
    /// Time since logging was enabled (ms)
    pub elapsed_ms: u64,
    /// Values to print
    pub telemetry: &'a TelemetryData,
}

impl fmt::Display for DiagnosticLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = self.elapsed_ms as f64 / 1000.0;
        write!(
            f,
            "[{:.1}s] Alt: {:.2}m | P: {:.1}Pa | {}",
            seconds,
            self.telemetry.altitude,
            self.telemetry.pressure,
            if self.telemetry.is_stable { "STABLE" } else { "MOVING" },
        )
    }
}

/// Flight core wired to its hardware
pub struct FlightController<B, H, R, S> {
    barometer: B,
    hall_input: H,
    radio: R,
    store: S,
    status: SystemStatus,
    engine: AltitudeEngine,
    calibration: CalibrationStateMachine,
    hall: HallSensorHandler,
    flight: FlightModeStateMachine,
    pins: PinConfig,
    log_origin: Timestamp,
}

impl<B, H, R, S> FlightController<B, H, R, S>
where
    B: Barometer,
    H: HallInput,
    R: RadioPower,
    S: CalibrationStore,
{
    /// Detect the sensor, restore any stored calibration and boot into Setup
    pub fn new(
        mut barometer: B,
        mut hall_input: H,
        mut radio: R,
        store: S,
        config: FlightConfig,
        now: Timestamp,
    ) -> Self {
        let hardware_ok = barometer.detect();
        if hardware_ok {
            log_info!("Barometer found");
        } else {
            log_warn!("Barometer not found, sensor functions disabled");
        }

        let initial_level = hall_input.level();
        radio.enable();

        let mut controller = Self {
            barometer,
            hall_input,
            radio,
            store,
            status: SystemStatus::new(hardware_ok),
            engine: AltitudeEngine::new(config.altimeter),
            calibration: CalibrationStateMachine::new(config.calibration),
            hall: HallSensorHandler::new(config.gestures, initial_level),
            flight: FlightModeStateMachine::new(),
            pins: config.pins,
            log_origin: now,
        };

        if hardware_ok {
            controller.load_calibration();
        }
        controller
    }

    /// Adopt the stored calibration blob, if there is a valid one
    ///
    /// A missing or invalid blob leaves the device uncalibrated.
    pub fn load_calibration(&mut self) -> bool {
        let Some(blob) = self.store.load() else {
            log_info!("No stored calibration");
            return false;
        };

        match self.engine.calibration_mut().load_blob(&blob) {
            Ok(base_pressure) => {
                self.engine.reset_filter();
                self.status.set_calibrated(true);
                log_info!("Calibration loaded, base: {:.2} Pa", base_pressure);
                true
            }
            Err(err) => {
                log_warn!("Discarding stored calibration: {}", err);
                false
            }
        }
    }

    /// Run one control loop iteration
    pub fn tick(&mut self, now: Timestamp) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if let Some(done) = self.calibration.update(now, &mut self.barometer) {
            self.engine.apply(done);
            self.status.set_calibrated(true);
            outcome.calibration = Some(done);
        }

        if !self.calibration.is_measuring() {
            outcome.telemetry = self.engine.update(now, &mut self.barometer, &self.status);
            if let Some(telemetry) = &outcome.telemetry {
                if self.status.logging() {
                    log_info!(
                        "{}",
                        DiagnosticLine {
                            elapsed_ms: elapsed_ms(self.log_origin, now),
                            telemetry,
                        }
                    );
                }
            }
        }

        let level = self.hall_input.level();
        let gestures = self.hall.update(level, now, self.flight.state());

        for gesture in gestures {
            if let Some(transition) = self.flight.on_gesture(gesture, &mut self.radio) {
                self.status.set_flight_state(transition.to);
                let _ = outcome.transitions.push(transition);
            }
        }

        outcome
    }

    /// Execute a network/control command between ticks
    pub fn execute(&mut self, command: Command, now: Timestamp) -> Result<CommandAck, CommandError> {
        match command {
            Command::StartCalibration => {
                self.ensure_can_start()?;
                self.status.set_calibrated(false);
                self.calibration.start_calibration(now);
                Ok(CommandAck::CalibrationStarted)
            }
            Command::StartZeroing => {
                self.ensure_can_start()?;
                self.calibration.start_zeroing();
                Ok(CommandAck::ZeroingStarted)
            }
            Command::Cancel => Ok(CommandAck::Cancelled {
                was_running: self.calibration.cancel(),
            }),
            Command::SaveCalibration => self.save_calibration(),
            Command::SetMonitoring(enable) => {
                self.status.set_monitoring(enable);
                log_info!("Barometer monitoring {}", if enable { "on" } else { "off" });
                Ok(CommandAck::Monitoring(enable))
            }
            Command::SetLogging(enable) => {
                self.status.set_logging(enable);
                if enable {
                    self.log_origin = now;
                }
                log_info!("Serial logging {}", if enable { "on" } else { "off" });
                Ok(CommandAck::Logging(enable))
            }
        }
    }

    fn ensure_can_start(&self) -> Result<(), CommandError> {
        if !self.status.hardware_ok() {
            return Err(CommandError::HardwareAbsent);
        }
        if !self.calibration.is_idle() {
            return Err(CommandError::OperationInProgress);
        }
        Ok(())
    }

    fn save_calibration(&mut self) -> Result<CommandAck, CommandError> {
        let base_pressure = self.engine.calibration().base_pressure;
        if !self.status.calibrated() || base_pressure <= 0.0 {
            return Err(CommandError::NotCalibrated);
        }

        let blob = self.engine.calibration().to_blob()?;
        self.store.save(&blob)?;
        self.engine.calibration_mut().mark_persisted();

        log_info!("Calibration saved, base: {:.2} Pa", base_pressure);
        Ok(CommandAck::Saved { base_pressure })
    }

    /// Status payload at `now`
    pub fn status_report(&self, now: Timestamp) -> StatusReport {
        StatusReport::build(
            &self.status,
            &self.calibration.snapshot(),
            self.engine.calibration(),
            self.engine.telemetry(),
            now,
        )
    }

    /// System flags
    pub fn status(&self) -> &SystemStatus {
        &self.status
    }

    /// Calibration progress as reported to clients
    pub fn calibration_snapshot(&self) -> CalibrationSnapshot {
        self.calibration.snapshot()
    }

    /// Altitude engine
    pub fn engine(&self) -> &AltitudeEngine {
        &self.engine
    }

    /// Current flight mode
    pub fn flight_state(&self) -> FlightState {
        self.flight.state()
    }

    /// Flight mode machine with its transition history
    pub fn flight(&self) -> &FlightModeStateMachine {
        &self.flight
    }

    /// Active pin assignment
    pub fn pins(&self) -> &PinConfig {
        &self.pins
    }

    /// Mutable pin assignment; takes effect on the next boot
    pub fn pins_mut(&mut self) -> &mut PinConfig {
        &mut self.pins
    }

    /// Release the collaborators
    pub fn into_parts(self) -> (B, H, R, S) {
        (self.barometer, self.hall_input, self.radio, self.store)
    }
}
