//! Flight core for a single-board glider flight-data logger
//!
//! Estimates altitude from one barometric pressure sensor, sequences the
//! calibration procedure without blocking the control loop, and walks the
//! device through the Setup → Armed → Flight launch protocol driven by a
//! single hall-effect (magnet) button.
//!
//! Key constraints:
//! - Single-threaded cooperative loop, every `tick` returns in well under a millisecond
//! - No heap allocation in the tick path
//! - Hardware reached only through the traits in [`hal`]
//!
//! ```no_run
//! use glider_core::{Command, FlightConfig, FlightController};
//! # use glider_core::hal::*;
//! # struct Bmp; impl Barometer for Bmp {
//! #     fn detect(&mut self) -> bool { true }
//! #     fn read_pressure(&mut self) -> f64 { 101_325.0 }
//! #     fn read_temperature(&mut self) -> f32 { 21.0 }
//! # }
//! # struct Pin; impl HallInput for Pin { fn level(&mut self) -> PinLevel { PinLevel::High } }
//! # struct Wifi; impl RadioPower for Wifi { fn enable(&mut self) {} fn disable(&mut self) {} }
//! # struct Fs; impl CalibrationStore for Fs {
//! #     fn load(&mut self) -> Option<String> { None }
//! #     fn save(&mut self, _blob: &str) -> Result<(), glider_core::StorageError> { Ok(()) }
//! # }
//! # fn millis() -> u64 { 0 }
//! let mut controller = FlightController::new(Bmp, Pin, Wifi, Fs, FlightConfig::default(), millis());
//!
//! controller.execute(Command::SetMonitoring(true), millis())?;
//! controller.execute(Command::StartCalibration, millis())?;
//!
//! loop {
//!     controller.tick(millis());
//! }
//! # Ok::<(), glider_core::CommandError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[macro_use]
mod logging;

pub mod altitude;
pub mod calibration;
pub mod config;
pub mod constants;
pub mod controller;
pub mod errors;
pub mod flight;
pub mod hal;
pub mod status;
pub mod time;

// Public API
pub use altitude::{AltitudeEngine, TelemetryData};
pub use calibration::{CalibrationData, CalibrationStateMachine};
pub use config::{AltimeterConfig, CalibrationTiming, FlightConfig, GestureTiming, PinConfig};
pub use controller::{Command, CommandAck, FlightController};
pub use errors::{CalibrationBlobError, CommandError, ConfigError, StorageError};
pub use flight::{FlightModeStateMachine, FlightState, Gesture, HallSensorHandler};
pub use status::{StatusReport, SystemStatus};

/// Firmware version reported in the status payload
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
