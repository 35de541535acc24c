//! Hardware collaborator traits
//!
//! The core never touches a bus, pin, radio or filesystem directly. The board
//! support layer implements these four traits and hands them to
//! [`FlightController`](crate::FlightController), which owns them for the
//! device's uptime. Test doubles implement the same traits.

use alloc::string::String;

use crate::errors::StorageError;

/// Barometric pressure sensor on the sensor bus
pub trait Barometer {
    /// Detect the sensor at init; `false` when it does not acknowledge
    fn detect(&mut self) -> bool;

    /// Read pressure in the sensor's native unit (Pa)
    fn read_pressure(&mut self) -> f64;

    /// Read die temperature (°C)
    fn read_temperature(&mut self) -> f32;
}

/// Logic level of a digital input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinLevel {
    /// Pulled up, magnet absent
    High,
    /// Pulled down by the magnet
    Low,
}

impl PinLevel {
    /// Map a raw `digitalRead` style boolean
    pub const fn from_high(is_high: bool) -> Self {
        if is_high {
            PinLevel::High
        } else {
            PinLevel::Low
        }
    }
}

/// Hall-effect switch input (active low, internal pull-up)
pub trait HallInput {
    /// Sample the current pin level
    fn level(&mut self) -> PinLevel;
}

/// Wireless radio power control
pub trait RadioPower {
    /// Wake the radio and bring the access point up
    fn enable(&mut self);

    /// Tear the access point down and put the radio to sleep
    fn disable(&mut self);
}

/// Durable storage for the calibration blob
pub trait CalibrationStore {
    /// Read the stored blob; `None` when nothing was ever saved
    fn load(&mut self) -> Option<String>;

    /// Replace the stored blob
    fn save(&mut self, blob: &str) -> Result<(), StorageError>;
}
