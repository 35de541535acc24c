//! Error Types for the Flight Core
//!
//! ## Design Philosophy
//!
//! The core never panics and never blocks on a failure. Every fallible path
//! hands a small `Copy` error back to the caller, who decides what to report:
//!
//! 1. **Small Size**: variants carry at most a nested error code, no strings
//!    beyond `&'static str`.
//!
//! 2. **No Heap Allocation**: errors are returned from the control loop and
//!    from command handlers serviced between ticks.
//!
//! 3. **Actionable**: each command error maps one-to-one onto a response the
//!    network layer can send (hardware missing, busy, nothing to save).
//!
//! ## Error Categories
//!
//! ### Command Rejections
//! - `HardwareAbsent`: the barometer never acknowledged on the bus
//! - `OperationInProgress`: calibration or zeroing is already running
//! - `NotCalibrated`: there is no baseline worth persisting
//!
//! ### Persistence
//! - `StorageError`: the storage collaborator could not read or write
//! - `CalibrationBlobError`: the stored blob is empty, unparsable or carries
//!   a non-positive base pressure. Treated as "not yet calibrated".
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use glider_core::CommandError;
//!
//! fn http_status(result: Result<(), CommandError>) -> u16 {
//!     match result {
//!         Ok(()) => 202,
//!         Err(CommandError::HardwareAbsent) => 503,
//!         Err(CommandError::OperationInProgress) => 409,
//!         Err(_) => 500,
//!     }
//! }
//! ```

use thiserror_no_std::Error;

/// Failures reported by a [`CalibrationStore`](crate::hal::CalibrationStore)
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Nothing stored under the requested key
    #[error("No stored data")]
    NotFound,

    /// Open, read or write failed
    #[error("Storage I/O failed")]
    Io,

    /// Filesystem has no room for the payload
    #[error("Storage full")]
    Full,
}

/// Reasons a persisted calibration blob is discarded
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationBlobError {
    /// Blob is an empty string
    #[error("Calibration blob is empty")]
    Empty,

    /// Blob is not a JSON object with a numeric `basePressure`
    #[error("Calibration blob is malformed")]
    Malformed,

    /// Parsed base pressure is zero, negative or not finite
    #[error("Calibration base pressure must be positive")]
    NonPositiveBasePressure,
}

/// Configuration document could not be applied
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Document is empty or not valid JSON
    #[error("Configuration document is malformed")]
    Malformed,
}

/// Rejections for commands issued by the network/control layer
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Barometer failed to acknowledge at init, no retry without reboot
    #[error("Hardware error: sensor not found")]
    HardwareAbsent,

    /// Calibration or zeroing already running
    #[error("Calibration/zeroing already in progress")]
    OperationInProgress,

    /// No baseline to persist
    #[error("Not calibrated")]
    NotCalibrated,

    /// Calibration could not be encoded
    #[error("Calibration encoding failed: {0}")]
    Calibration(CalibrationBlobError),

    /// Storage collaborator rejected the write
    #[error("Storage failed: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for CommandError {
    fn from(err: StorageError) -> Self {
        CommandError::Storage(err)
    }
}

impl From<CalibrationBlobError> for CommandError {
    fn from(err: CalibrationBlobError) -> Self {
        CommandError::Calibration(err)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CommandError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::HardwareAbsent => defmt::write!(fmt, "Hardware absent"),
            Self::OperationInProgress => defmt::write!(fmt, "Operation in progress"),
            Self::NotCalibrated => defmt::write!(fmt, "Not calibrated"),
            Self::Calibration(_) => defmt::write!(fmt, "Calibration encoding failed"),
            Self::Storage(_) => defmt::write!(fmt, "Storage failed"),
        }
    }
}
