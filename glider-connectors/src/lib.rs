//! Storage collaborators for the glider flight core
//!
//! ## Overview
//!
//! The core persists exactly two documents, both as small JSON files on the
//! device's flash filesystem:
//!
//! | File           | Writer                         | Contents                    |
//! |----------------|--------------------------------|-----------------------------|
//! | `calib.json`   | `Command::SaveCalibration`     | `{"basePressure": <Pa>}`    |
//! | `program.json` | program upload from the client | opaque flight program JSON  |
//!
//! [`FileStore`] implements [`CalibrationStore`](glider_core::hal::CalibrationStore)
//! over a directory, [`ProgramStore`] validates and writes the flight program,
//! and [`MemoryStore`] keeps the calibration in RAM for simulation.
//!
//! ## Example Usage
//!
//! ```no_run
//! use glider_connectors::{FileStore, ProgramStore};
//! use glider_core::hal::CalibrationStore;
//!
//! let mut calibration = FileStore::open("/mnt/flash")?;
//! if let Some(blob) = calibration.load() {
//!     println!("stored: {blob}");
//! }
//!
//! let programs = ProgramStore::open("/mnt/flash")?;
//! programs.save(r#"{"steps":[{"alt":120,"servo":45}]}"#)?;
//! # Ok::<(), glider_connectors::ConnectorError>(())
//! ```

pub mod file_store;
pub mod memory;
pub mod program;

pub use file_store::FileStore;
pub use memory::MemoryStore;
pub use program::ProgramStore;

use glider_core::StorageError;
use thiserror::Error;

/// Name of the calibration document
pub const CALIBRATION_FILE: &str = "calib.json";

/// Name of the flight program document
pub const PROGRAM_FILE: &str = "program.json";

/// Errors from the filesystem adapters
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Empty payload")]
    EmptyPayload,
}

impl From<&ConnectorError> for StorageError {
    fn from(err: &ConnectorError) -> Self {
        match err {
            ConnectorError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                StorageError::NotFound
            }
            _ => StorageError::Io,
        }
    }
}
