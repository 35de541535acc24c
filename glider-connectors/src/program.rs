//! Flight program document
//!
//! The core never interprets the program; it only guarantees that what
//! lands in `program.json` is non-empty, well-formed JSON.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::{ConnectorError, PROGRAM_FILE};

/// `program.json` inside a storage directory
#[derive(Debug, Clone)]
pub struct ProgramStore {
    path: PathBuf,
}

impl ProgramStore {
    /// Use `root` as the storage directory, creating it if needed
    pub fn open(root: impl AsRef<Path>) -> Result<Self, ConnectorError> {
        let root = root.as_ref();
        fs::create_dir_all(root)?;
        Ok(Self {
            path: root.join(PROGRAM_FILE),
        })
    }

    /// Validate and store an uploaded program; returns the bytes written
    ///
    /// An invalid body never touches the existing file.
    pub fn save(&self, body: &str) -> Result<usize, ConnectorError> {
        if body.trim().is_empty() {
            return Err(ConnectorError::EmptyPayload);
        }
        if let Err(err) = serde_json::from_str::<serde_json::Value>(body) {
            warn!("Rejected flight program: {}", err);
            return Err(err.into());
        }

        fs::write(&self.path, body)?;
        info!("Program saved, {} bytes", body.len());
        Ok(body.len())
    }

    /// Stored program, `None` if none was uploaded
    pub fn load(&self) -> Result<Option<String>, ConnectorError> {
        match fs::read_to_string(&self.path) {
            Ok(body) => Ok(Some(body)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Location of the program document
    pub fn path(&self) -> &Path {
        &self.path
    }
}
