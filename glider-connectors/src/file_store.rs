//! Calibration blob on the filesystem

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use glider_core::hal::CalibrationStore;
use glider_core::StorageError;
use log::{info, warn};

use crate::{ConnectorError, CALIBRATION_FILE};

/// `calib.json` inside a storage directory
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Use `root` as the storage directory, creating it if needed
    pub fn open(root: impl AsRef<Path>) -> Result<Self, ConnectorError> {
        let root = root.as_ref();
        fs::create_dir_all(root)?;
        info!("File system mounted at {}", root.display());
        Ok(Self {
            path: root.join(CALIBRATION_FILE),
        })
    }

    /// Location of the calibration document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<String>, ConnectorError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, blob: &str) -> Result<usize, ConnectorError> {
        if blob.is_empty() {
            return Err(ConnectorError::EmptyPayload);
        }
        fs::write(&self.path, blob)?;
        Ok(blob.len())
    }
}

impl CalibrationStore for FileStore {
    fn load(&mut self) -> Option<String> {
        match self.read() {
            Ok(blob) => blob,
            Err(err) => {
                warn!("Failed to read {}: {}", self.path.display(), err);
                None
            }
        }
    }

    fn save(&mut self, blob: &str) -> Result<(), StorageError> {
        match self.write(blob) {
            Ok(bytes) => {
                info!("Calibration saved, {} bytes", bytes);
                Ok(())
            }
            Err(err) => {
                warn!("Failed to write {}: {}", self.path.display(), err);
                Err(StorageError::from(&err))
            }
        }
    }
}
