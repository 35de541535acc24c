//! RAM-backed calibration store for simulation

use glider_core::hal::CalibrationStore;
use glider_core::StorageError;

/// Single-slot store with an optional size limit
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blob: Option<String>,
    capacity: Option<usize>,
    writes: u32,
}

impl MemoryStore {
    /// Empty, unlimited store
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store, as if the blob survived a reboot
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
            ..Self::default()
        }
    }

    /// Reject blobs longer than `bytes` with [`StorageError::Full`]
    pub fn with_capacity(mut self, bytes: usize) -> Self {
        self.capacity = Some(bytes);
        self
    }

    /// Stored blob
    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }

    /// Successful saves so far
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl CalibrationStore for MemoryStore {
    fn load(&mut self) -> Option<String> {
        self.blob.clone()
    }

    fn save(&mut self, blob: &str) -> Result<(), StorageError> {
        if blob.is_empty() {
            return Err(StorageError::Io);
        }
        if self.capacity.is_some_and(|capacity| blob.len() > capacity) {
            return Err(StorageError::Full);
        }
        self.blob = Some(blob.to_owned());
        self.writes += 1;
        Ok(())
    }
}
