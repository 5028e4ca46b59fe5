use super::{Version, WorkflowId};
use crate::error::PersistError;
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;

/// The persisted local-fallback blob: exactly the version lists and the
/// last-autosave timestamps, keyed by workflow. Transient editor state
/// (selection, dirty flags, edit counters) is never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub versions: AHashMap<WorkflowId, Vec<Version>>,
    #[serde(default)]
    pub last_autosave_time: AHashMap<WorkflowId, DateTime<Utc>>,
}

impl StoreSnapshot {
    /// Saves the snapshot to a file as JSON.
    pub fn save(&self, path: &str) -> Result<(), PersistError> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes).map_err(|e| PersistError::File {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Loads a snapshot from a file.
    pub fn from_file(path: &str) -> Result<Self, PersistError> {
        let bytes = fs::read(path).map_err(|e| PersistError::File {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_bytes(&bytes)
    }

    /// Serializes the snapshot to its canonical JSON encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PersistError> {
        serde_json::to_vec(self).map_err(|e| PersistError::Encode(e.to_string()))
    }

    /// Deserializes a snapshot from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PersistError> {
        serde_json::from_slice(bytes).map_err(|e| PersistError::Decode(e.to_string()))
    }
}
