use thiserror::Error;

/// Errors returned by history operations that address a specific record.
///
/// Idempotent mutations (`delete_version`, `pin_version`, `delete_branch`)
/// never produce these; only operations that must hand back a record do.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Version '{0}' was not found in any workflow")]
    VersionNotFound(String),

    #[error("Branch '{0}' was not found")]
    BranchNotFound(String),
}

/// Errors that can occur while persisting or loading the store fallback blob.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Failed to serialize store snapshot: {0}")]
    Encode(String),

    #[error("Failed to deserialize store snapshot: {0}")]
    Decode(String),

    #[error("Could not access store file '{path}': {message}")]
    File { path: String, message: String },
}

/// Errors that can occur when converting a custom editor format into a `Graph`.
#[derive(Error, Debug, Clone)]
pub enum GraphConversionError {
    #[error("Invalid graph data: {0}")]
    ValidationError(String),
}
