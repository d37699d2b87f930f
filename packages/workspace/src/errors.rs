use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("Stored document has schema version {found}, newer than supported {supported}")]
    UnsupportedSchema { found: u32, supported: u32 },
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Remote storage failed: {0}")]
    Remote(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum BoundFileError {
    #[error("Malformed bound file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Checksum mismatch: file says {expected}, payload hashes to {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Unsupported bound file version {0}")]
    UnsupportedVersion(u32),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Failed to read config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Sync is not configured: set remoteDir in the workspace config")]
    SyncDisabled,
}
