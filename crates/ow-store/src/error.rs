use std::path::PathBuf;

/// Errors from snapshot and JSON file storage.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error from the underlying file system.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored content could not be encoded or decoded.
    #[error("serialization error in {}: {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A temporary file could not be moved into place.
    #[error("failed to persist {}: {reason}", path.display())]
    Persist { path: PathBuf, reason: String },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
