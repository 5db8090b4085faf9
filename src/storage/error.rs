//! Error types for persistence.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Storage error type.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No platform data directory could be determined.
    #[error("failed to locate a data directory; pass --data-file")]
    DataDirNotFound,

    /// Reading, writing or creating the data file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The data file is not valid JSON for the expected layout.
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
