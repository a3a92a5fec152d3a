//! Error types for curator-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from corpus operations.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// Underlying I/O failure, with the path that caused it.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error (scaffold path).
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record file is not valid JSON, or does not match the record shape.
    #[error("failed to parse record at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The corpus directory does not exist.
    #[error("corpus directory not found at {path}")]
    CorpusNotFound { path: PathBuf },

    /// The corpus directory holds no record files.
    #[error("no record files found in {path}")]
    EmptyCorpus { path: PathBuf },

    /// A scaffold name normalizes to nothing usable as a file name.
    #[error("'{name}' cannot be turned into a record file name")]
    InvalidName { name: String },

    /// Refused to overwrite an existing record file.
    #[error("record file already exists at {path}")]
    AlreadyExists { path: PathBuf },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CorpusError {
    CorpusError::Io {
        path: path.into(),
        source,
    }
}
