//! Error types for curator-validate.

use thiserror::Error;

use curator_core::CorpusError;

/// Corpus-level failures. Per-record problems never surface here; they are
/// reported inside [`crate::ValidationReport`].
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
