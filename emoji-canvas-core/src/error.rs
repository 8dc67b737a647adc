//! Error types for core document operations.

use thiserror::Error;

/// Result type for core document operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core document operations.
///
/// Deliberately small: not-found edits and removes are silent no-ops by
/// contract, so the only fallible surface here is serialization.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Document serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
