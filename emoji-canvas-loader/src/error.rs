//! Loader error types.

use thiserror::Error;

/// Result type for loader operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors that can occur while loading a background image.
///
/// The controller absorbs all of these into "no visible change"; they are
/// typed here so the loader's own API stays honest.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Image bytes could not be decoded.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// A data URI was malformed.
    #[error("Invalid data URI: {0}")]
    DataUri(String),

    /// A network fetch failed (connection, timeout, or HTTP status).
    #[error("Fetch failed: {0}")]
    Fetch(String),
}
