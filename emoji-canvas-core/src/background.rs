//! Background values for the canvas document.

use serde::{Deserialize, Serialize};
use url::Url;

/// The background of a canvas document.
///
/// Exactly one variant is active at a time and assigning a new value fully
/// replaces the old one. Equality is structural (same variant, same
/// payload); the controller relies on this to detect whether an in-flight
/// background fetch has been superseded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Background {
    /// No background.
    #[default]
    Blank,

    /// A remote image to fetch asynchronously.
    Url(Url),

    /// Inline image bytes to decode synchronously.
    ImageData(Vec<u8>),
}

impl Background {
    /// Whether this is the blank background.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }

    /// Whether resolving this background requires a network fetch.
    #[must_use]
    pub fn needs_fetch(&self) -> bool {
        matches!(self, Self::Url(_))
    }
}

impl std::fmt::Display for Background {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank => write!(f, "blank"),
            Self::Url(url) => write!(f, "url({url})"),
            Self::ImageData(bytes) => write!(f, "image-data({} bytes)", bytes.len()),
        }
    }
}
