//! Image decoding for canvas backgrounds.
//!
//! Backgrounds arrive either as raw bytes (inline image data, fetched HTTP
//! bodies) or as base64 data URIs from browser drag-and-drop sources.
//! Everything decodes to straight RGBA8.

use crate::error::{LoadError, LoadResult};

/// A decoded background image ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA pixel data (4 bytes per pixel).
    pub data: Vec<u8>,
}

/// Image container formats recognized by magic-byte sniffing.
///
/// Only used for logging; decoding itself goes through the `image` crate's
/// own format detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG image.
    Png,
    /// JPEG image.
    Jpeg,
    /// WebP image.
    WebP,
    /// Unknown/other format.
    Unknown,
}

impl ImageFormat {
    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            Self::Png
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Self::Jpeg
        } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Self::WebP
        } else {
            Self::Unknown
        }
    }
}

/// Decode image bytes to RGBA pixels.
///
/// # Errors
///
/// Returns [`LoadError::Decode`] if the bytes are not a decodable image.
pub fn decode_image(data: &[u8]) -> LoadResult<BackgroundImage> {
    let format = ImageFormat::from_magic_bytes(data);
    tracing::debug!("Decoding {} byte image ({format:?})", data.len());

    let img =
        image::load_from_memory(data).map_err(|e| LoadError::Decode(e.to_string()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(BackgroundImage {
        width,
        height,
        data: rgba.into_raw(),
    })
}

/// Decode an image from a base64 data URI.
///
/// Supports the form produced by browser drag-and-drop sources:
/// `data:image/png;base64,iVBORw0KGgo...`. Only base64 payloads are
/// accepted; percent-encoded data URIs are not image sources in practice.
///
/// # Errors
///
/// Returns [`LoadError::DataUri`] if the URI is malformed or not base64,
/// and [`LoadError::Decode`] if the payload is not a decodable image.
pub fn load_from_data_uri(uri: &str) -> LoadResult<BackgroundImage> {
    use base64::Engine;

    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| LoadError::DataUri("missing data: prefix".to_string()))?;
    let (metadata, payload) = rest
        .split_once(',')
        .ok_or_else(|| LoadError::DataUri("missing comma".to_string()))?;

    if !metadata.contains(";base64") {
        return Err(LoadError::DataUri("payload is not base64".to_string()));
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| LoadError::DataUri(e.to_string()))?;

    decode_image(&bytes)
}
