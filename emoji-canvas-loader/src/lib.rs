//! # Emoji Canvas Loader
//!
//! Background image loading for the emoji canvas: decoding raw bytes and
//! data URIs to RGBA pixels, and fetching remote images over HTTP.
//!
//! The controller crate decides *when* to load; this crate only knows
//! *how*. The [`ImageFetcher`] trait is the seam: the real
//! [`HttpFetcher`] runs on `reqwest`, and tests substitute deterministic
//! fakes.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod fetch;
pub mod image;

pub use self::image::{decode_image, load_from_data_uri, BackgroundImage, ImageFormat};
pub use error::{LoadError, LoadResult};
pub use fetch::{HttpFetcher, ImageFetcher};
