//! # Emoji Canvas Core
//!
//! Core document model for the emoji canvas editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │             emoji-canvas-core               │
//! ├──────────────────────┬──────────────────────┤
//! │  Document Model      │  Coordinate Math     │
//! │  - Emoji list        │  - Document space    │
//! │  - Background value  │  - Viewport space    │
//! │  - Intent mutations  │  - Pan/zoom mapping  │
//! └──────────────────────┴──────────────────────┘
//! ```
//!
//! The document is a plain value: every mutation goes through a
//! single-writer owner (the controller crate) and read access is
//! borrow-only. Background resolution and anything async lives in the
//! sibling crates.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod background;
pub mod document;
pub mod error;
pub mod transform;

pub use background::Background;
pub use document::{Document, Emoji, EmojiId};
pub use error::{CoreError, CoreResult};
pub use transform::{Viewport, ViewportPoint};

/// Core crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
