//! # Emoji Canvas Document Controller
//!
//! Single-writer owner of a canvas [`Document`](emoji_canvas_core::Document):
//! exposes the mutation intents the UI collaborator calls, resolves
//! background values into decoded images (asynchronously for remote URLs),
//! and republishes read-only snapshots after every change.
//!
//! ## Concurrency model
//!
//! All document mutations and snapshot reads happen on the controller's
//! owner task. The only concurrent work is the background fetch: it runs on
//! a spawned worker that computes a result and hands it back over a channel.
//! The worker never touches controller state; completions are applied only
//! when the owner pumps them.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod controller;

pub use controller::{DocumentController, DocumentSnapshot, FetchStatus};
