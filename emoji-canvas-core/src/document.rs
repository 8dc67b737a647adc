//! The canvas document - an ordered list of placed emojis plus a background.

use serde::{Deserialize, Serialize};

use crate::{Background, CoreError, CoreResult};

/// Unique identifier for an emoji within a document.
///
/// Ids are allocated monotonically starting at 1, are unique within a
/// document, and are never reused after removal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EmojiId(u32);

impl EmojiId {
    /// Create an id from a raw value.
    ///
    /// Intended for test fixtures and for UI layers that round-trip ids
    /// through external representations; documents allocate their own ids.
    #[must_use]
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw id value.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EmojiId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An emoji sticker placed on the canvas.
///
/// `x`/`y` are offsets from the document origin (the center), in document
/// units. `size` is the logical font size at zoom 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Emoji {
    /// Unique identifier within the owning document.
    pub id: EmojiId,
    /// Display text, a single emoji grapheme. Grapheme validation is the
    /// UI collaborator's job; the model only rejects empty text.
    pub text: String,
    /// Horizontal offset from the document center.
    pub x: i32,
    /// Vertical offset from the document center.
    pub y: i32,
    /// Logical font size at zoom 1.
    pub size: i32,
}

/// The canvas document: one background plus an ordered emoji list.
///
/// Emoji order is z-order (insertion order) and is not otherwise
/// meaningful. The document is a plain value owned by a single writer;
/// mutations never produce an observable half-applied state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    background: Background,
    emojis: Vec<Emoji>,
    last_id: u32,
}

impl Document {
    /// Create a new empty document with a blank background.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an emoji at the given document coordinates.
    ///
    /// Allocates the next unique id and appends to the end of the z-order.
    /// Empty text is rejected silently: the document is left unchanged and
    /// `None` is returned.
    pub fn add_emoji(&mut self, text: &str, x: i32, y: i32, size: i32) -> Option<EmojiId> {
        if text.is_empty() {
            tracing::warn!("Rejected emoji with empty text");
            return None;
        }
        self.last_id += 1;
        let id = EmojiId(self.last_id);
        self.emojis.push(Emoji {
            id,
            text: text.to_string(),
            x,
            y,
            size,
        });
        tracing::debug!("Added emoji {id} ({text}) at ({x}, {y}) size {size}");
        Some(id)
    }

    /// Remove the emoji with the given id.
    ///
    /// Silent no-op if no such emoji exists; removing twice is idempotent.
    pub fn remove_emoji(&mut self, id: EmojiId) {
        if let Some(index) = self.index_of(id) {
            self.emojis.remove(index);
            tracing::debug!("Removed emoji {id}");
        }
    }

    /// Move the emoji with the given id by `(dx, dy)` document units.
    ///
    /// Silent no-op if no such emoji exists.
    pub fn edit_emoji_coordinate(&mut self, id: EmojiId, dx: i32, dy: i32) {
        if let Some(index) = self.index_of(id) {
            let emoji = &mut self.emojis[index];
            emoji.x += dx;
            emoji.y += dy;
        }
    }

    /// Multiply the size of the emoji with the given id by an integer factor.
    ///
    /// Silent no-op if no such emoji exists. The factor is applied as a
    /// whole-number multiplier to the stored integer size; callers holding
    /// a fractional zoom ratio should use [`Document::scale_emoji`] instead
    /// of pre-truncating here.
    pub fn edit_emoji_size(&mut self, id: EmojiId, scale: i32) {
        if let Some(index) = self.index_of(id) {
            self.emojis[index].size *= scale;
        }
    }

    /// Scale the size of the emoji with the given id by a fractional
    /// factor, rounding to the nearest integer size.
    ///
    /// Silent no-op if no such emoji exists.
    pub fn scale_emoji(&mut self, id: EmojiId, factor: f32) {
        if let Some(index) = self.index_of(id) {
            let emoji = &mut self.emojis[index];
            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
            {
                emoji.size = (emoji.size as f32 * factor).round() as i32;
            }
        }
    }

    /// Replace the background unconditionally.
    pub fn set_background(&mut self, background: Background) {
        tracing::debug!("Background set to {background}");
        self.background = background;
    }

    /// The current background value.
    #[must_use]
    pub fn background(&self) -> &Background {
        &self.background
    }

    /// All emojis in z-order (insertion order).
    #[must_use]
    pub fn emojis(&self) -> &[Emoji] {
        &self.emojis
    }

    /// Look up an emoji by id.
    #[must_use]
    pub fn emoji(&self, id: EmojiId) -> Option<&Emoji> {
        self.emojis.iter().find(|e| e.id == id)
    }

    /// The number of emojis in the document.
    #[must_use]
    pub fn emoji_count(&self) -> usize {
        self.emojis.len()
    }

    /// Whether the document has no emojis.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emojis.is_empty()
    }

    /// Serialize the document to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string(self).map_err(CoreError::Serialization)
    }

    /// Deserialize a document from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(CoreError::Serialization)
    }

    /// Index of the first emoji matching by id, if any.
    fn index_of(&self, id: EmojiId) -> Option<usize> {
        self.emojis.iter().position(|e| e.id == id)
    }
}
