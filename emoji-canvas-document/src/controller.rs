//! The document controller: intents, background resolution, snapshots.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};

use emoji_canvas_core::{Background, Document, Emoji, EmojiId};
use emoji_canvas_loader::{decode_image, BackgroundImage, ImageFetcher, LoadResult};

/// Whether a background-image fetch is outstanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    /// No fetch in flight.
    #[default]
    Idle,
    /// A background fetch is outstanding.
    Fetching,
}

/// A read-only snapshot of everything the rendering layer consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    /// All emojis in z-order.
    pub emojis: Vec<Emoji>,
    /// The current background value.
    pub background: Background,
    /// The decoded background image, if any.
    pub background_image: Option<BackgroundImage>,
    /// Whether a background fetch is outstanding.
    pub fetch_status: FetchStatus,
}

/// Result of a background fetch worker, handed back to the owner task.
struct FetchCompletion {
    /// Fetch generation at spawn time; stale generations are discarded.
    generation: u64,
    /// The background value the fetch was started for.
    background: Background,
    /// The fetched bytes, or the absorbed failure.
    result: LoadResult<Vec<u8>>,
}

/// Single-writer owner of a canvas document.
///
/// Construct one per document, pass it where it is needed, and drop it when
/// the document closes; there is no global instance. All methods take
/// `&mut self` - the controller is not designed for concurrent writers.
pub struct DocumentController {
    document: Document,
    background_image: Option<BackgroundImage>,
    fetch_status: FetchStatus,
    /// Bumped on every background change; completions carrying an older
    /// generation are ignored.
    fetch_generation: u64,
    fetcher: Arc<dyn ImageFetcher>,
    completion_tx: mpsc::UnboundedSender<FetchCompletion>,
    completion_rx: mpsc::UnboundedReceiver<FetchCompletion>,
    snapshot_tx: watch::Sender<DocumentSnapshot>,
}

impl DocumentController {
    /// Create a controller owning a new empty document.
    #[must_use]
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self::with_document(Document::new(), fetcher)
    }

    /// Create a controller owning an existing document.
    ///
    /// If the document's background needs resolution it is resolved
    /// immediately, so remote URLs start fetching right away. Like
    /// [`DocumentController::set_background`], this must run inside a Tokio
    /// runtime when the background is a remote URL.
    #[must_use]
    pub fn with_document(document: Document, fetcher: Arc<dyn ImageFetcher>) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let initial = DocumentSnapshot {
            emojis: document.emojis().to_vec(),
            background: document.background().clone(),
            background_image: None,
            fetch_status: FetchStatus::Idle,
        };
        let (snapshot_tx, _) = watch::channel(initial);
        let mut controller = Self {
            document,
            background_image: None,
            fetch_status: FetchStatus::Idle,
            fetch_generation: 0,
            fetcher,
            completion_tx,
            completion_rx,
            snapshot_tx,
        };
        if !controller.document.background().is_blank() {
            controller.resolve_background();
            controller.publish();
        }
        controller
    }

    // -----------------------------------------------------------------------
    // Intents
    // -----------------------------------------------------------------------

    /// Add an emoji at the given document coordinates.
    ///
    /// The size is truncated to the stored integer size, matching what
    /// drag-and-drop sources deliver. Empty text is rejected silently.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_emoji(&mut self, text: &str, x: i32, y: i32, size: f32) -> Option<EmojiId> {
        let id = self.document.add_emoji(text, x, y, size as i32);
        self.publish();
        id
    }

    /// Remove an emoji by id. Silent no-op if absent.
    pub fn remove_emoji(&mut self, id: EmojiId) {
        self.document.remove_emoji(id);
        self.publish();
    }

    /// Move an emoji by `(dx, dy)` document units. Silent no-op if absent.
    pub fn edit_emoji_coordinate(&mut self, id: EmojiId, dx: i32, dy: i32) {
        self.document.edit_emoji_coordinate(id, dx, dy);
        self.publish();
    }

    /// Multiply an emoji's size by an integer factor. Silent no-op if
    /// absent. See [`Document::edit_emoji_size`] for the precision caveat.
    pub fn edit_emoji_size(&mut self, id: EmojiId, scale: i32) {
        self.document.edit_emoji_size(id, scale);
        self.publish();
    }

    /// Scale an emoji's size by a fractional factor, rounding to the
    /// nearest integer size. Silent no-op if absent.
    pub fn scale_emoji(&mut self, id: EmojiId, factor: f32) {
        self.document.scale_emoji(id, factor);
        self.publish();
    }

    /// Replace the background.
    ///
    /// If the value actually changes, background resolution is triggered
    /// explicitly: the cached image is cleared and, for remote URLs, a
    /// fetch worker is spawned.
    pub fn set_background(&mut self, background: Background) {
        let changed = self.document.background() != &background;
        self.document.set_background(background);
        if changed {
            self.resolve_background();
        }
        self.publish();
    }

    // -----------------------------------------------------------------------
    // Read model
    // -----------------------------------------------------------------------

    /// All emojis in z-order.
    #[must_use]
    pub fn emojis(&self) -> &[Emoji] {
        self.document.emojis()
    }

    /// The current background value.
    #[must_use]
    pub fn background(&self) -> &Background {
        self.document.background()
    }

    /// The decoded background image, if one is currently published.
    #[must_use]
    pub fn background_image(&self) -> Option<&BackgroundImage> {
        self.background_image.as_ref()
    }

    /// Whether a background fetch is outstanding.
    #[must_use]
    pub fn fetch_status(&self) -> FetchStatus {
        self.fetch_status
    }

    /// The owned document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// An owned snapshot of the full read model.
    #[must_use]
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            emojis: self.document.emojis().to_vec(),
            background: self.document.background().clone(),
            background_image: self.background_image.clone(),
            fetch_status: self.fetch_status,
        }
    }

    /// Subscribe to snapshots republished after every mutation and every
    /// applied fetch completion.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DocumentSnapshot> {
        self.snapshot_tx.subscribe()
    }

    // -----------------------------------------------------------------------
    // Fetch completion pumping (owner context only)
    // -----------------------------------------------------------------------

    /// Drain all queued fetch completions without blocking.
    ///
    /// Returns the number of completions that were actually applied;
    /// superseded completions are discarded and not counted.
    pub fn pump_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completion_rx.try_recv() {
            if self.apply_completion(completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Await one fetch completion and apply it.
    ///
    /// Only await this while [`DocumentController::fetch_status`] is
    /// [`FetchStatus::Fetching`]; with no fetch in flight it never resolves.
    /// Returns whether the completion was applied (superseded completions
    /// are received but discarded).
    pub async fn next_completion(&mut self) -> bool {
        match self.completion_rx.recv().await {
            Some(completion) => self.apply_completion(completion),
            None => false,
        }
    }

    /// Pump fetch completions until no fetch is outstanding.
    pub async fn run_until_idle(&mut self) {
        while self.fetch_status == FetchStatus::Fetching {
            match self.completion_rx.recv().await {
                Some(completion) => {
                    self.apply_completion(completion);
                }
                None => break,
            }
        }
    }

    // -----------------------------------------------------------------------
    // Background resolution
    // -----------------------------------------------------------------------

    /// Resolve the current background value into a decoded image.
    ///
    /// Called explicitly whenever the background value changes. Clears the
    /// cached image, then decodes inline data synchronously or spawns a
    /// fetch worker for remote URLs. Bumping the generation here is what
    /// invalidates any still-in-flight fetch.
    fn resolve_background(&mut self) {
        self.background_image = None;
        self.fetch_generation += 1;

        match self.document.background() {
            Background::Blank => {
                self.fetch_status = FetchStatus::Idle;
            }
            Background::ImageData(bytes) => {
                self.fetch_status = FetchStatus::Idle;
                match decode_image(bytes) {
                    Ok(image) => self.background_image = Some(image),
                    Err(e) => tracing::warn!("Inline background decode failed: {e}"),
                }
            }
            Background::Url(url) => {
                self.fetch_status = FetchStatus::Fetching;
                let url = url.clone();
                let background = self.document.background().clone();
                let generation = self.fetch_generation;
                let fetcher = Arc::clone(&self.fetcher);
                let tx = self.completion_tx.clone();
                tokio::spawn(async move {
                    let result = fetcher.fetch(&url).await;
                    // The owner may be gone; nothing to do then.
                    let _ = tx.send(FetchCompletion {
                        generation,
                        background,
                        result,
                    });
                });
            }
        }
    }

    /// Apply one fetch completion on the owner task.
    ///
    /// A completion is applied only if it belongs to the current fetch
    /// generation *and* the live background still equals the value captured
    /// at fetch start. Superseded completions leave status and image
    /// untouched.
    fn apply_completion(&mut self, completion: FetchCompletion) -> bool {
        if completion.generation != self.fetch_generation {
            tracing::debug!(
                "Discarding fetch completion from superseded generation {}",
                completion.generation
            );
            return false;
        }
        if self.document.background() != &completion.background {
            tracing::debug!("Discarding stale fetch for {}", completion.background);
            return false;
        }

        self.fetch_status = FetchStatus::Idle;
        match completion.result.and_then(|bytes| decode_image(&bytes)) {
            Ok(image) => {
                tracing::debug!(
                    "Background image resolved: {}x{}",
                    image.width,
                    image.height
                );
                self.background_image = Some(image);
            }
            Err(e) => {
                // Absorbed: the background stays imageless.
                tracing::warn!("Background fetch for {} failed: {e}", completion.background);
            }
        }
        self.publish();
        true
    }

    /// Republish the snapshot for observers.
    fn publish(&self) {
        self.snapshot_tx.send_replace(self.snapshot());
    }
}
