//! Integration tests for asynchronous background resolution.
//!
//! Uses a gated fake fetcher so completion order is fully under test
//! control: each fetch parks until the test resolves it, which makes the
//! superseded-fetch scenarios deterministic.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use tokio::sync::{mpsc, oneshot};
use url::Url;

use emoji_canvas_core::Background;
use emoji_canvas_document::{DocumentController, FetchStatus};
use emoji_canvas_loader::{ImageFetcher, LoadError, LoadResult};

/// A minimal valid 1x1 PNG.
const TINY_PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

fn tiny_png() -> Vec<u8> {
    base64::engine::general_purpose::STANDARD
        .decode(TINY_PNG_BASE64)
        .expect("valid base64")
}

/// A fetch the [`GatedFetcher`] has parked, waiting for the test to resolve.
struct PendingFetch {
    url: Url,
    respond: oneshot::Sender<LoadResult<Vec<u8>>>,
}

impl PendingFetch {
    fn resolve(self, result: LoadResult<Vec<u8>>) {
        self.respond.send(result).ok();
    }
}

/// Fetcher whose every call parks until the test resolves it.
struct GatedFetcher {
    requests: mpsc::UnboundedSender<PendingFetch>,
}

impl GatedFetcher {
    fn new() -> (Self, mpsc::UnboundedReceiver<PendingFetch>) {
        let (requests, pending) = mpsc::unbounded_channel();
        (Self { requests }, pending)
    }
}

#[async_trait]
impl ImageFetcher for GatedFetcher {
    async fn fetch(&self, url: &Url) -> LoadResult<Vec<u8>> {
        let (respond, gate) = oneshot::channel();
        self.requests
            .send(PendingFetch {
                url: url.clone(),
                respond,
            })
            .map_err(|_| LoadError::Fetch("test gate closed".to_string()))?;
        gate.await
            .unwrap_or_else(|_| Err(LoadError::Fetch("test gate dropped".to_string())))
    }
}

fn url_background(raw: &str) -> Background {
    Background::Url(Url::parse(raw).expect("valid url"))
}

fn gated_controller() -> (DocumentController, mpsc::UnboundedReceiver<PendingFetch>) {
    let (fetcher, pending) = GatedFetcher::new();
    (DocumentController::new(Arc::new(fetcher)), pending)
}

#[tokio::test]
async fn url_background_starts_exactly_one_fetch() {
    let (mut controller, mut pending) = gated_controller();
    let background = url_background("https://example.com/a.png");
    controller.set_background(background.clone());

    assert_eq!(controller.fetch_status(), FetchStatus::Fetching);
    assert!(controller.background_image().is_none());

    let fetch = pending.recv().await.expect("one fetch spawned");
    assert_eq!(fetch.url.as_str(), "https://example.com/a.png");

    fetch.resolve(Ok(tiny_png()));
    assert!(controller.next_completion().await);

    assert_eq!(controller.fetch_status(), FetchStatus::Idle);
    assert_eq!(controller.background(), &background);
    let image = controller.background_image().expect("image published");
    assert_eq!((image.width, image.height), (1, 1));
}

#[tokio::test]
async fn superseded_fetch_is_discarded_entirely() {
    let (mut controller, mut pending) = gated_controller();
    controller.set_background(url_background("https://example.com/a.png"));
    let fetch_a = pending.recv().await.expect("fetch for A");

    // Supersede A before its fetch completes.
    let background_b = url_background("https://example.com/b.png");
    controller.set_background(background_b.clone());
    let fetch_b = pending.recv().await.expect("fetch for B");

    // A resolving now must change nothing: not the status, not the image.
    fetch_a.resolve(Ok(tiny_png()));
    assert!(!controller.next_completion().await);
    assert_eq!(controller.fetch_status(), FetchStatus::Fetching);
    assert!(controller.background_image().is_none());

    // Only B's outcome is ever acted on.
    fetch_b.resolve(Ok(tiny_png()));
    assert!(controller.next_completion().await);
    assert_eq!(controller.fetch_status(), FetchStatus::Idle);
    assert_eq!(controller.background(), &background_b);
    assert!(controller.background_image().is_some());
}

#[tokio::test]
async fn refetch_of_same_url_ignores_the_older_fetch() {
    let (mut controller, mut pending) = gated_controller();
    let background_a = url_background("https://example.com/a.png");

    // A, then B, then back to A: two live fetches for the same URL value.
    controller.set_background(background_a.clone());
    let first_a = pending.recv().await.expect("first fetch for A");
    controller.set_background(url_background("https://example.com/b.png"));
    let fetch_b = pending.recv().await.expect("fetch for B");
    controller.set_background(background_a.clone());
    let second_a = pending.recv().await.expect("second fetch for A");

    // Both outdated fetches are discarded regardless of resolution order.
    fetch_b.resolve(Ok(tiny_png()));
    first_a.resolve(Err(LoadError::Fetch("connection reset".to_string())));
    assert!(!controller.next_completion().await);
    assert!(!controller.next_completion().await);
    assert_eq!(controller.fetch_status(), FetchStatus::Fetching);
    assert!(controller.background_image().is_none());

    second_a.resolve(Ok(tiny_png()));
    assert!(controller.next_completion().await);
    assert_eq!(controller.fetch_status(), FetchStatus::Idle);
    assert_eq!(controller.background(), &background_a);
    assert!(controller.background_image().is_some());
}

#[tokio::test]
async fn fetch_failure_returns_to_idle_without_image() {
    let (mut controller, mut pending) = gated_controller();
    controller.set_background(url_background("https://example.com/missing.png"));

    let fetch = pending.recv().await.expect("fetch spawned");
    fetch.resolve(Err(LoadError::Fetch("404".to_string())));

    assert!(controller.next_completion().await);
    assert_eq!(controller.fetch_status(), FetchStatus::Idle);
    assert!(controller.background_image().is_none());
}

#[tokio::test]
async fn undecodable_fetched_bytes_return_to_idle_without_image() {
    let (mut controller, mut pending) = gated_controller();
    controller.set_background(url_background("https://example.com/broken.png"));

    let fetch = pending.recv().await.expect("fetch spawned");
    fetch.resolve(Ok(b"these bytes are not an image".to_vec()));

    assert!(controller.next_completion().await);
    assert_eq!(controller.fetch_status(), FetchStatus::Idle);
    assert!(controller.background_image().is_none());
}

#[tokio::test]
async fn setting_blank_while_fetching_supersedes_the_fetch() {
    let (mut controller, mut pending) = gated_controller();
    controller.set_background(url_background("https://example.com/a.png"));
    let fetch = pending.recv().await.expect("fetch spawned");
    assert_eq!(controller.fetch_status(), FetchStatus::Fetching);

    // Blank immediately clears the image and returns to idle.
    controller.set_background(Background::Blank);
    assert_eq!(controller.fetch_status(), FetchStatus::Idle);
    assert!(controller.background_image().is_none());

    // The late completion is received but discarded.
    fetch.resolve(Ok(tiny_png()));
    assert!(!controller.next_completion().await);
    assert_eq!(controller.fetch_status(), FetchStatus::Idle);
    assert!(controller.background_image().is_none());
}

#[tokio::test]
async fn run_until_idle_drains_superseded_completions() {
    let (mut controller, mut pending) = gated_controller();
    controller.set_background(url_background("https://example.com/a.png"));
    let fetch_a = pending.recv().await.expect("fetch for A");
    let background_b = url_background("https://example.com/b.png");
    controller.set_background(background_b.clone());
    let fetch_b = pending.recv().await.expect("fetch for B");

    fetch_a.resolve(Ok(tiny_png()));
    fetch_b.resolve(Ok(tiny_png()));

    controller.run_until_idle().await;
    assert_eq!(controller.fetch_status(), FetchStatus::Idle);
    assert_eq!(controller.background(), &background_b);
    assert!(controller.background_image().is_some());
}

#[tokio::test]
async fn pump_completions_counts_only_applied_results() {
    let (mut controller, mut pending) = gated_controller();
    controller.set_background(url_background("https://example.com/a.png"));
    let fetch_a = pending.recv().await.expect("fetch for A");
    controller.set_background(url_background("https://example.com/b.png"));
    let fetch_b = pending.recv().await.expect("fetch for B");

    fetch_a.resolve(Ok(tiny_png()));
    fetch_b.resolve(Ok(tiny_png()));
    // Let both worker tasks forward their completions.
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;

    assert_eq!(controller.pump_completions(), 1);
    assert_eq!(controller.fetch_status(), FetchStatus::Idle);
}

#[tokio::test]
async fn snapshot_subscribers_see_the_fetch_outcome() {
    let (mut controller, mut pending) = gated_controller();
    let mut snapshots = controller.subscribe();

    controller.set_background(url_background("https://example.com/a.png"));
    assert_eq!(
        snapshots.borrow_and_update().fetch_status,
        FetchStatus::Fetching
    );

    let fetch = pending.recv().await.expect("fetch spawned");
    fetch.resolve(Ok(tiny_png()));
    assert!(controller.next_completion().await);

    let snapshot = snapshots.borrow_and_update().clone();
    assert_eq!(snapshot.fetch_status, FetchStatus::Idle);
    assert!(snapshot.background_image.is_some());
}
