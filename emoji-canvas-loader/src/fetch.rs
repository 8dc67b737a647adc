//! Async fetching of remote background images.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::{LoadError, LoadResult};

/// Default timeout for background fetches, in seconds.
///
/// The document contract only requires that fetches run to completion or
/// failure; the timeout is a hardening measure so an unreachable host
/// cannot pin the fetch status forever.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Source of raw image bytes for a remote background.
///
/// The controller spawns fetches through this trait so tests can
/// substitute deterministic fakes for the network.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Fetch the raw bytes behind `url`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Fetch`] on connection, timeout, or HTTP status
    /// failures.
    async fn fetch(&self, url: &Url) -> LoadResult<Vec<u8>>;
}

/// HTTP image fetcher backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default timeout.
    ///
    /// The timeout can be overridden with `EMOJI_CANVAS_FETCH_TIMEOUT_SECS`.
    #[must_use]
    pub fn new() -> Self {
        let secs = std::env::var("EMOJI_CANVAS_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self::with_timeout(Duration::from_secs(secs))
    }

    /// Create a fetcher with an explicit timeout.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> LoadResult<Vec<u8>> {
        tracing::debug!("Fetching background image from {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| LoadError::Fetch(e.to_string()))?
            .error_for_status()
            .map_err(|e| LoadError::Fetch(e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LoadError::Fetch(e.to_string()))?;
        tracing::debug!("Fetched {} bytes from {url}", bytes.len());
        Ok(bytes.to_vec())
    }
}
