use crate::feed::fallback::fallback_posts;
use crate::feed::source::{candidate_urls, proxied_url};
use crate::feed::transform::{transform_item, DEFAULT_AUTHOR};
use crate::feed::types::{FeedEnvelope, Post, RawFeedItem};
use crate::util::{validate_proxy_url, UrlValidationError};
use futures::StreamExt;
use thiserror::Error;
use url::Url;

const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors that can occur while reading one feed source through the relay.
///
/// Inside [`FeedIngestor::fetch`] these are logged and the next source is
/// tried; only [`FeedIngestor::fetch_live`] and [`FeedIngestor::fetch_raw`]
/// hand them to the caller.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
    /// Body was not valid JSON, or not shaped like a relay envelope
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Relay answered but reported something other than `"ok"`
    #[error("Relay reported status {0:?}")]
    FeedStatus(Option<String>),
    /// Relay reported `"ok"` with no items
    #[error("Feed has no items")]
    NoItems,
    /// Every candidate source failed
    #[error("All {0} feed sources failed")]
    AllSourcesFailed(usize),
}

/// Pulls a Medium author's posts through the rss2json relay.
///
/// Cheap to clone (the inner `reqwest::Client` is reference counted) and
/// holds no mutable state, so one ingestor can serve concurrent callers.
///
/// # Example
///
/// ```ignore
/// let ingestor = FeedIngestor::new(reqwest::Client::new(), DEFAULT_PROXY_URL)?;
/// let posts = ingestor.fetch("jane", 6).await; // never fails
/// ```
#[derive(Debug, Clone)]
pub struct FeedIngestor {
    client: reqwest::Client,
    proxy: Url,
    default_author: String,
}

impl FeedIngestor {
    /// Creates an ingestor that sends requests through `proxy_url`.
    ///
    /// # Errors
    ///
    /// Returns [`UrlValidationError`] if `proxy_url` is not a usable relay
    /// base (see [`validate_proxy_url`]).
    pub fn new(client: reqwest::Client, proxy_url: &str) -> Result<Self, UrlValidationError> {
        let proxy = validate_proxy_url(proxy_url)?;
        Ok(Self {
            client,
            proxy,
            default_author: DEFAULT_AUTHOR.to_string(),
        })
    }

    /// Overrides the author written on posts whose feed item names none.
    pub fn with_default_author(mut self, author: impl Into<String>) -> Self {
        self.default_author = author.into();
        self
    }

    /// Fetches up to `limit` posts for `owner`.
    ///
    /// Candidate sources are tried one after another in fixed order; the
    /// first one yielding a non-empty item list wins, even if it holds fewer
    /// than `limit` items. When all of them fail the pinned fallback article
    /// is returned as the only element. This function never fails.
    ///
    /// A `limit` of 0 is treated as 1.
    pub async fn fetch(&self, owner: &str, limit: usize) -> Vec<Post> {
        match self.fetch_live(owner, limit).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!(owner = %owner, error = %e, "Serving pinned fallback article");
                fallback_posts()
            }
        }
    }

    /// Same source walk as [`fetch`](Self::fetch), without the fallback.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::AllSourcesFailed`] when no candidate produced
    /// items. Per-candidate errors are only logged.
    pub async fn fetch_live(&self, owner: &str, limit: usize) -> Result<Vec<Post>, FetchError> {
        let limit = limit.max(1);
        let candidates = candidate_urls(owner);

        for feed_url in &candidates {
            tracing::info!(feed = %feed_url, "Trying feed source");

            match self.fetch_items(feed_url).await {
                Ok(items) => {
                    let posts: Vec<Post> = items
                        .iter()
                        .take(limit)
                        .enumerate()
                        .map(|(index, item)| transform_item(item, index, &self.default_author))
                        .collect();
                    tracing::info!(
                        feed = %feed_url,
                        available = items.len(),
                        returned = posts.len(),
                        "Fetched posts"
                    );
                    return Ok(posts);
                }
                Err(e) => {
                    tracing::warn!(feed = %feed_url, error = %e, "Feed source failed, trying next");
                }
            }
        }

        Err(FetchError::AllSourcesFailed(candidates.len()))
    }

    /// Returns the relay's JSON response for the primary candidate source,
    /// untouched. Diagnostic aid for checking what the relay serves.
    ///
    /// # Errors
    ///
    /// Transport, status, size and JSON errors are returned as-is; the
    /// relay's own `status` field is not inspected.
    pub async fn fetch_raw(&self, owner: &str) -> Result<serde_json::Value, FetchError> {
        let [primary, ..] = candidate_urls(owner);
        let bytes = self.request(&primary).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Fetches one candidate and returns its items if the relay reported
    /// success with at least one item.
    async fn fetch_items(&self, feed_url: &str) -> Result<Vec<RawFeedItem>, FetchError> {
        let bytes = self.request(feed_url).await?;
        let envelope: FeedEnvelope = serde_json::from_slice(&bytes)?;

        let item_count = envelope.items.as_ref().map_or(0, Vec::len);
        tracing::debug!(
            feed = %feed_url,
            status = ?envelope.status,
            items = item_count,
            "Relay response"
        );

        if !envelope.is_ok() {
            return Err(FetchError::FeedStatus(envelope.status));
        }

        match envelope.items {
            Some(items) if !items.is_empty() => {
                Ok(items.into_iter().map(RawFeedItem::from_value).collect())
            }
            _ => Err(FetchError::NoItems),
        }
    }

    async fn request(&self, feed_url: &str) -> Result<Vec<u8>, FetchError> {
        let url = proxied_url(&self.proxy, feed_url);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        read_limited_bytes(response, MAX_RESPONSE_SIZE).await
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    // Fast path: check Content-Length header
    if let Some(len) = expected_length {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}
