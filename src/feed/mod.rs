//! Medium feed ingestion.
//!
//! Medium publishes each author's posts as RSS, without CORS headers and
//! under several equivalent URLs. This module reads that feed through the
//! rss2json relay and turns each item into a [`Post`]:
//!
//! - **Sources**: candidate feed URLs for an author, wrapped in relay requests
//! - **Fetching**: a single ordered pass over the candidates, first usable
//!   response wins, pinned fallback article otherwise
//! - **Transform**: excerpt, read time, category, slug and featured flag
//!
//! # Architecture
//!
//! - [`source`] - Candidate URL shapes and relay URL wrapping
//! - [`fetcher`] - [`FeedIngestor`], the HTTP side
//! - [`transform`] - Pure item-to-post mapping
//! - [`fallback`] - The pinned article
//! - [`types`] - Relay wire types and the [`Post`] record
//!
//! # Example
//!
//! ```ignore
//! use mediumfeed::feed::{FeedIngestor, DEFAULT_PROXY_URL};
//!
//! let ingestor = FeedIngestor::new(reqwest::Client::new(), DEFAULT_PROXY_URL)?;
//! let posts = ingestor.fetch("jane", 6).await;
//! ```

mod fallback;
mod fetcher;
mod source;
mod transform;
mod types;

pub use fallback::fallback_posts;
pub use fetcher::{FeedIngestor, FetchError};
pub use source::{candidate_urls, proxied_url, DEFAULT_PROXY_URL};
pub use transform::{
    classify, excerpt, read_time_minutes, slugify, transform_item, DEFAULT_AUTHOR, EXCERPT_CHARS,
    FEATURED_COUNT, MAX_TAGS, WORDS_PER_MINUTE,
};
pub use types::{Category, FeedEnvelope, Post, RawFeedItem};
