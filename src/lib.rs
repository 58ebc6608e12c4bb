//! Medium posts for a personal site.
//!
//! [`feed::FeedIngestor`] reads an author's Medium feed through the rss2json
//! relay and returns normalized [`feed::Post`] records, degrading to a
//! pinned article when every source fails. [`listing`] holds the filtering,
//! ordering and pagination used to present those posts, and [`config`] the
//! optional TOML configuration.

pub mod config;
pub mod feed;
pub mod listing;
pub mod util;
