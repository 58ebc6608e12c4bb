//! Utility functions for common operations.
//!
//! This module provides reusable utilities for:
//!
//! - **Text cleanup**: stripping HTML tags and entities out of feed bodies
//! - **URL validation**: making sure the relay service is reached over HTTPS
//!
//! # Examples
//!
//! ```
//! use mediumfeed::util::{collapse_whitespace, strip_entities, strip_tags};
//!
//! let html = "<p>Fish&amp;chips   tonight</p>";
//! let text = collapse_whitespace(&strip_entities(&strip_tags(html))).into_owned();
//! assert_eq!(text, "Fish chips tonight");
//! ```

mod text;
mod url_validator;

pub(crate) use text::compiled;
pub use text::{collapse_whitespace, strip_entities, strip_tags, truncate_chars, word_count};
pub use url_validator::{validate_proxy_url, UrlValidationError};
