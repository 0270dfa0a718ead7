//! Utility functions for common operations.
//!
//! This module provides reusable utilities for:
//!
//! - **URL validation**: scheme checks for the feed URL and the HTTPS rule for
//!   the Bot API base (the bot token travels in the request path)
//! - **Text processing**: cleanup and length capping for outgoing messages
//!
//! # Examples
//!
//! ```
//! use rssbot::util::{validate_feed_url, truncate_chars};
//!
//! let url = validate_feed_url("https://example.com/feed.xml").unwrap();
//! assert_eq!(url.host_str(), Some("example.com"));
//!
//! assert_eq!(truncate_chars("Hello World", 8), "Hello...");
//! ```

mod text;
mod url_validator;

pub use text::{clean_text, strip_control_chars, strip_html_tags, truncate_chars};
pub use url_validator::{validate_api_base, validate_feed_url, UrlValidationError};
