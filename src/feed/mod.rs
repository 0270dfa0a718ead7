//! Feed retrieval and the new-item diff.
//!
//! - [`fetcher`] - one bounded HTTP GET of the feed document
//! - [`parser`] - RSS/Atom/JSON Feed parsing via `feed-rs`, source order kept
//! - [`diff`] - trimming already-posted items and ordering the rest oldest first
//!
//! # Example
//!
//! ```ignore
//! use rssbot::feed::fetch_feed;
//! use rssbot::state::Marker;
//!
//! let feed = fetch_feed(&client, &url, timeout).await?;
//! let pending = feed.pending_since(&Marker::decode(&description));
//! ```

mod diff;
mod fetcher;
mod parser;
mod types;

pub use fetcher::{fetch_feed, FeedError, FetchError};
pub use parser::{parse_feed, ParseError};
pub use types::{Feed, FeedItem};
