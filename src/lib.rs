//! Relays new items from an RSS/Atom feed into a Telegram chat.
//!
//! There is no database: the link of the last item posted is kept in the
//! chat's description and read back on the next run. Each run is a single
//! pass of [`publisher::Publisher::run`].

pub mod config;
pub mod feed;
pub mod message;
pub mod publisher;
pub mod state;
pub mod telegram;
pub mod util;

pub use config::{Config, ConfigError};
pub use publisher::{build_http_client, PublishError, Publisher, RunReport};
