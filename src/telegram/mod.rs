//! Telegram Bot API client.
//!
//! Only the three methods the relay needs are wrapped: `sendMessage`,
//! `setChatDescription` and `getChat`. Responses are decoded into typed
//! schemas ([`types`]) rather than generic JSON maps.

mod client;
pub mod types;

pub use client::{ApiError, TelegramClient};
pub use types::{Chat, Message};

/// Public Bot API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Maximum length of a message text, in characters.
pub const MAX_MESSAGE_LEN: usize = 4096;
