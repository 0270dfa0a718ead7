//! Request and response schemas for the Bot API methods the relay uses.
//!
//! See <https://core.telegram.org/bots/api#making-requests>.

use serde::{Deserialize, Serialize};

/// Envelope every Bot API response is wrapped in.
///
/// A missing `ok` is treated the same as `ok: false`.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub ok: bool,
    pub result: Option<T>,
    /// Human-readable error text, present when `ok` is false.
    pub description: Option<String>,
    pub error_code: Option<i32>,
    pub parameters: Option<ResponseParameters>,
}

/// Extra error details, e.g. flood-control wait time.
#[derive(Debug, Default, Deserialize)]
pub struct ResponseParameters {
    pub retry_after: Option<u64>,
}

/// The subset of the `Chat` object the relay reads.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    /// Absent when the chat has never had a description.
    #[serde(default)]
    pub description: Option<String>,
}

/// The subset of the `Message` object returned by `sendMessage`.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendMessage<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SetChatDescription<'a> {
    pub chat_id: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct GetChat<'a> {
    pub chat_id: &'a str,
}
