use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::Config;
use crate::telegram::types::{
    ApiResponse, Chat, GetChat, Message, SendMessage, SetChatDescription,
};

/// Errors from a Bot API call.
///
/// Transport failures (`Transport`, `Timeout`) mean the request may never
/// have reached Telegram. The other variants mean Telegram answered and
/// refused or sent something unusable.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS or body read failure. The URL (which contains the
    /// token) is stripped from the inner error.
    #[error("{method}: request failed: {source}")]
    Transport {
        method: &'static str,
        source: reqwest::Error,
    },
    #[error("{method}: request timed out after {timeout:?}")]
    Timeout {
        method: &'static str,
        timeout: Duration,
    },
    /// Non-200 HTTP status.
    #[error("{method}: HTTP status {status}: {}", .description.as_deref().unwrap_or("no description"))]
    HttpStatus {
        method: &'static str,
        status: u16,
        description: Option<String>,
        retry_after: Option<u64>,
    },
    /// HTTP 200 but `ok` was false or missing.
    #[error("{method}: API did not return OK: {}", .description.as_deref().unwrap_or("no description"))]
    NotOk {
        method: &'static str,
        error_code: Option<i32>,
        description: Option<String>,
    },
    #[error("{method}: invalid response body: {source}")]
    Decode {
        method: &'static str,
        source: serde_json::Error,
    },
    #[error("{method}: response has no result")]
    MissingResult { method: &'static str },
}

impl ApiError {
    /// True if the request failed before Telegram gave an answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. } | ApiError::Timeout { .. })
    }

    /// Flood-control wait reported by Telegram, in seconds.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            ApiError::HttpStatus { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    fn description(&self) -> Option<&str> {
        match self {
            ApiError::HttpStatus { description, .. } | ApiError::NotOk { description, .. } => {
                description.as_deref()
            }
            _ => None,
        }
    }

    /// Telegram rejects setting a description to its current value.
    fn is_not_modified(&self) -> bool {
        self.description()
            .is_some_and(|d| d.to_ascii_lowercase().contains("is not modified"))
    }
}

/// Bot API client bound to one bot token and one chat.
///
/// Every call is a JSON POST to `{base}/bot{token}/{method}`, bounded by the
/// configured timeout.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: Url,
    token: SecretString,
    chat_id: String,
    timeout: Duration,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TelegramClient {
    pub fn new(
        http: reqwest::Client,
        base_url: Url,
        token: SecretString,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            base_url,
            token,
            chat_id: chat_id.into(),
            timeout,
        }
    }

    pub fn from_config(http: reqwest::Client, config: &Config) -> Self {
        Self::new(
            http,
            config.api_base_url.clone(),
            config.bot_token.clone(),
            config.chat_id.clone(),
            config.request_timeout,
        )
    }

    /// Posts `text` to the chat.
    pub async fn send_message(&self, text: &str) -> Result<Message, ApiError> {
        let params = SendMessage {
            chat_id: &self.chat_id,
            text,
        };
        self.call("sendMessage", &params).await
    }

    /// Replaces the chat description.
    ///
    /// Setting the description it already has counts as success.
    pub async fn set_chat_description(&self, description: &str) -> Result<(), ApiError> {
        let params = SetChatDescription {
            chat_id: &self.chat_id,
            description,
        };
        match self.call::<_, bool>("setChatDescription", &params).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_modified() => {
                tracing::debug!("Chat description already up to date");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn get_chat(&self) -> Result<Chat, ApiError> {
        let params = GetChat {
            chat_id: &self.chat_id,
        };
        self.call("getChat", &params).await
    }

    /// Current chat description, or an empty string if the chat has none.
    pub async fn get_chat_description(&self) -> Result<String, ApiError> {
        let chat = self.get_chat().await?;
        Ok(chat.description.unwrap_or_default())
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            self.token.expose_secret(),
            method
        )
    }

    async fn call<P, R>(&self, method: &'static str, params: &P) -> Result<R, ApiError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        tracing::debug!(method = method, chat_id = %self.chat_id, "Calling Bot API");

        let (status, body) = tokio::time::timeout(self.timeout, self.post(method, params))
            .await
            .map_err(|_| ApiError::Timeout {
                method,
                timeout: self.timeout,
            })??;

        let parsed = serde_json::from_slice::<ApiResponse<R>>(&body);

        if status != reqwest::StatusCode::OK {
            let (description, retry_after) = match parsed {
                Ok(resp) => (
                    resp.description,
                    resp.parameters.and_then(|p| p.retry_after),
                ),
                Err(_) => (None, None),
            };
            let err = ApiError::HttpStatus {
                method,
                status: status.as_u16(),
                description,
                retry_after,
            };
            tracing::debug!(method = method, status = %status, error = %err, "Bot API call failed");
            return Err(err);
        }

        let resp = parsed.map_err(|source| ApiError::Decode { method, source })?;

        if !resp.ok {
            let err = ApiError::NotOk {
                method,
                error_code: resp.error_code,
                description: resp.description,
            };
            tracing::debug!(method = method, error = %err, "Bot API returned not OK");
            return Err(err);
        }

        resp.result.ok_or(ApiError::MissingResult { method })
    }

    async fn post<P>(
        &self,
        method: &'static str,
        params: &P,
    ) -> Result<(reqwest::StatusCode, Vec<u8>), ApiError>
    where
        P: Serialize + ?Sized,
    {
        let transport = |e: reqwest::Error| ApiError::Transport {
            method,
            source: e.without_url(),
        };

        let response = self
            .http
            .post(self.method_url(method))
            .json(params)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport)?;
        Ok((status, body.to_vec()))
    }
}
