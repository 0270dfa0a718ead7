//! Configuration for a relay run.
//!
//! Settings come from an optional TOML file and from environment variables,
//! with the environment taking precedence. The three required settings (bot
//! token, chat id, feed URL) are usually supplied through the environment
//! alone. Unknown file keys are accepted but logged as warnings.
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::message::MessageFormat;
use crate::telegram::DEFAULT_API_BASE;
use crate::util::{validate_api_base, validate_feed_url};

pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const ENV_FEED_URL: &str = "RSS_FEED_URL";
pub const ENV_API_URL: &str = "TELEGRAM_API_URL";
pub const ENV_MESSAGE_LIMIT: &str = "RSSBOT_MESSAGE_LIMIT";
pub const ENV_TIMEOUT_SECS: &str = "RSSBOT_TIMEOUT_SECS";

/// Telegram throttles bots that post in bursts, so a run stops after this many items.
pub const DEFAULT_MESSAGE_LIMIT: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// A required setting is set neither in the environment nor the file.
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Contents of the optional TOML config file.
///
/// Every key is optional; environment variables override any key set here.
///
/// Custom Debug impl masks `bot_token`.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub feed_url: Option<String>,
    pub api_base_url: Option<String>,
    pub message_limit: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub include_title: Option<bool>,
}

impl std::fmt::Debug for FileConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "[REDACTED]"))
            .field("chat_id", &self.chat_id)
            .field("feed_url", &self.feed_url)
            .field("api_base_url", &self.api_base_url)
            .field("message_limit", &self.message_limit)
            .field("timeout_secs", &self.timeout_secs)
            .field("include_title", &self.include_title)
            .finish()
    }
}

impl FileConfig {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 7] = [
        "bot_token",
        "chat_id",
        "feed_url",
        "api_base_url",
        "message_limit",
        "timeout_secs",
        "include_title",
    ];

    /// Load settings from a TOML file.
    ///
    /// - Missing file → `Ok(FileConfig::default())`
    /// - Empty file → `Ok(FileConfig::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using environment only");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File deleted between metadata and read
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using environment only");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: FileConfig = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), "Loaded config file");
        Ok(config)
    }
}

/// Resolved settings for one run, built once at startup.
///
/// Custom Debug impl masks `bot_token`.
#[derive(Clone)]
pub struct Config {
    pub bot_token: SecretString,
    /// Numeric chat id or `@channelusername`.
    pub chat_id: String,
    pub feed_url: Url,
    pub api_base_url: Url,
    /// Maximum items posted per run. Always at least 1.
    pub message_limit: usize,
    /// Bound on each HTTP call, feed and Bot API alike.
    pub request_timeout: Duration,
    pub format: MessageFormat,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .field("feed_url", &self.feed_url.as_str())
            .field("api_base_url", &self.api_base_url.as_str())
            .field("message_limit", &self.message_limit)
            .field("request_timeout", &self.request_timeout)
            .field("format", &self.format)
            .finish()
    }
}

impl Config {
    /// Builds the config from the process environment and an optional file.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merges file settings with values from `env`, which wins on conflicts.
    ///
    /// Empty or whitespace-only environment values count as unset.
    pub fn resolve(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let lookup = |key: &str, fallback: Option<String>| {
            env(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .or_else(|| fallback.filter(|v| !v.trim().is_empty()))
        };

        let bot_token = lookup(ENV_BOT_TOKEN, file.bot_token).ok_or(ConfigError::Missing(ENV_BOT_TOKEN))?;
        let chat_id = lookup(ENV_CHAT_ID, file.chat_id).ok_or(ConfigError::Missing(ENV_CHAT_ID))?;
        let feed_url = lookup(ENV_FEED_URL, file.feed_url).ok_or(ConfigError::Missing(ENV_FEED_URL))?;

        let feed_url = validate_feed_url(&feed_url).map_err(|e| ConfigError::Invalid {
            key: ENV_FEED_URL,
            reason: e.to_string(),
        })?;

        let api_base = lookup(ENV_API_URL, file.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let api_base_url = validate_api_base(&api_base).map_err(|e| ConfigError::Invalid {
            key: ENV_API_URL,
            reason: e.to_string(),
        })?;

        let message_limit = match env_parsed::<usize>(&lookup, ENV_MESSAGE_LIMIT)? {
            Some(limit) => limit,
            None => file.message_limit.unwrap_or(DEFAULT_MESSAGE_LIMIT),
        };
        if message_limit == 0 {
            return Err(ConfigError::Invalid {
                key: ENV_MESSAGE_LIMIT,
                reason: "must be at least 1".to_string(),
            });
        }

        let timeout_secs = match env_parsed::<u64>(&lookup, ENV_TIMEOUT_SECS)? {
            Some(secs) => secs,
            None => file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: ENV_TIMEOUT_SECS,
                reason: "must be at least 1".to_string(),
            });
        }

        let format = MessageFormat {
            include_title: file.include_title.unwrap_or(false),
        };

        Ok(Self {
            bot_token: SecretString::from(bot_token),
            chat_id,
            feed_url,
            api_base_url,
            message_limit,
            request_timeout: Duration::from_secs(timeout_secs),
            format,
        })
    }
}

fn env_parsed<T>(
    lookup: &impl Fn(&str, Option<String>) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key, None)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| ConfigError::Invalid {
                key,
                reason: format!("{:?}: {}", raw, e),
            })
        })
        .transpose()
}

// ============================================================================
// Tests
// ============================================================================
