//! One relay run: fetch the feed, find new items, post them, move the marker.
//!
//! The marker in the chat description is written *before* each message is
//! sent. If the process dies between the two calls, the next run treats that
//! item as already posted: an item can be missed, but never posted twice.

use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::Config;
use crate::feed::{fetch_feed, FeedError};
use crate::message::{format_message, MessageFormat};
use crate::state::Marker;
use crate::telegram::{ApiError, TelegramClient};

const USER_AGENT: &str = concat!("rssbot/", env!("CARGO_PKG_VERSION"));

/// Why a run stopped early. Nothing is retried; the next run starts over.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Feed unavailable: {0}")]
    Feed(#[from] FeedError),
    #[error("Telegram API call failed: {0}")]
    Api(#[from] ApiError),
}

/// What a successful run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Items in the fetched feed.
    pub fetched: usize,
    /// Items newer than the marker.
    pub pending: usize,
    /// Items posted this run.
    pub posted: usize,
    /// New items left for a later run because of the message limit.
    pub remaining: usize,
}

/// Builds the HTTP client shared by the feed fetch and the Bot API calls.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// Relays one feed into one chat.
#[derive(Debug)]
pub struct Publisher {
    http: reqwest::Client,
    telegram: TelegramClient,
    feed_url: Url,
    message_limit: usize,
    timeout: Duration,
    format: MessageFormat,
    dry_run: bool,
}

impl Publisher {
    pub fn new(config: Config, http: reqwest::Client) -> Self {
        let telegram = TelegramClient::from_config(http.clone(), &config);
        Self {
            http,
            telegram,
            feed_url: config.feed_url,
            message_limit: config.message_limit,
            timeout: config.request_timeout,
            format: config.format,
            dry_run: false,
        }
    }

    /// In dry-run mode the feed and marker are read but nothing is written.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs the pipeline once.
    ///
    /// 1. Fetch the feed. On failure nothing has been changed.
    /// 2. Read the marker from the chat description.
    /// 3. Keep items newer than the marker, oldest first.
    /// 4. For each, up to the message limit: set the marker, then send.
    ///
    /// Hitting the message limit is not an error; the rest waits for the
    /// next run. Any failed call ends the run with the marker pointing at the
    /// last item attempted.
    pub async fn run(&self) -> Result<RunReport, PublishError> {
        let feed = fetch_feed(&self.http, &self.feed_url, self.timeout)
            .await
            .inspect_err(|e| tracing::error!(feed = %self.feed_url, error = %e, "Failed to fetch feed"))?;
        let fetched = feed.len();

        let description = self
            .telegram
            .get_chat_description()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to get chat description"))?;
        let marker = Marker::decode(&description);
        if marker.is_empty() {
            tracing::info!("No marker in chat description, treating every item as new");
        }

        let pending = feed.pending_since(&marker);
        let mut report = RunReport {
            fetched,
            pending: pending.len(),
            ..RunReport::default()
        };

        if pending.is_empty() {
            tracing::info!(fetched = fetched, "No new items to post");
            return Ok(report);
        }
        tracing::info!(fetched = fetched, new = pending.len(), "New items found");

        if self.dry_run {
            for item in pending.iter().take(self.message_limit) {
                tracing::info!(link = %item.link, "Dry run: would post item");
            }
            report.remaining = pending.len();
            return Ok(report);
        }

        for item in pending.iter().take(self.message_limit) {
            self.telegram
                .set_chat_description(&Marker::encode(&item.link))
                .await
                .inspect_err(|e| tracing::error!(link = %item.link, error = %e, "Failed to set chat description"))?;

            let text = format_message(item, &self.format);
            self.telegram
                .send_message(&text)
                .await
                .inspect_err(|e| tracing::error!(link = %item.link, error = %e, "Failed to send message"))?;

            report.posted += 1;
            tracing::info!(link = %item.link, "Posted item");
        }

        report.remaining = report.pending - report.posted;
        if report.remaining > 0 {
            tracing::info!(
                remaining = report.remaining,
                limit = self.message_limit,
                "Message limit reached, leaving the rest for the next run"
            );
        }

        Ok(report)
    }
}
