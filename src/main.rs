use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use rssbot::{build_http_client, Config, Publisher};

#[derive(Parser, Debug)]
#[command(
    name = "rssbot",
    about = "Post new RSS feed items to a Telegram chat",
    long_about = "Post new RSS feed items to a Telegram chat.\n\n\
                  Required environment: TELEGRAM_BOT_TOKEN, TELEGRAM_CHAT_ID, RSS_FEED_URL.\n\
                  Run it from cron or any other scheduler; each invocation is one pass."
)]
struct Args {
    /// Optional TOML config file (environment variables take precedence)
    #[arg(long, value_name = "FILE", env = "RSSBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Fetch and diff, log what would be posted, change nothing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("rssbot=info")),
        )
        .init();

    let args = Args::parse();

    let config = Config::load(args.config.as_deref()).context("Invalid configuration")?;
    tracing::debug!(config = ?config, "Configuration loaded");

    let http = build_http_client(config.request_timeout).context("Failed to build HTTP client")?;
    let publisher = Publisher::new(config, http).with_dry_run(args.dry_run);

    match publisher.run().await {
        Ok(report) => {
            tracing::info!(
                fetched = report.fetched,
                new = report.pending,
                posted = report.posted,
                remaining = report.remaining,
                "Run complete"
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            Err(e).context("Run failed")
        }
    }
}
