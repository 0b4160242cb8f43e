//! Media search bot for Telegram
//!
//! # Usage
//!
//! ```bash
//! # Required: TELEGRAM_TOKEN, TMDB_API_KEY, CHANNEL_ID
//! # Optional: MY_CHAT_ID enables publishing to the channel
//! cargo run --bin media-bot -- --env-file .env
//!
//! # Verify both credentials and exit
//! cargo run --bin media-bot -- --check
//! ```

use anyhow::Context;
use clap::Parser;
use media_bot::platforms::{TelegramBot, TelegramClient, TelegramConfig};
use media_bot::{BotConfig, MediaBot};
use media_core::MediaKind;
use media_tmdb::TmdbClient;
use media_utils::logging::DEFAULT_FILTER;
use media_utils::{init_tracing, load_env_file};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "media-bot", version, about = "Movie and TV search bot for Telegram")]
struct Cli {
    /// Load environment variables from this file instead of ./.env
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Check the Telegram and TMDB credentials, then exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = load_env_file(cli.env_file.as_deref())?;
    init_tracing(DEFAULT_FILTER);
    if let Some(path) = loaded {
        info!("Loaded environment from {}", path.display());
    }

    let telegram_config = TelegramConfig::from_env()?;
    let tmdb = Arc::new(TmdbClient::from_env()?);
    let mut config = BotConfig::from_env()?;
    config.image_base = tmdb.image_base();

    let telegram = Arc::new(TelegramClient::new(telegram_config)?);
    let me = telegram
        .get_me()
        .await
        .context("Telegram rejected the bot token")?;
    info!(username = ?me.username, "Connected to Telegram");

    if cli.check {
        let genres = tmdb
            .genres(MediaKind::Movie)
            .await
            .context("TMDB credential check failed")?;
        println!(
            "ok: telegram bot @{}, tmdb returned {} movie genres",
            me.username.as_deref().unwrap_or(&me.first_name),
            genres.len()
        );
        return Ok(());
    }

    config.bot_username = me.username;
    if config.publishing_enabled() {
        info!(channel = %config.channel, "Publishing enabled");
    }

    let bot = Arc::new(MediaBot::new(tmdb, telegram.clone(), config));
    TelegramBot::new(telegram, bot).run().await?;

    Ok(())
}
