//! Telegram bot for looking up movies and TV shows
//!
//! Users send a title, pick one of the numbered matches and get back a poster
//! with a caption built from the metadata service. One configured publisher
//! chat can also draft a post, attach a note and send it to a channel.
//!
//! # Architecture
//!
//! - [`MediaBot`] maps chat events to responses and owns per-chat sessions
//!   plus the publisher's draft.
//! - [`Renderer`] turns a [`media_core::MediaDetail`] into a captioned
//!   [`Post`] within the caption budget.
//! - [`platforms::telegram`] long-polls the Bot API and delivers responses.
//!
//! # Example
//!
//! ```rust,ignore
//! use media_bot::{BotConfig, MediaBot, Recipient};
//! use media_bot::platforms::{TelegramBot, TelegramClient};
//! use media_tmdb::TmdbClient;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let tmdb = Arc::new(TmdbClient::from_env()?);
//!     let telegram = Arc::new(TelegramClient::from_env()?);
//!     let config = BotConfig::builder()
//!         .channel("@my_channel".parse::<Recipient>().map_err(anyhow::Error::msg)?)
//!         .image_base(tmdb.image_base())
//!         .build()?;
//!
//!     let bot = Arc::new(MediaBot::new(tmdb, telegram.clone(), config));
//!     TelegramBot::new(telegram, bot).run().await?;
//!     Ok(())
//! }
//! ```

pub mod bot;
pub mod config;
pub mod draft;
pub mod error;
pub mod platforms;
pub mod render;
pub mod search;
pub mod session;

#[cfg(test)]
mod testing;

pub use bot::{BotResponse, Event, InlineArticle, Keyboard, MediaBot};
pub use config::BotConfig;
pub use draft::{Broadcaster, DraftState, DraftWorkflow, Recipient};
pub use error::{BotError, Result};
pub use render::{Post, Renderer, render_caption};
pub use session::{SessionState, SessionStore};
