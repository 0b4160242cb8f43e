//! Error types for the bot front end

use media_tmdb::TmdbError;
use media_utils::EnvError;
use thiserror::Error;

/// Bot adapter errors
#[derive(Debug, Error)]
pub enum BotError {
    /// Telegram answered with `ok: false`
    #[error("Telegram API error: {0}")]
    Telegram(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Workflow rejected an event
    #[error(transparent)]
    Workflow(#[from] media_core::Error),

    /// Metadata client error
    #[error("TMDB error: {0}")]
    Tmdb(#[from] TmdbError),
}

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, BotError>;

impl From<EnvError> for BotError {
    fn from(err: EnvError) -> Self {
        BotError::ConfigError(err.to_string())
    }
}

/// Delivery failures surface to the workflow as [`media_core::Error::Delivery`]
impl From<BotError> for media_core::Error {
    fn from(err: BotError) -> Self {
        match err {
            BotError::Workflow(inner) => inner,
            other => media_core::Error::Delivery(other.to_string()),
        }
    }
}
