//! Error types for TMDB operations

use media_core::ServiceError;
use media_utils::EnvError;
use thiserror::Error;

/// Result type for TMDB operations
pub type Result<T> = std::result::Result<T, TmdbError>;

/// Errors that can occur while talking to TMDB
#[derive(Error, Debug)]
pub enum TmdbError {
    /// Invalid API key
    #[error("TMDB rejected the API key: {0}")]
    Unauthorized(String),

    /// Requested resource does not exist
    #[error("TMDB resource not found: {0}")]
    NotFound(String),

    /// Non-success status from the API
    #[error("TMDB API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl From<EnvError> for TmdbError {
    fn from(err: EnvError) -> Self {
        TmdbError::ConfigurationError(err.to_string())
    }
}

impl From<TmdbError> for ServiceError {
    fn from(err: TmdbError) -> Self {
        match err {
            TmdbError::NotFound(resource) => ServiceError::NotFound(resource),
            other => ServiceError::Unavailable(other.to_string()),
        }
    }
}
