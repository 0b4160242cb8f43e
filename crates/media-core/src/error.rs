//! Error types for media-core

use thiserror::Error;

/// Result type alias for media-core
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the bot workflow
///
/// Every variant maps to a short corrective message via
/// [`Error::user_message`]; none of them should ever reach a user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Selection index is out of range or no results are stored
    #[error("selection not found")]
    NotFound,

    /// Workflow operation called in the wrong state
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Publish, edit or clear requested without a draft
    #[error("no draft")]
    NoDraft,

    /// Metadata service failed
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Broadcast destination could not be reached
    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl Error {
    /// Short corrective message shown in the chat
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::NotFound => "Invalid selection. Search again to get a fresh list.",
            Error::InvalidState(_) => "That action is not available right now.",
            Error::NoDraft => "There is no draft. Select a result first.",
            Error::ServiceUnavailable(_) => "Could not load details. Try again.",
            Error::Delivery(_) => "Could not send to the channel. The draft was kept, try again.",
        }
    }
}

/// Failure reported by a [`crate::SearchService`] implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The requested item does not exist upstream
    #[error("not found: {0}")]
    NotFound(String),

    /// Transport, status or decoding failure
    #[error("{0}")]
    Unavailable(String),
}

impl From<ServiceError> for Error {
    fn from(err: ServiceError) -> Self {
        Error::ServiceUnavailable(err.to_string())
    }
}
