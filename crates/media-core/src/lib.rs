//! Core abstractions for media-bot
//!
//! This crate defines the media types shared by the metadata client and the
//! bot front end, the [`SearchService`] boundary trait, and the error taxonomy
//! surfaced to chat users.

pub mod error;
pub mod media;
pub mod search;

pub use error::{Error, Result, ServiceError};
pub use media::{ChatId, Genre, GenreTable, ImageBase, MediaDetail, MediaKind, MediaSummary};
pub use search::SearchService;
