//! TMDB metadata client for media-bot
//!
//! This crate implements [`media_core::SearchService`] on top of the TMDB v3
//! REST API. It includes:
//!
//! - Movie and TV search
//! - Detail lookups for a single title
//! - YouTube trailer discovery
//! - Genre tables for genre id resolution

pub mod client;
pub mod error;
mod wire;

pub use client::{TmdbClient, TmdbConfig};
pub use error::{Result, TmdbError};
