//! Shared utilities for media-bot
//!
//! This crate provides common functionality used across the media-bot workspace,
//! including logging setup and environment-driven configuration helpers.

pub mod config;
pub mod logging;

pub use config::{EnvError, EnvVars, load_env_file};
pub use logging::init_tracing;
