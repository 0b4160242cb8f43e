//! Platform-specific bot implementations

pub mod telegram;

pub use telegram::{TelegramBot, TelegramClient, TelegramConfig};
