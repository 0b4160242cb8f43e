//! Configuration for the bot core

use crate::draft::Recipient;
use crate::error::{BotError, Result};
use crate::render::DEFAULT_CAPTION_BUDGET;
use media_core::{ChatId, ImageBase};
use media_utils::EnvVars;

/// Default number of inline query answers
pub const DEFAULT_INLINE_RESULT_LIMIT: usize = 10;

/// Default inline answer cache time in seconds
pub const DEFAULT_INLINE_CACHE_TIME: u32 = 300;

/// Configuration for [`crate::MediaBot`]
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Where published drafts go (`CHANNEL_ID`)
    pub channel: Recipient,

    /// The only chat allowed to stage and publish drafts (`MY_CHAT_ID`).
    /// Without it every selection is answered in place.
    pub publisher: Option<ChatId>,

    /// Caption size budget in characters (`CAPTION_BUDGET`)
    pub caption_budget: usize,

    /// Maximum inline query answers (`INLINE_RESULT_LIMIT`)
    pub inline_result_limit: usize,

    /// Inline answer cache time in seconds (`INLINE_CACHE_TIME`)
    pub inline_cache_time: u32,

    /// Poster image host
    pub image_base: ImageBase,

    /// Bot username, learned from `getMe` at startup
    pub bot_username: Option<String>,
}

impl BotConfig {
    /// Create a builder
    pub fn builder() -> BotConfigBuilder {
        BotConfigBuilder::default()
    }

    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(&EnvVars::process())
    }

    /// Create config from an explicit variable source
    pub fn from_vars<F>(vars: &EnvVars<F>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let channel = vars.required("CHANNEL_ID")?.parse::<Recipient>().map_err(|reason| {
            BotError::ConfigError(format!("CHANNEL_ID is not a chat id or @username: {reason}"))
        })?;

        let mut builder = Self::builder()
            .channel(channel)
            .caption_budget(vars.parse_or("CAPTION_BUDGET", DEFAULT_CAPTION_BUDGET)?)
            .inline_result_limit(vars.parse_or("INLINE_RESULT_LIMIT", DEFAULT_INLINE_RESULT_LIMIT)?)
            .inline_cache_time(vars.parse_or("INLINE_CACHE_TIME", DEFAULT_INLINE_CACHE_TIME)?);

        if let Some(id) = vars.parse_opt::<i64>("MY_CHAT_ID")? {
            builder = builder.publisher(ChatId(id));
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.caption_budget == 0 {
            return Err(BotError::ConfigError(
                "caption_budget must be greater than 0".to_string(),
            ));
        }

        if self.inline_result_limit == 0 {
            return Err(BotError::ConfigError(
                "inline_result_limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether the publish workflow is enabled
    pub fn publishing_enabled(&self) -> bool {
        self.publisher.is_some()
    }
}

/// Builder for BotConfig
#[derive(Debug, Default)]
pub struct BotConfigBuilder {
    channel: Option<Recipient>,
    publisher: Option<ChatId>,
    caption_budget: Option<usize>,
    inline_result_limit: Option<usize>,
    inline_cache_time: Option<u32>,
    image_base: Option<ImageBase>,
    bot_username: Option<String>,
}

impl BotConfigBuilder {
    /// Set the broadcast destination
    pub fn channel(mut self, channel: Recipient) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Set the publisher chat
    pub fn publisher(mut self, chat: ChatId) -> Self {
        self.publisher = Some(chat);
        self
    }

    /// Set the caption budget
    pub fn caption_budget(mut self, budget: usize) -> Self {
        self.caption_budget = Some(budget);
        self
    }

    /// Set the inline answer limit
    pub fn inline_result_limit(mut self, limit: usize) -> Self {
        self.inline_result_limit = Some(limit);
        self
    }

    /// Set the inline answer cache time
    pub fn inline_cache_time(mut self, seconds: u32) -> Self {
        self.inline_cache_time = Some(seconds);
        self
    }

    /// Set the poster image host
    pub fn image_base(mut self, image_base: ImageBase) -> Self {
        self.image_base = Some(image_base);
        self
    }

    /// Set the bot username
    pub fn bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<BotConfig> {
        let channel = self
            .channel
            .ok_or_else(|| BotError::ConfigError("a broadcast channel is required".to_string()))?;

        let config = BotConfig {
            channel,
            publisher: self.publisher,
            caption_budget: self.caption_budget.unwrap_or(DEFAULT_CAPTION_BUDGET),
            inline_result_limit: self
                .inline_result_limit
                .unwrap_or(DEFAULT_INLINE_RESULT_LIMIT),
            inline_cache_time: self.inline_cache_time.unwrap_or(DEFAULT_INLINE_CACHE_TIME),
            image_base: self.image_base.unwrap_or_default(),
            bot_username: self.bot_username,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> EnvVars<impl Fn(&str) -> Option<String>> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        EnvVars::with_lookup(move |name| map.get(name).cloned())
    }

    #[test]
    fn test_config_builder_defaults() {
        let config = BotConfig::builder()
            .channel(Recipient::Username("@new_releases".to_string()))
            .build()
            .unwrap();

        assert_eq!(config.caption_budget, 1000);
        assert_eq!(config.inline_result_limit, 10);
        assert_eq!(config.inline_cache_time, 300);
        assert!(!config.publishing_enabled());
    }

    #[test]
    fn test_config_requires_channel() {
        assert!(BotConfig::builder().build().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_budget() {
        let result = BotConfig::builder()
            .channel(Recipient::Id(-100_123))
            .caption_budget(0)
            .build();
        assert!(matches!(result, Err(BotError::ConfigError(msg)) if msg.contains("caption_budget")));
    }

    #[test]
    fn test_config_from_vars() {
        let config = BotConfig::from_vars(&vars(&[
            ("CHANNEL_ID", "-1001234567890"),
            ("MY_CHAT_ID", "42"),
            ("CAPTION_BUDGET", "800"),
            ("INLINE_CACHE_TIME", "60"),
        ]))
        .unwrap();

        assert_eq!(config.channel, Recipient::Id(-1_001_234_567_890));
        assert_eq!(config.publisher, Some(ChatId(42)));
        assert_eq!(config.caption_budget, 800);
        assert_eq!(config.inline_result_limit, 10);
        assert_eq!(config.inline_cache_time, 60);
    }

    #[test]
    fn test_config_from_vars_errors() {
        let err = BotConfig::from_vars(&vars(&[])).unwrap_err();
        assert!(err.to_string().contains("CHANNEL_ID"));

        let err = BotConfig::from_vars(&vars(&[("CHANNEL_ID", "not a channel")])).unwrap_err();
        assert!(matches!(err, BotError::ConfigError(_)));

        let err = BotConfig::from_vars(&vars(&[("CHANNEL_ID", "@films"), ("MY_CHAT_ID", "me")]))
            .unwrap_err();
        assert!(err.to_string().contains("MY_CHAT_ID"));
    }
}
