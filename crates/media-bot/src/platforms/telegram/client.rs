//! Telegram Bot API client
//!
//! Every call is a JSON `POST` to `{api_base}/bot{token}/{method}`; the
//! response envelope's `ok: false` becomes [`BotError::Telegram`].

use super::TelegramConfig;
use super::types::{
    ALLOWED_UPDATES, AnswerCallbackQuery, AnswerInlineQuery, ApiResponse, GetUpdates,
    InlineQueryResultArticle, Message, PARSE_MODE, ReplyMarkup, SendMessage, SendPhoto, Update,
    User, fits_in_caption,
};
use crate::bot::{BotResponse, InlineArticle};
use crate::draft::{Broadcaster, Recipient};
use crate::error::{BotError, Result};
use crate::render::Post;
use async_trait::async_trait;
use media_core::ChatId;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

/// Extra time on top of the long-poll timeout before a request is abandoned
const REQUEST_TIMEOUT_MARGIN_SECS: u64 = 10;

/// Telegram Bot API client
pub struct TelegramClient {
    client: Client,
    config: TelegramConfig,
}

impl TelegramClient {
    /// Create a client with the given configuration
    pub fn new(config: TelegramConfig) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(BotError::ConfigError(
                "Telegram bot token must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(
                config.poll_timeout_secs + REQUEST_TIMEOUT_MARGIN_SECS,
            ))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(TelegramConfig::from_env()?)
    }

    pub fn config(&self) -> &TelegramConfig {
        &self.config
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.config.api_base, self.config.token)
    }

    #[instrument(skip(self, payload))]
    async fn call<P, T>(&self, method: &str, payload: &P) -> Result<T>
    where
        P: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        // The URL carries the token, keep it out of error messages
        let response = self
            .client
            .post(self.method_url(method))
            .json(payload)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        let envelope: ApiResponse<T> = serde_json::from_str(&body)?;
        envelope.into_result(method)
    }

    /// Identify the bot; doubles as a credential check
    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-poll for updates after `offset`
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>> {
        let updates: Vec<Update> = self
            .call(
                "getUpdates",
                &GetUpdates {
                    offset,
                    timeout: timeout_secs,
                    allowed_updates: ALLOWED_UPDATES,
                },
            )
            .await?;

        if !updates.is_empty() {
            debug!("Received {} updates", updates.len());
        }
        Ok(updates)
    }

    /// Send a text message
    pub async fn send_message(
        &self,
        chat: &Recipient,
        text: &str,
        markdown: bool,
        reply_markup: Option<ReplyMarkup>,
    ) -> Result<Message> {
        self.call(
            "sendMessage",
            &SendMessage {
                chat_id: chat,
                text,
                parse_mode: markdown.then_some(PARSE_MODE),
                reply_markup,
            },
        )
        .await
    }

    /// Send a photo by URL
    pub async fn send_photo(
        &self,
        chat: &Recipient,
        photo: &str,
        caption: Option<&str>,
        markdown: bool,
        reply_markup: Option<ReplyMarkup>,
    ) -> Result<Message> {
        self.call(
            "sendPhoto",
            &SendPhoto {
                chat_id: chat,
                photo,
                caption,
                parse_mode: (markdown && caption.is_some()).then_some(PARSE_MODE),
                reply_markup,
            },
        )
        .await
    }

    /// Send text with an optional photo, following [`plan_sends`]
    async fn send_content(
        &self,
        chat: &Recipient,
        text: &str,
        image_url: Option<&str>,
        markdown: bool,
        reply_markup: Option<ReplyMarkup>,
    ) -> Result<()> {
        let mut reply_markup = reply_markup;
        for step in plan_sends(text, image_url) {
            match step {
                SendStep::Photo {
                    photo,
                    caption,
                    keyboard,
                } => {
                    let markup = if keyboard { reply_markup.take() } else { None };
                    self.send_photo(chat, photo, caption, markdown, markup).await?;
                }
                SendStep::Text { text, keyboard } => {
                    let markup = if keyboard { reply_markup.take() } else { None };
                    self.send_message(chat, text, markdown, markup).await?;
                }
            }
        }
        Ok(())
    }

    /// Send a bot response back to the chat it came from
    pub async fn send_response(&self, chat: ChatId, response: &BotResponse) -> Result<()> {
        self.send_content(
            &Recipient::from(chat),
            &response.text,
            response.image_url.as_deref(),
            response.markdown,
            response.keyboard.as_ref().map(ReplyMarkup::from),
        )
        .await
    }

    /// Stop the loading indicator on an inline button
    pub async fn answer_callback_query(&self, query_id: &str) -> Result<bool> {
        self.call(
            "answerCallbackQuery",
            &AnswerCallbackQuery {
                callback_query_id: query_id,
            },
        )
        .await
    }

    /// Answer an inline query with articles
    pub async fn answer_inline_query(
        &self,
        query_id: &str,
        articles: Vec<InlineArticle>,
        cache_time: u32,
    ) -> Result<bool> {
        self.call(
            "answerInlineQuery",
            &AnswerInlineQuery {
                inline_query_id: query_id,
                results: articles
                    .into_iter()
                    .map(InlineQueryResultArticle::from)
                    .collect(),
                cache_time,
            },
        )
        .await
    }
}

/// One Bot API call made while sending a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SendStep<'a> {
    Photo {
        photo: &'a str,
        caption: Option<&'a str>,
        keyboard: bool,
    },
    Text {
        text: &'a str,
        keyboard: bool,
    },
}

/// Decide how to send `text` with an optional photo. Text too long for a
/// caption follows the photo as its own message; the keyboard always rides on
/// the last call.
pub(crate) fn plan_sends<'a>(text: &'a str, image_url: Option<&'a str>) -> Vec<SendStep<'a>> {
    match image_url {
        Some(photo) if fits_in_caption(text) => vec![SendStep::Photo {
            photo,
            caption: Some(text),
            keyboard: true,
        }],
        Some(photo) => vec![
            SendStep::Photo {
                photo,
                caption: None,
                keyboard: false,
            },
            SendStep::Text {
                text,
                keyboard: true,
            },
        ],
        None => vec![SendStep::Text {
            text,
            keyboard: true,
        }],
    }
}

#[async_trait]
impl Broadcaster for TelegramClient {
    async fn deliver(&self, destination: &Recipient, post: &Post) -> Result<()> {
        self.send_content(
            destination,
            &post.caption,
            post.image_url.as_deref(),
            true,
            None,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforms::telegram::types::MAX_CAPTION_LEN;

    #[test]
    fn test_method_url() {
        let client = TelegramClient::new(
            TelegramConfig::new("123:abc").with_api_base("http://localhost:8081/"),
        )
        .unwrap();
        assert_eq!(client.method_url("getMe"), "http://localhost:8081/bot123:abc/getMe");
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(matches!(
            TelegramClient::new(TelegramConfig::new(" ")),
            Err(BotError::ConfigError(_))
        ));
    }

    const POSTER: &str = "https://image.tmdb.org/t/p/original/d5NXSklXo0qyIYkgV94XAgMIckC.jpg";

    #[test]
    fn test_plan_sends_caption_fits() {
        let caption = "🎬 *Dune*\n⭐ Rating: 7.8/10";
        assert_eq!(
            plan_sends(caption, Some(POSTER)),
            vec![SendStep::Photo {
                photo: POSTER,
                caption: Some(caption),
                keyboard: true,
            }]
        );
    }

    #[test]
    fn test_plan_sends_long_caption_splits() {
        let caption = format!("🎬 *Dune*\n📝 {}", "a".repeat(MAX_CAPTION_LEN));
        assert_eq!(
            plan_sends(&caption, Some(POSTER)),
            vec![
                SendStep::Photo {
                    photo: POSTER,
                    caption: None,
                    keyboard: false,
                },
                SendStep::Text {
                    text: &caption,
                    keyboard: true,
                },
            ]
        );
    }

    #[test]
    fn test_plan_sends_without_photo() {
        assert_eq!(
            plan_sends("No results found. Try another title.", None),
            vec![SendStep::Text {
                text: "No results found. Try another title.",
                keyboard: true,
            }]
        );
    }

    #[tokio::test]
    async fn test_unreachable_api_hides_token() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client = TelegramClient::new(
            TelegramConfig::new("123:secret-token")
                .with_api_base("http://127.0.0.1:9")
                .with_poll_timeout(1),
        )
        .unwrap();

        let err = client.get_me().await.unwrap_err();
        assert!(matches!(err, BotError::NetworkError(_)));
        assert!(!err.to_string().contains("secret-token"));

        let post = Post {
            caption: "🎬 *Dune*".to_string(),
            image_url: None,
        };
        let err = client
            .deliver(&Recipient::Username("@films".to_string()), &post)
            .await
            .unwrap_err();
        assert!(!err.to_string().contains("secret-token"));
    }
}
