//! Telegram Bot API payloads
//!
//! Only the fields the bot reads or writes are modelled. See:
//! https://core.telegram.org/bots/api

use crate::bot::{Button, InlineArticle, Keyboard};
use crate::draft::Recipient;
use crate::error::{BotError, Result};
use media_core::ChatId;
use serde::{Deserialize, Serialize};

/// Longest caption Telegram accepts on a photo
pub const MAX_CAPTION_LEN: usize = 1024;

pub(crate) const PARSE_MODE: &str = "Markdown";

/// Update kinds requested from `getUpdates`
pub(crate) const ALLOWED_UPDATES: &[&str] = &["message", "callback_query", "inline_query"];

// ============================================================================
// Envelope
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

impl<T> ApiResponse<T> {
    /// The result of a successful call; `ok: false` becomes [`BotError::Telegram`]
    pub fn into_result(self, method: &str) -> Result<T> {
        if !self.ok {
            return Err(BotError::Telegram(
                self.description
                    .unwrap_or_else(|| format!("{method} failed")),
            ));
        }

        self.result
            .ok_or_else(|| BotError::Telegram(format!("{method} returned no result")))
    }
}

// ============================================================================
// Incoming
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
    pub inline_query: Option<InlineQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InlineQuery {
    pub id: String,
    pub from: User,
    pub query: String,
}

/// The part of an update the bot acts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    Text {
        chat: ChatId,
        text: String,
    },
    Callback {
        query_id: String,
        chat: ChatId,
        data: String,
    },
    Inline {
        query_id: String,
        query: String,
    },
}

impl Incoming {
    /// Chat the event belongs to; inline queries have none
    pub fn chat(&self) -> Option<ChatId> {
        match self {
            Incoming::Text { chat, .. } | Incoming::Callback { chat, .. } => Some(*chat),
            Incoming::Inline { .. } => None,
        }
    }
}

impl Update {
    /// `None` for updates without anything to act on (stickers, edits, ...)
    pub fn into_incoming(self) -> Option<Incoming> {
        if let Some(message) = self.message {
            return message.text.map(|text| Incoming::Text {
                chat: ChatId(message.chat.id),
                text,
            });
        }

        if let Some(callback) = self.callback_query {
            let chat = callback
                .message
                .as_ref()
                .map_or(callback.from.id, |message| message.chat.id);
            return Some(Incoming::Callback {
                query_id: callback.id,
                chat: ChatId(chat),
                data: callback.data.unwrap_or_default(),
            });
        }

        self.inline_query.map(|inline| Incoming::Inline {
            query_id: inline.id,
            query: inline.query,
        })
    }
}

// ============================================================================
// Outgoing
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct GetUpdates {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub(crate) struct SendMessage<'a> {
    pub chat_id: &'a Recipient,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyMarkup>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendPhoto<'a> {
    pub chat_id: &'a Recipient,
    pub photo: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyMarkup>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerCallbackQuery<'a> {
    pub callback_query_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerInlineQuery<'a> {
    pub inline_query_id: &'a str,
    pub results: Vec<InlineQueryResultArticle>,
    pub cache_time: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReplyMarkup {
    Inline {
        inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
    },
    Keyboard {
        keyboard: Vec<Vec<KeyboardButton>>,
        resize_keyboard: bool,
        one_time_keyboard: bool,
    },
    Remove {
        remove_keyboard: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyboardButton {
    pub text: String,
}

impl From<&Keyboard> for ReplyMarkup {
    fn from(keyboard: &Keyboard) -> Self {
        match keyboard {
            Keyboard::Reply(rows) => ReplyMarkup::Keyboard {
                keyboard: rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|label| KeyboardButton {
                                text: label.clone(),
                            })
                            .collect()
                    })
                    .collect(),
                resize_keyboard: true,
                one_time_keyboard: true,
            },
            Keyboard::Inline(rows) => ReplyMarkup::Inline {
                inline_keyboard: rows
                    .iter()
                    .map(|row| row.iter().filter_map(inline_button).collect())
                    .collect(),
            },
            Keyboard::Remove => ReplyMarkup::Remove {
                remove_keyboard: true,
            },
        }
    }
}

fn inline_button(button: &Button) -> Option<InlineKeyboardButton> {
    button
        .event
        .callback_data()
        .map(|callback_data| InlineKeyboardButton {
            text: button.label.clone(),
            callback_data,
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineQueryResultArticle {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: String,
    pub title: String,
    pub description: String,
    pub input_message_content: InputTextMessageContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// Sent as plain text; titles are not escaped for Markdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputTextMessageContent {
    pub message_text: String,
}

impl From<InlineArticle> for InlineQueryResultArticle {
    fn from(article: InlineArticle) -> Self {
        Self {
            kind: "article",
            id: article.id,
            title: article.title,
            description: article.description,
            input_message_content: InputTextMessageContent {
                message_text: article.message_text,
            },
            thumbnail_url: article.thumbnail_url,
        }
    }
}

/// Whether `text` can be sent as a photo caption. Telegram counts the limit
/// in UTF-16 code units.
pub(crate) fn fits_in_caption(text: &str) -> bool {
    text.encode_utf16().count() <= MAX_CAPTION_LEN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::Event;
    use serde_json::json;

    fn update(value: serde_json::Value) -> Update {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_text_message() {
        let incoming = update(json!({
            "update_id": 1001,
            "message": {
                "message_id": 5,
                "date": 1_700_000_000,
                "chat": {"id": 42, "type": "private", "first_name": "Ana"},
                "from": {"id": 42, "is_bot": false, "first_name": "Ana"},
                "text": "Dune"
            }
        }))
        .into_incoming();

        assert_eq!(
            incoming,
            Some(Incoming::Text {
                chat: ChatId(42),
                text: "Dune".to_string()
            })
        );
    }

    #[test]
    fn test_message_without_text_is_ignored() {
        let incoming = update(json!({
            "update_id": 1002,
            "message": {
                "message_id": 6,
                "chat": {"id": 42, "type": "private"},
                "sticker": {"file_id": "abc"}
            }
        }))
        .into_incoming();
        assert_eq!(incoming, None);
    }

    #[test]
    fn test_callback_uses_message_chat() {
        let incoming = update(json!({
            "update_id": 1003,
            "callback_query": {
                "id": "cb-1",
                "from": {"id": 42, "first_name": "Ana"},
                "message": {"message_id": 9, "chat": {"id": -100_500, "type": "group"}},
                "chat_instance": "x",
                "data": "draft:publish"
            }
        }))
        .into_incoming();

        assert_eq!(
            incoming,
            Some(Incoming::Callback {
                query_id: "cb-1".to_string(),
                chat: ChatId(-100_500),
                data: "draft:publish".to_string()
            })
        );
    }

    #[test]
    fn test_inline_query() {
        let incoming = update(json!({
            "update_id": 1004,
            "inline_query": {
                "id": "iq-1",
                "from": {"id": 7, "first_name": "Bo", "username": "bo"},
                "query": "Dune",
                "offset": ""
            }
        }))
        .into_incoming();

        assert_eq!(
            incoming,
            Some(Incoming::Inline {
                query_id: "iq-1".to_string(),
                query: "Dune".to_string()
            })
        );
    }

    #[test]
    fn test_incoming_chat() {
        let text = Incoming::Text {
            chat: ChatId(42),
            text: "Dune".to_string(),
        };
        let inline = Incoming::Inline {
            query_id: "q1".to_string(),
            query: "Dune".to_string(),
        };
        assert_eq!(text.chat(), Some(ChatId(42)));
        assert_eq!(inline.chat(), None);
    }

    #[test]
    fn test_reply_markup_serialization() {
        let reply = ReplyMarkup::from(&Keyboard::Reply(vec![vec!["1. Dune (2021)".to_string()]]));
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({
                "keyboard": [[{"text": "1. Dune (2021)"}]],
                "resize_keyboard": true,
                "one_time_keyboard": true
            })
        );

        let inline = ReplyMarkup::from(&Keyboard::Inline(vec![vec![
            Button::new("📢 Send to Channel", Event::Publish),
            Button::new("no callback", Event::Help),
        ]]));
        assert_eq!(
            serde_json::to_value(&inline).unwrap(),
            json!({
                "inline_keyboard": [[{"text": "📢 Send to Channel", "callback_data": "draft:publish"}]]
            })
        );

        let remove = ReplyMarkup::from(&Keyboard::Remove);
        assert_eq!(serde_json::to_value(&remove).unwrap(), json!({"remove_keyboard": true}));
    }

    #[test]
    fn test_send_photo_payload() {
        let chat = Recipient::Username("@films".to_string());
        let payload = SendPhoto {
            chat_id: &chat,
            photo: "https://image.tmdb.org/t/p/original/d.jpg",
            caption: Some("🎬 *Dune*"),
            parse_mode: Some(PARSE_MODE),
            reply_markup: None,
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "chat_id": "@films",
                "photo": "https://image.tmdb.org/t/p/original/d.jpg",
                "caption": "🎬 *Dune*",
                "parse_mode": "Markdown"
            })
        );
    }

    #[test]
    fn test_inline_article() {
        let article = InlineQueryResultArticle::from(InlineArticle {
            id: "id-1".to_string(),
            title: "Dune (2021)".to_string(),
            description: "Movie".to_string(),
            message_text: "🎬 *Dune* (2021)".to_string(),
            thumbnail_url: None,
        });
        assert_eq!(
            serde_json::to_value(&article).unwrap(),
            json!({
                "type": "article",
                "id": "id-1",
                "title": "Dune (2021)",
                "description": "Movie",
                "input_message_content": {"message_text": "🎬 *Dune* (2021)"}
            })
        );
    }

    #[test]
    fn test_caption_limit() {
        assert!(fits_in_caption(&"é".repeat(MAX_CAPTION_LEN)));
        assert!(!fits_in_caption(&"a".repeat(MAX_CAPTION_LEN + 1)));
    }

    #[test]
    fn test_caption_limit_counts_utf16_units() {
        // 🎬 is one char but two UTF-16 units
        let caption = format!("🎬 *Dune*\n{}", "a".repeat(MAX_CAPTION_LEN - 9));
        assert_eq!(caption.chars().count(), MAX_CAPTION_LEN);
        assert!(!fits_in_caption(&caption));

        let caption = format!("🎬 *Dune*\n{}", "a".repeat(MAX_CAPTION_LEN - 10));
        assert_eq!(caption.encode_utf16().count(), MAX_CAPTION_LEN);
        assert!(fits_in_caption(&caption));
    }

    #[test]
    fn test_error_envelope() {
        let response: ApiResponse<User> = serde_json::from_value(json!({
            "ok": false,
            "error_code": 401,
            "description": "Unauthorized"
        }))
        .unwrap();
        assert!(!response.ok);
        assert!(response.result.is_none());
        assert!(matches!(
            response.into_result("getMe"),
            Err(BotError::Telegram(msg)) if msg == "Unauthorized"
        ));
    }

    #[test]
    fn test_error_envelope_without_description() {
        let response: ApiResponse<bool> =
            serde_json::from_value(json!({"ok": false, "error_code": 400})).unwrap();
        assert!(matches!(
            response.into_result("answerCallbackQuery"),
            Err(BotError::Telegram(msg)) if msg == "answerCallbackQuery failed"
        ));
    }

    #[test]
    fn test_ok_envelope_yields_result() {
        let response: ApiResponse<User> = serde_json::from_value(json!({
            "ok": true,
            "result": {"id": 7, "is_bot": true, "first_name": "Media", "username": "media_bot"}
        }))
        .unwrap();
        let me = response.into_result("getMe").unwrap();
        assert_eq!(me.username.as_deref(), Some("media_bot"));

        let response: ApiResponse<User> = serde_json::from_value(json!({"ok": true})).unwrap();
        assert!(matches!(response.into_result("getMe"), Err(BotError::Telegram(_))));
    }
}
