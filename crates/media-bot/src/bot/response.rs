//! Platform-agnostic bot responses

use crate::bot::commands::Event;
use crate::render::Post;

/// A button that triggers an event when pressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub event: Event,
}

impl Button {
    pub fn new(label: impl Into<String>, event: Event) -> Self {
        Self {
            label: label.into(),
            event,
        }
    }
}

/// Keyboard attached to a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// One-time reply keyboard; pressing a button sends its label as text
    Reply(Vec<Vec<String>>),
    /// Buttons attached to the message itself
    Inline(Vec<Vec<Button>>),
    /// Hide any reply keyboard
    Remove,
}

/// Bot response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotResponse {
    /// Message text, or the photo caption when `image_url` is set
    pub text: String,

    /// Photo to send with the text
    pub image_url: Option<String>,

    /// Keyboard to show
    pub keyboard: Option<Keyboard>,

    /// Whether `text` uses Telegram Markdown
    pub markdown: bool,
}

impl BotResponse {
    /// Create a plain text response
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            text: content.into(),
            image_url: None,
            keyboard: None,
            markdown: false,
        }
    }

    /// Create a response from a rendered post
    pub fn post(post: Post) -> Self {
        Self {
            text: post.caption,
            image_url: post.image_url,
            keyboard: None,
            markdown: true,
        }
    }

    /// Attach a keyboard
    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// One inline query answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineArticle {
    pub id: String,
    pub title: String,
    pub description: String,
    pub message_text: String,
    pub thumbnail_url: Option<String>,
}
