//! Event parsing
//!
//! Chat input is turned into an [`Event`] exactly once, at the platform
//! boundary. Keyboard labels and callback payloads are only ever matched here.

/// Reply keyboard label that cancels a result list
pub const ABORT_LABEL: &str = "❌ Abort Search";
/// Draft keyboard label for editing the note
pub const EDIT_NOTE_LABEL: &str = "📝 Edit Notes";
/// Draft keyboard label for publishing
pub const PUBLISH_LABEL: &str = "📢 Send to Channel";
/// Draft keyboard label for discarding the draft
pub const CLEAR_LABEL: &str = "🗑 Clear";

/// A structured chat event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `/start`
    Start,
    /// `/help` or an unknown command
    Help,
    /// Free text or `/search <title>`
    Search(String),
    /// 1-based index into the last result list
    Select(usize),
    /// Cancel the result list (and the draft, for the publisher)
    Abort,
    /// Start writing a note for the draft
    RequestEditNote,
    /// Text sent while a note was requested
    SubmitNote(String),
    /// Send the draft to the channel
    Publish,
    /// Discard the draft
    ClearDraft,
}

impl Event {
    /// Parse a text message in the sender's current context
    pub fn from_text(text: &str, context: &TextContext<'_>) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if let Some(command) = text.strip_prefix('/') {
            return Some(Self::from_command(command));
        }

        match text {
            ABORT_LABEL => return Some(Event::Abort),
            EDIT_NOTE_LABEL => return Some(Event::RequestEditNote),
            PUBLISH_LABEL => return Some(Event::Publish),
            CLEAR_LABEL => return Some(Event::ClearDraft),
            _ => {}
        }

        if context.awaiting_note {
            return Some(Event::SubmitNote(text.to_string()));
        }

        if let Some(index) = context.selection(text) {
            return Some(Event::Select(index));
        }

        Some(Event::Search(text.to_string()))
    }

    fn from_command(command: &str) -> Self {
        let (name, args) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(name, args)| (name, args.trim()));
        // Commands in groups arrive as `/search@my_bot`
        let name = name.split('@').next().unwrap_or_default().to_lowercase();

        match name.as_str() {
            "start" => Event::Start,
            "search" | "s" if !args.is_empty() => Event::Search(args.to_string()),
            "select" => args.parse().map_or(Event::Help, Event::Select),
            "abort" | "cancel" => Event::Abort,
            "note" => Event::RequestEditNote,
            "publish" => Event::Publish,
            "clear" => Event::ClearDraft,
            _ => Event::Help,
        }
    }

    /// Parse inline button callback data
    pub fn from_callback(data: &str) -> Option<Self> {
        match data {
            "abort" => Some(Event::Abort),
            "draft:edit" => Some(Event::RequestEditNote),
            "draft:publish" => Some(Event::Publish),
            "draft:clear" => Some(Event::ClearDraft),
            _ => data
                .strip_prefix("select:")
                .and_then(|index| index.parse().ok())
                .map(Event::Select),
        }
    }

    /// Callback data for events that can sit behind an inline button
    pub fn callback_data(&self) -> Option<String> {
        match self {
            Event::Select(index) => Some(format!("select:{index}")),
            Event::Abort => Some("abort".to_string()),
            Event::RequestEditNote => Some("draft:edit".to_string()),
            Event::Publish => Some("draft:publish".to_string()),
            Event::ClearDraft => Some("draft:clear".to_string()),
            _ => None,
        }
    }

    /// Keyboard label for events with a fixed button
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Event::Abort => Some(ABORT_LABEL),
            Event::RequestEditNote => Some(EDIT_NOTE_LABEL),
            Event::Publish => Some(PUBLISH_LABEL),
            Event::ClearDraft => Some(CLEAR_LABEL),
            _ => None,
        }
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Event::Start => "start",
            Event::Help => "help",
            Event::Search(_) => "search",
            Event::Select(_) => "select",
            Event::Abort => "abort",
            Event::RequestEditNote => "request_edit_note",
            Event::SubmitNote(_) => "submit_note",
            Event::Publish => "publish",
            Event::ClearDraft => "clear_draft",
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        "Send a movie or TV show title to search for it.\n\
         \n\
         Commands:\n\
         /search <title> - Search movies and TV shows\n\
         /abort - Cancel the current result list\n\
         /help - Show this help\n\
         \n\
         Publisher commands:\n\
         /note - Attach a note to the draft\n\
         /publish - Send the draft to the channel\n\
         /clear - Discard the draft\n\
         \n\
         You can also type @<bot> <title> in any chat for inline results."
    }
}

/// Label of a numbered result button, e.g. `"1. Dune (2021)"`
pub fn selection_label(index: usize, title: &str) -> String {
    format!("{index}. {title}")
}

/// What the bot last offered a chat, used to read its next text message
#[derive(Debug, Clone, Copy, Default)]
pub struct TextContext<'a> {
    /// The sender is the publisher and a note was requested; plain text is
    /// then the note instead of a search
    pub awaiting_note: bool,

    /// Formatted titles of the chat's current result list, in display order
    pub listed: &'a [String],
}

impl TextContext<'_> {
    /// Index of the result button `text` came from. Text that merely looks
    /// like `"9. Something"` is not a selection.
    fn selection(&self, text: &str) -> Option<usize> {
        let (number, _) = text.split_once(". ")?;
        let index: usize = number.parse().ok().filter(|index| *index > 0)?;
        let title = self.listed.get(index - 1)?;
        (text == selection_label(index, title)).then_some(index)
    }
}
