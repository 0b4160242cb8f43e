//! Draft and publish workflow
//!
//! The publisher chat stages exactly one title at a time, optionally attaches
//! a note, then either publishes it to the broadcast destination or discards
//! it.
//!
//! ```text
//!            select                request_edit_note
//!   Empty ───────────▶ Drafted ─────────────────────▶ EditingNote
//!     ▲                 │  ▲                              │
//!     │ publish / clear │  └──────── submit_note ─────────┘
//!     └─────────────────┘
//! ```
//!
//! `select` is accepted in every state and overwrites the current draft.
//! `abort` returns to `Empty` from anywhere.

use crate::render::{Post, Renderer};
use async_trait::async_trait;
use media_core::{ChatId, Error, MediaDetail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, error, info, instrument};

/// Where a message is delivered: a numeric chat id or a public `@username`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipient {
    Id(i64),
    Username(String),
}

impl FromStr for Recipient {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(name) = s.strip_prefix('@') {
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                return Err(format!("invalid username '{s}'"));
            }
            return Ok(Recipient::Username(s.to_string()));
        }
        s.parse::<i64>()
            .map(Recipient::Id)
            .map_err(|e| format!("'{s}': {e}"))
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recipient::Id(id) => write!(f, "{id}"),
            Recipient::Username(name) => f.write_str(name),
        }
    }
}

impl From<ChatId> for Recipient {
    fn from(chat: ChatId) -> Self {
        Recipient::Id(chat.0)
    }
}

/// Delivers rendered posts to a destination
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn deliver(&self, destination: &Recipient, post: &Post) -> crate::Result<()>;
}

/// State of the single draft slot
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DraftState {
    #[default]
    Empty,
    Drafted {
        detail: MediaDetail,
        note: String,
    },
    EditingNote {
        detail: MediaDetail,
        note_so_far: String,
    },
}

impl DraftState {
    pub fn is_empty(&self) -> bool {
        matches!(self, DraftState::Empty)
    }

    pub fn is_editing_note(&self) -> bool {
        matches!(self, DraftState::EditingNote { .. })
    }

    /// The staged title, if any
    pub fn detail(&self) -> Option<&MediaDetail> {
        match self {
            DraftState::Empty => None,
            DraftState::Drafted { detail, .. } | DraftState::EditingNote { detail, .. } => {
                Some(detail)
            }
        }
    }

    /// The current note; `None` when empty or blank
    pub fn note(&self) -> Option<&str> {
        match self {
            DraftState::Empty => None,
            DraftState::Drafted { note, .. }
            | DraftState::EditingNote {
                note_so_far: note, ..
            } => Some(note.as_str()).filter(|note| !note.is_empty()),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            DraftState::Empty => "empty",
            DraftState::Drafted { .. } => "drafted",
            DraftState::EditingNote { .. } => "editing note",
        }
    }
}

/// The publisher's draft slot and the destination it publishes to
#[derive(Debug)]
pub struct DraftWorkflow {
    publisher: ChatId,
    destination: Recipient,
    state: DraftState,
}

impl DraftWorkflow {
    pub fn new(publisher: ChatId, destination: Recipient) -> Self {
        Self {
            publisher,
            destination,
            state: DraftState::Empty,
        }
    }

    pub fn publisher(&self) -> ChatId {
        self.publisher
    }

    pub fn destination(&self) -> &Recipient {
        &self.destination
    }

    pub fn state(&self) -> &DraftState {
        &self.state
    }

    /// Stage a title, replacing any existing draft
    pub fn select(&mut self, detail: MediaDetail) {
        if let Some(previous) = self.state.detail() {
            debug!(previous = previous.title(), next = detail.title(), "Replacing draft");
        }
        self.state = DraftState::Drafted {
            detail,
            note: String::new(),
        };
    }

    /// Start editing the note. Repeating the request while editing is a no-op.
    pub fn request_edit_note(&mut self) -> Result<()> {
        match std::mem::take(&mut self.state) {
            DraftState::Drafted { detail, note } => {
                self.state = DraftState::EditingNote {
                    detail,
                    note_so_far: note,
                };
                Ok(())
            }
            editing @ DraftState::EditingNote { .. } => {
                self.state = editing;
                Ok(())
            }
            DraftState::Empty => Err(Error::InvalidState(
                "cannot edit a note without a draft".to_string(),
            )),
        }
    }

    /// Replace the note and return to `Drafted`
    pub fn submit_note(&mut self, text: &str) -> Result<()> {
        match std::mem::take(&mut self.state) {
            DraftState::EditingNote { detail, .. } => {
                self.state = DraftState::Drafted {
                    detail,
                    note: text.trim().to_string(),
                };
                Ok(())
            }
            other => {
                let name = other.name();
                self.state = other;
                Err(Error::InvalidState(format!("no note requested while {name}")))
            }
        }
    }

    /// Discard the draft without publishing
    pub fn clear(&mut self) -> Result<()> {
        if self.state.is_empty() {
            return Err(Error::NoDraft);
        }
        self.state = DraftState::Empty;
        Ok(())
    }

    /// Drop whatever is staged. Returns whether a draft was discarded.
    pub fn abort(&mut self) -> bool {
        !std::mem::take(&mut self.state).is_empty()
    }

    /// Render the draft and deliver it to the destination.
    ///
    /// The draft is only discarded after a successful delivery; on failure
    /// it stays staged so the publisher can retry.
    #[instrument(skip_all, fields(destination = %self.destination))]
    pub async fn publish(&mut self, renderer: &Renderer, broadcaster: &dyn Broadcaster) -> Result<Post> {
        let (detail, note) = match &self.state {
            DraftState::Empty => return Err(Error::NoDraft),
            DraftState::EditingNote { .. } => {
                return Err(Error::InvalidState(
                    "finish the note before publishing".to_string(),
                ));
            }
            DraftState::Drafted { detail, note } => (detail, note),
        };

        let title = detail.title().to_string();
        let note = Some(note.as_str()).filter(|note| !note.is_empty());
        let post = renderer.render(detail, note).await;

        if let Err(err) = broadcaster.deliver(&self.destination, &post).await {
            error!(error = %err, title = %title, "Failed to publish draft");
            return Err(err.into());
        }

        info!(title = %title, "Published draft");
        self.state = DraftState::Empty;
        Ok(post)
    }
}
