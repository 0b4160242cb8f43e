//! Media search bot
//!
//! [`MediaBot`] receives structured [`Event`]s and answers with
//! [`BotResponse`]s. It never fails: rejected events become short corrective
//! messages, and one conversation's failure never touches another's state.
//!
//! # Example
//!
//! ```rust,ignore
//! use media_bot::{BotConfig, Event, MediaBot};
//! use media_core::ChatId;
//!
//! let bot = MediaBot::new(service, broadcaster, BotConfig::from_env()?);
//! let response = bot.handle(ChatId(42), Event::Search("Dune".into())).await;
//! println!("{}", response.text);
//! ```

pub mod commands;
pub mod response;

use crate::config::BotConfig;
use crate::draft::{Broadcaster, DraftState, DraftWorkflow};
use crate::render::Renderer;
use crate::search;
use crate::session::SessionStore;
use commands::{ABORT_LABEL, CLEAR_LABEL, EDIT_NOTE_LABEL, PUBLISH_LABEL, selection_label};
use media_core::{ChatId, Error, MediaSummary, Result, SearchService};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

pub use commands::{Event, TextContext};
pub use response::{BotResponse, Button, InlineArticle, Keyboard};

/// Shown for both an empty result list and a failed search
pub const NO_RESULTS_MESSAGE: &str = "No results found. Try another title.";

/// Media search bot
pub struct MediaBot {
    service: Arc<dyn SearchService>,
    renderer: Renderer,
    sessions: SessionStore,
    /// Present only when a publisher chat is configured
    draft: Option<Mutex<DraftWorkflow>>,
    broadcaster: Arc<dyn Broadcaster>,
    config: BotConfig,
}

impl MediaBot {
    pub fn new(
        service: Arc<dyn SearchService>,
        broadcaster: Arc<dyn Broadcaster>,
        config: BotConfig,
    ) -> Self {
        let renderer = Renderer::new(Arc::clone(&service), config.image_base.clone())
            .with_budget(config.caption_budget);
        let draft = config
            .publisher
            .map(|publisher| Mutex::new(DraftWorkflow::new(publisher, config.channel.clone())));

        Self {
            service,
            renderer,
            sessions: SessionStore::new(),
            draft,
            broadcaster,
            config,
        }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Whether `chat` is the configured publisher
    pub fn is_publisher(&self, chat: ChatId) -> bool {
        self.config.publisher == Some(chat)
    }

    /// Whether the publisher has asked to write a note
    pub async fn is_awaiting_note(&self, chat: ChatId) -> bool {
        match self.publisher_draft(chat) {
            Some(draft) => draft.lock().await.state().is_editing_note(),
            None => false,
        }
    }

    /// Snapshot of the draft slot, when publishing is enabled
    pub async fn draft_state(&self) -> Option<DraftState> {
        match &self.draft {
            Some(draft) => Some(draft.lock().await.state().clone()),
            None => None,
        }
    }

    /// Parse and handle a text message
    pub async fn handle_text(&self, chat: ChatId, text: &str) -> Option<BotResponse> {
        let listed: Vec<String> = self
            .sessions
            .results(chat)
            .iter()
            .map(MediaSummary::formatted_title)
            .collect();
        let context = TextContext {
            awaiting_note: self.is_awaiting_note(chat).await,
            listed: &listed,
        };
        let event = Event::from_text(text, &context)?;
        Some(self.handle(chat, event).await)
    }

    /// Parse and handle an inline button press
    pub async fn handle_callback(&self, chat: ChatId, data: &str) -> Option<BotResponse> {
        let event = Event::from_callback(data)?;
        Some(self.handle(chat, event).await)
    }

    /// Handle one event
    #[instrument(skip(self, event), fields(chat = %chat, event = event.name()))]
    pub async fn handle(&self, chat: ChatId, event: Event) -> BotResponse {
        let result = match event {
            Event::Start => Ok(self.welcome()),
            Event::Help => Ok(BotResponse::text(Event::help_text())),
            Event::Search(text) => Ok(self.on_search(chat, &text).await),
            Event::Select(index) => self.on_select(chat, index).await,
            Event::Abort => Ok(self.on_abort(chat).await),
            Event::RequestEditNote => self.on_request_edit_note(chat).await,
            Event::SubmitNote(text) => self.on_submit_note(chat, &text).await,
            Event::Publish => self.on_publish(chat).await,
            Event::ClearDraft => self.on_clear_draft(chat).await,
        };

        result.unwrap_or_else(|err| {
            debug!(error = %err, "Event rejected");
            BotResponse::text(err.user_message())
        })
    }

    /// Answer an inline query. `None` means the query should not be answered.
    #[instrument(skip(self))]
    pub async fn answer_inline(&self, query: &str) -> Option<Vec<InlineArticle>> {
        if query.trim().is_empty() {
            return None;
        }

        match search::search(self.service.as_ref(), query).await {
            Ok(results) => Some(
                results
                    .iter()
                    .take(self.config.inline_result_limit)
                    .map(|item| self.inline_article(item))
                    .collect(),
            ),
            Err(err) => {
                warn!(error = %err, "Inline search failed");
                Some(Vec::new())
            }
        }
    }

    fn welcome(&self) -> BotResponse {
        let mut text = String::from(
            "Welcome! Send me a movie or TV show title, or use /search <title>.",
        );
        if let Some(username) = &self.config.bot_username {
            text.push_str(&format!(
                "\nYou can also type @{username} <title> in any chat to get inline suggestions."
            ));
        }
        BotResponse::text(text)
    }

    async fn on_search(&self, chat: ChatId, text: &str) -> BotResponse {
        match search::search(self.service.as_ref(), text).await {
            Ok(results) if results.is_empty() => {
                debug!(query = text, "No matches");
                self.sessions.record_results(chat, results);
                BotResponse::text(NO_RESULTS_MESSAGE)
            }
            Ok(results) => {
                let response = result_list(text.trim(), &results);
                self.sessions.record_results(chat, results);
                response
            }
            Err(err) => {
                warn!(error = %err, query = text, "Search failed");
                BotResponse::text(NO_RESULTS_MESSAGE)
            }
        }
    }

    async fn on_select(&self, chat: ChatId, index: usize) -> Result<BotResponse> {
        let item = self.sessions.resolve_selection(chat, index)?;
        let detail = search::fetch_detail(self.service.as_ref(), &item)
            .await
            .inspect_err(|err| warn!(error = %err, id = item.id, "Detail lookup failed"))?;
        self.sessions.clear(chat);

        let post = self.renderer.render(&detail, None).await;
        match self.publisher_draft(chat) {
            Some(draft) => {
                draft.lock().await.select(detail);
                Ok(BotResponse::post(post).with_keyboard(draft_keyboard()))
            }
            None => Ok(BotResponse::post(post).with_keyboard(Keyboard::Remove)),
        }
    }

    async fn on_abort(&self, chat: ChatId) -> BotResponse {
        let had_results = self.sessions.clear(chat);
        let had_draft = match self.publisher_draft(chat) {
            Some(draft) => draft.lock().await.abort(),
            None => false,
        };
        debug!(had_results, had_draft, "Aborted");

        BotResponse::text("Search aborted.").with_keyboard(Keyboard::Remove)
    }

    async fn on_request_edit_note(&self, chat: ChatId) -> Result<BotResponse> {
        let mut workflow = self.workflow(chat)?.lock().await;
        workflow.request_edit_note()?;

        let title = workflow
            .state()
            .detail()
            .map(|detail| detail.title().to_string())
            .unwrap_or_default();
        Ok(BotResponse::text(format!(
            "Send the note to attach to {title}. It replaces any previous note."
        )))
    }

    async fn on_submit_note(&self, chat: ChatId, text: &str) -> Result<BotResponse> {
        let (detail, note) = {
            let mut workflow = self.workflow(chat)?.lock().await;
            workflow.submit_note(text)?;
            let state = workflow.state();
            let detail = state.detail().cloned().ok_or(Error::NoDraft)?;
            (detail, state.note().map(str::to_string))
        };

        let post = self.renderer.render(&detail, note.as_deref()).await;
        Ok(BotResponse::post(post).with_keyboard(draft_keyboard()))
    }

    async fn on_publish(&self, chat: ChatId) -> Result<BotResponse> {
        let mut workflow = self.workflow(chat)?.lock().await;
        workflow
            .publish(&self.renderer, self.broadcaster.as_ref())
            .await?;
        Ok(BotResponse::text(format!("✅ Sent to {}.", workflow.destination())))
    }

    async fn on_clear_draft(&self, chat: ChatId) -> Result<BotResponse> {
        self.workflow(chat)?.lock().await.clear()?;
        Ok(BotResponse::text("🗑 Draft cleared."))
    }

    fn publisher_draft(&self, chat: ChatId) -> Option<&Mutex<DraftWorkflow>> {
        self.draft.as_ref().filter(|_| self.is_publisher(chat))
    }

    fn workflow(&self, chat: ChatId) -> Result<&Mutex<DraftWorkflow>> {
        self.publisher_draft(chat).ok_or_else(|| {
            Error::InvalidState("draft actions are reserved for the publisher".to_string())
        })
    }

    fn inline_article(&self, item: &MediaSummary) -> InlineArticle {
        InlineArticle {
            id: Uuid::new_v4().to_string(),
            title: item.formatted_title(),
            description: item.kind.display_name().to_string(),
            message_text: format!(
                "🎬 *{}* ({})\nType: {}\nTMDB ID: {}",
                item.title,
                item.year_label(),
                item.kind,
                item.id
            ),
            thumbnail_url: self.renderer.image_base().thumbnail_url(item),
        }
    }
}

/// Numbered result list with one reply button per result
fn result_list(query: &str, results: &[MediaSummary]) -> BotResponse {
    let mut text = format!("Results for \"{query}\":\n\n");
    let mut rows = Vec::with_capacity(results.len() + 1);

    for (i, item) in results.iter().enumerate() {
        let number = i + 1;
        let title = item.formatted_title();
        text.push_str(&format!(
            "{number}. {title} · {} · ⭐ {:.1}\n",
            item.kind, item.rating
        ));
        rows.push(vec![selection_label(number, &title)]);
    }

    text.push_str("\nPick a number to see the details.");
    rows.push(vec![ABORT_LABEL.to_string()]);
    BotResponse::text(text).with_keyboard(Keyboard::Reply(rows))
}

fn draft_keyboard() -> Keyboard {
    Keyboard::Inline(vec![
        vec![
            Button::new(EDIT_NOTE_LABEL, Event::RequestEditNote),
            Button::new(PUBLISH_LABEL, Event::Publish),
        ],
        vec![Button::new(CLEAR_LABEL, Event::ClearDraft)],
    ])
}
