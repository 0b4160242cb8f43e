//! Telegram front end
//!
//! Long-polls the Bot API, turns each update into an event for
//! [`MediaBot`], and sends the response back. Each chat has its own queue
//! and worker task: a chat's updates are handled one at a time in arrival
//! order, and a slow lookup in one chat never holds up another.

mod client;
pub mod types;

pub use client::TelegramClient;
pub use types::{Incoming, Update};

use crate::bot::MediaBot;
use crate::error::Result;
use media_core::ChatId;
use media_utils::EnvVars;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;
const POLL_ERROR_PAUSE: Duration = Duration::from_secs(5);

/// Telegram bot configuration
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot token from BotFather
    pub token: String,

    /// Base URL for the Bot API (default: "https://api.telegram.org")
    pub api_base: String,

    /// Long-poll timeout in seconds (default: 30)
    pub poll_timeout_secs: u64,
}

impl TelegramConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: DEFAULT_TELEGRAM_API_BASE.to_string(),
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
        }
    }

    /// Create config from environment variables
    ///
    /// Reads `TELEGRAM_TOKEN`, and optionally `TELEGRAM_API_BASE` and
    /// `POLL_TIMEOUT`.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(&EnvVars::process())
    }

    /// Create config from an explicit variable source
    pub fn from_vars<F>(vars: &EnvVars<F>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(vars.required("TELEGRAM_TOKEN")?);
        if let Some(api_base) = vars.get("TELEGRAM_API_BASE") {
            config = config.with_api_base(api_base);
        }
        config.poll_timeout_secs = vars.parse_or("POLL_TIMEOUT", DEFAULT_POLL_TIMEOUT_SECS)?;
        Ok(config)
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the long-poll timeout
    pub fn with_poll_timeout(mut self, seconds: u64) -> Self {
        self.poll_timeout_secs = seconds;
        self
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .finish()
    }
}

/// Telegram bot
pub struct TelegramBot {
    client: Arc<TelegramClient>,
    bot: Arc<MediaBot>,
}

impl TelegramBot {
    pub fn new(client: Arc<TelegramClient>, bot: Arc<MediaBot>) -> Self {
        Self { client, bot }
    }

    /// Poll for updates until Ctrl-C
    pub async fn run(&self) -> Result<()> {
        let timeout = self.client.config().poll_timeout_secs;
        let mut offset = 0;
        let mut queues = ChatQueues::new();
        info!("Polling for updates");

        loop {
            let polled = tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutting down");
                    return Ok(());
                }
                polled = self.client.get_updates(offset, timeout) => polled,
            };

            match polled {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        self.route(&mut queues, update);
                    }
                }
                Err(err) => {
                    warn!(error = %err, "Polling failed");
                    tokio::time::sleep(POLL_ERROR_PAUSE).await;
                }
            }
        }
    }

    fn route(&self, queues: &mut ChatQueues<Incoming>, update: Update) {
        let update_id = update.update_id;
        let Some(incoming) = update.into_incoming() else {
            debug!(update_id, "Ignoring update");
            return;
        };

        let client = Arc::clone(&self.client);
        let bot = Arc::clone(&self.bot);
        let handler = move |incoming: Incoming| {
            let client = Arc::clone(&client);
            let bot = Arc::clone(&bot);
            async move {
                if let Err(err) = dispatch(&client, &bot, incoming).await {
                    warn!(error = %err, "Failed to handle update");
                }
            }
        };

        match incoming.chat() {
            Some(chat) => queues.push(chat, incoming, handler),
            None => {
                tokio::spawn(handler(incoming));
            }
        }
    }
}

/// Per-chat FIFO queues, each drained by one worker task
struct ChatQueues<T> {
    senders: HashMap<ChatId, mpsc::UnboundedSender<T>>,
}

impl<T: Send + 'static> ChatQueues<T> {
    fn new() -> Self {
        Self {
            senders: HashMap::new(),
        }
    }

    /// Queue `item` behind the chat's earlier items. `handler` is only used
    /// when the chat has no live worker yet.
    fn push<F, Fut>(&mut self, chat: ChatId, item: T, handler: F)
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let item = match self.senders.get(&chat) {
            Some(sender) => match sender.send(item) {
                Ok(()) => return,
                // Worker is gone, start a new one
                Err(mpsc::error::SendError(item)) => item,
            },
            None => item,
        };

        let (sender, mut receiver) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            handler(item).await;
            while let Some(item) = receiver.recv().await {
                handler(item).await;
            }
        });
        self.senders.insert(chat, sender);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.senders.len()
    }
}

#[instrument(skip_all)]
async fn dispatch(client: &TelegramClient, bot: &MediaBot, incoming: Incoming) -> Result<()> {
    match incoming {
        Incoming::Text { chat, text } => {
            if let Some(response) = bot.handle_text(chat, &text).await {
                client.send_response(chat, &response).await?;
            }
        }
        Incoming::Callback {
            query_id,
            chat,
            data,
        } => {
            client.answer_callback_query(&query_id).await?;
            if let Some(response) = bot.handle_callback(chat, &data).await {
                client.send_response(chat, &response).await?;
            }
        }
        Incoming::Inline { query_id, query } => {
            if let Some(articles) = bot.answer_inline(&query).await {
                client
                    .answer_inline_query(&query_id, articles, bot.config().inline_cache_time)
                    .await?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> EnvVars<impl Fn(&str) -> Option<String>> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        EnvVars::with_lookup(move |name| map.get(name).cloned())
    }

    #[test]
    fn test_telegram_config_from_vars() {
        let config = TelegramConfig::from_vars(&vars(&[
            ("TELEGRAM_TOKEN", "123:abc"),
            ("POLL_TIMEOUT", "50"),
        ]))
        .unwrap();

        assert_eq!(config.token, "123:abc");
        assert_eq!(config.api_base, "https://api.telegram.org");
        assert_eq!(config.poll_timeout_secs, 50);
    }

    #[test]
    fn test_telegram_config_requires_token() {
        let err = TelegramConfig::from_vars(&vars(&[])).unwrap_err();
        assert!(err.to_string().contains("TELEGRAM_TOKEN"));
    }

    #[tokio::test]
    async fn test_chat_queue_keeps_arrival_order() {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();
        let mut queues = ChatQueues::new();

        for i in 0..20u64 {
            let chat = ChatId(if i % 2 == 0 { 1 } else { 2 });
            let done_tx = done_tx.clone();
            queues.push(chat, i, move |i: u64| {
                let done_tx = done_tx.clone();
                async move {
                    // Earlier items sleep longer; they must still finish first
                    tokio::time::sleep(Duration::from_millis(20 - i)).await;
                    done_tx.send((chat, i)).unwrap();
                }
            });
        }
        drop(done_tx);
        assert_eq!(queues.len(), 2);

        let mut seen: HashMap<ChatId, Vec<u64>> = HashMap::new();
        for _ in 0..20 {
            let (chat, i) = done_rx.recv().await.unwrap();
            seen.entry(chat).or_default().push(i);
        }

        assert_eq!(seen[&ChatId(1)], (0..20).step_by(2).collect::<Vec<_>>());
        assert_eq!(seen[&ChatId(2)], (1..20).step_by(2).collect::<Vec<_>>());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = TelegramConfig::new("123:secret-token");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("api.telegram.org"));
    }
}
