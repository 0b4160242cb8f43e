//! Per-conversation session memory
//!
//! Each conversation remembers the last result list it was shown so that a
//! numbered selection can be resolved back to the item. Entries live in
//! memory only and are lost on restart.

use media_core::{ChatId, Error, MediaSummary, Result};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Transient state of one conversation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Results in the order they were numbered for the user
    pub last_results: Vec<MediaSummary>,
    /// Zero-based index of the last resolved selection
    pub pending_selection: Option<usize>,
}

/// In-memory session store keyed by conversation
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<ChatId, SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave a half-written entry, so a
    // poisoned lock is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<ChatId, SessionState>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ChatId, SessionState>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the conversation's result list
    pub fn record_results(&self, chat: ChatId, results: Vec<MediaSummary>) {
        debug!(chat = %chat, count = results.len(), "Recording results");
        self.write().insert(
            chat,
            SessionState {
                last_results: results,
                pending_selection: None,
            },
        );
    }

    /// Resolve a 1-based display index against the recorded list
    pub fn resolve_selection(&self, chat: ChatId, display_index: usize) -> Result<MediaSummary> {
        let mut sessions = self.write();
        let state = sessions.get_mut(&chat).ok_or(Error::NotFound)?;

        let index = display_index.checked_sub(1).ok_or(Error::NotFound)?;
        let item = state.last_results.get(index).cloned().ok_or(Error::NotFound)?;
        state.pending_selection = Some(index);
        Ok(item)
    }

    /// The recorded list, empty when there is none
    pub fn results(&self, chat: ChatId) -> Vec<MediaSummary> {
        self.read()
            .get(&chat)
            .map(|state| state.last_results.clone())
            .unwrap_or_default()
    }

    pub fn pending_selection(&self, chat: ChatId) -> Option<usize> {
        self.read().get(&chat).and_then(|state| state.pending_selection)
    }

    /// Remove the conversation's entry. Returns whether one existed.
    pub fn clear(&self, chat: ChatId) -> bool {
        self.write().remove(&chat).is_some()
    }

    /// Number of conversations with an entry
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
