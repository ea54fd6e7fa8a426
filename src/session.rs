//! # Session State Module
//!
//! Per-conversation navigation state for the menu hierarchy.
//!
//! A conversation has at most one [`SessionState`] at a time; absence of an
//! entry means the conversation is in free-text search mode. State lives
//! until explicitly cleared or the process restarts. There is no expiry
//! and no persistence, so a restart wipes all sessions. The router keeps
//! that recoverable by always accepting `/start` and greetings regardless
//! of navigation position.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Navigation position of one conversation within the menu hierarchy
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Choosing a category from the top-level menu. Holds the snapshot of
    /// category names that was displayed, so numeric selection keeps
    /// mapping to the same list for the rest of the session.
    AtTopMenu { categories: Vec<String> },
    /// Inside a category, choosing a guide
    InCategory { category: String },
}

/// Thread-safe store of per-conversation session state, keyed by chat id
///
/// Cloneable handle over shared state; clones observe the same sessions.
/// Conversations are independent, so key-level isolation is the only
/// coordination concurrent handlers need.
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<i64, SessionState>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for a conversation, if any
    pub async fn get(&self, chat_id: i64) -> Option<SessionState> {
        self.inner.lock().await.get(&chat_id).cloned()
    }

    /// Replace the conversation's state
    pub async fn set(&self, chat_id: i64, state: SessionState) {
        self.inner.lock().await.insert(chat_id, state);
    }

    /// Drop the conversation back to free-text search mode
    pub async fn clear(&self, chat_id: i64) {
        self.inner.lock().await.remove(&chat_id);
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}
