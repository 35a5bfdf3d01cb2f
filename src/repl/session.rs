//! Session state for one interactive run
//!
//! Holds the active mode, the conversation context and per-session
//! counters. Created at REPL start and dropped on exit.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::conversation::ConversationSession;
use crate::progress::ProgressStore;
use crate::tutor::Mode;

/// Mutable state of a REPL session
pub struct SessionManager {
    mode: Mode,
    conversation: ConversationSession,
    store: ProgressStore,
    /// Successful answers per mode in this session
    answered: HashMap<Mode, usize>,
    session_start: DateTime<Utc>,
}

impl SessionManager {
    pub fn new(mode: Mode, conversation: ConversationSession, store: ProgressStore) -> Self {
        SessionManager {
            mode,
            conversation,
            store,
            answered: HashMap::new(),
            session_start: Utc::now(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch mode; returns false if it was already active
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if self.mode == mode {
            return false;
        }
        tracing::debug!(from = %self.mode, to = %mode, "mode switched");
        self.mode = mode;
        true
    }

    pub fn conversation(&self) -> &ConversationSession {
        &self.conversation
    }

    pub fn conversation_mut(&mut self) -> &mut ConversationSession {
        &mut self.conversation
    }

    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    /// Count one successful answer in `mode`
    pub fn record_answer(&mut self, mode: Mode) {
        *self.answered.entry(mode).or_insert(0) += 1;
    }

    pub fn answered(&self, mode: Mode) -> usize {
        self.answered.get(&mode).copied().unwrap_or(0)
    }

    pub fn total_answered(&self) -> usize {
        self.answered.values().sum()
    }

    /// Clear the conversation and session counters
    pub fn reset(&mut self) {
        self.conversation.reset();
        self.answered.clear();
        self.session_start = Utc::now();
    }

    pub fn session_start(&self) -> DateTime<Utc> {
        self.session_start
    }

    /// Get session duration in seconds
    pub fn session_duration(&self) -> u64 {
        (Utc::now() - self.session_start).num_seconds().max(0) as u64
    }
}
