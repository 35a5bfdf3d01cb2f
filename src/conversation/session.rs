//! Per-session conversation context
//!
//! Created when a practice session starts, dropped when it ends. Nothing
//! here is persisted or shared between sessions.

use crate::cli::Config;
use crate::conversation::{ContextPolicy, ConversationBuffer, ConversationTurn};
use crate::dispatch::Dispatcher;
use crate::errors::{Result, TutorError};

/// Turns shown after each exchange
pub const DISPLAY_WINDOW: usize = 4;

/// Conversation state for one practice session
#[derive(Debug, Clone)]
pub struct ConversationSession {
    buffer: ConversationBuffer,
    policy: ContextPolicy,
}

impl ConversationSession {
    pub fn new(policy: ContextPolicy) -> Self {
        Self {
            buffer: ConversationBuffer::new(),
            policy,
        }
    }

    /// Build from the `[conversation]` config section
    pub fn from_config(config: &Config) -> Self {
        Self::new(ContextPolicy::from_limit(config.conversation.max_context_turns))
    }

    /// Send one user message and return the turns to display
    ///
    /// On failure the user turn is withdrawn, so the buffer only ever holds
    /// complete user/assistant pairs between calls.
    pub async fn send(
        &mut self,
        dispatcher: &dyn Dispatcher,
        input: &str,
    ) -> Result<&[ConversationTurn]> {
        let message = input.trim();
        if message.is_empty() {
            return Err(TutorError::Validation { field: "message" });
        }

        self.buffer.append(ConversationTurn::user(message));
        let prompt = self.buffer.build_prompt(self.policy);
        tracing::debug!(
            turns = self.buffer.len(),
            prompt_chars = prompt.chars().count(),
            "conversation prompt built"
        );

        match dispatcher.ask(&prompt).await {
            Ok(reply) => {
                self.buffer.append(ConversationTurn::assistant(reply));
                Ok(self.window())
            }
            Err(e) => {
                self.buffer.discard_pending();
                Err(e)
            }
        }
    }

    /// The last [`DISPLAY_WINDOW`] turns
    pub fn window(&self) -> &[ConversationTurn] {
        self.buffer.render(DISPLAY_WINDOW)
    }

    /// Most recent `limit` turns, ignoring the display window
    pub fn history(&self, limit: usize) -> &[ConversationTurn] {
        self.buffer.render(limit)
    }

    pub fn buffer(&self) -> &ConversationBuffer {
        &self.buffer
    }

    /// Completed user/assistant exchanges
    pub fn exchanges(&self) -> usize {
        self.buffer.len() / 2
    }

    /// Forget the conversation
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new(ContextPolicy::Unbounded)
    }
}
