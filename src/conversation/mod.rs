//! Conversation practice state
//!
//! A [`ConversationBuffer`] keeps every turn of the current session. The
//! prompt sent to the model is built from the buffer; how many turns are
//! resent is an explicit [`ContextPolicy`].

pub mod session;

use std::fmt;

pub use session::ConversationSession;

/// Marker appended after the serialized history
pub const PROMPT_MARKER: &str = "AI:";

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Label used in prompts and transcripts
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "AI",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One message in the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

impl fmt::Display for ConversationTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.role, self.content)
    }
}

/// How much history is resent with each prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextPolicy {
    /// Resend every turn of the session
    #[default]
    Unbounded,
    /// Resend only the most recent N turns
    LastTurns(usize),
}

impl ContextPolicy {
    /// Policy for an optional turn limit
    pub fn from_limit(limit: Option<usize>) -> Self {
        match limit {
            Some(n) => ContextPolicy::LastTurns(n),
            None => ContextPolicy::Unbounded,
        }
    }
}

/// Ordered, append-only list of turns
#[derive(Debug, Clone, Default)]
pub struct ConversationBuffer {
    turns: Vec<ConversationTurn>,
}

impl ConversationBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    /// The most recent `window` turns, oldest first
    pub fn render(&self, window: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(window);
        &self.turns[start..]
    }

    /// Serialize history as `Role: content` lines plus the trailing marker
    pub fn build_prompt(&self, policy: ContextPolicy) -> String {
        let turns = match policy {
            ContextPolicy::Unbounded => &self.turns[..],
            ContextPolicy::LastTurns(n) => self.render(n),
        };

        let mut prompt = turns
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        prompt.push('\n');
        prompt.push_str(PROMPT_MARKER);
        prompt
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Remove the last turn if it is an unanswered user turn
    pub(crate) fn discard_pending(&mut self) -> Option<ConversationTurn> {
        match self.turns.last() {
            Some(turn) if turn.role == Role::User => self.turns.pop(),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with(n: usize) -> ConversationBuffer {
        let mut buffer = ConversationBuffer::new();
        for i in 0..n {
            buffer.append(ConversationTurn::user(format!("question {}", i)));
            buffer.append(ConversationTurn::assistant(format!("answer {}", i)));
        }
        buffer
    }

    #[test]
    fn test_turn_display() {
        assert_eq!(ConversationTurn::user("hi").to_string(), "User: hi");
        assert_eq!(ConversationTurn::assistant("hello").to_string(), "AI: hello");
    }

    #[test]
    fn test_prompt_format() {
        let mut buffer = ConversationBuffer::new();
        buffer.append(ConversationTurn::user("How are you?"));
        buffer.append(ConversationTurn::assistant("Fine, thanks."));
        buffer.append(ConversationTurn::user("What did you do today?"));

        assert_eq!(
            buffer.build_prompt(ContextPolicy::Unbounded),
            "User: How are you?\nAI: Fine, thanks.\nUser: What did you do today?\nAI:"
        );
    }

    #[test]
    fn test_render_window() {
        let buffer = buffer_with(5);
        let window = buffer.render(4);
        assert_eq!(window.len(), 4);
        assert_eq!(window[0].content, "question 3");
        assert_eq!(window[3].content, "answer 4");
    }

    #[test]
    fn test_render_shorter_than_window() {
        let buffer = buffer_with(1);
        assert_eq!(buffer.render(4).len(), 2);
        assert!(ConversationBuffer::new().render(4).is_empty());
    }

    #[test]
    fn test_unbounded_prompt_contains_everything() {
        let buffer = buffer_with(10);
        let prompt = buffer.build_prompt(ContextPolicy::Unbounded);
        assert!(prompt.contains("question 0"));
        assert!(prompt.contains("answer 9"));
    }

    #[test]
    fn test_limited_prompt_drops_old_turns() {
        let buffer = buffer_with(10);
        let prompt = buffer.build_prompt(ContextPolicy::LastTurns(3));
        assert!(!prompt.contains("question 8"));
        assert!(prompt.contains("answer 8"));
        assert!(prompt.contains("answer 9"));
        assert_eq!(prompt.lines().count(), 4);
        // the buffer itself is never truncated
        assert_eq!(buffer.len(), 20);
    }

    #[test]
    fn test_discard_pending_only_removes_user_turn() {
        let mut buffer = buffer_with(1);
        assert!(buffer.discard_pending().is_none());
        assert_eq!(buffer.len(), 2);

        buffer.append(ConversationTurn::user("unanswered"));
        let removed = buffer.discard_pending().unwrap();
        assert_eq!(removed.content, "unanswered");
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_context_policy_from_limit() {
        assert_eq!(ContextPolicy::from_limit(None), ContextPolicy::Unbounded);
        assert_eq!(ContextPolicy::from_limit(Some(6)), ContextPolicy::LastTurns(6));
    }
}
