//! Tutoring flows
//!
//! Three mutually exclusive practice modes. Vocabulary and grammar results
//! are written to the progress store; conversation turns stay in the
//! session's [`ConversationSession`](crate::conversation::ConversationSession).

pub mod flows;
pub mod prompts;

use std::fmt;

pub use flows::{Lesson, Tutor};

/// Module name under which vocabulary entries are stored
pub const VOCABULARY_MODULE: &str = "Vocabulary";

/// Module name under which grammar entries are stored
pub const GRAMMAR_MODULE: &str = "Grammar";

/// Active practice mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Vocabulary,
    Grammar,
    Conversation,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Vocabulary, Mode::Grammar, Mode::Conversation];

    /// Parse a mode name or alias (case-insensitive)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "vocabulary" | "vocab" | "v" => Some(Mode::Vocabulary),
            "grammar" | "g" => Some(Mode::Grammar),
            "conversation" | "conv" | "c" => Some(Mode::Conversation),
            _ => None,
        }
    }

    /// Lowercase name used in prompts and arguments
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Vocabulary => "vocabulary",
            Mode::Grammar => "grammar",
            Mode::Conversation => "conversation",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Mode::Vocabulary => "Vocabulary Practice",
            Mode::Grammar => "Grammar Practice",
            Mode::Conversation => "Conversation Practice",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            Mode::Vocabulary => "Learn New Words",
            Mode::Grammar => "Improve Your Sentences",
            Mode::Conversation => "Practice Conversing in English",
        }
    }

    /// What the user is asked to type
    pub fn input_hint(&self) -> &'static str {
        match self {
            Mode::Vocabulary => "Enter a word that you want to learn",
            Mode::Grammar => "Enter a sentence you want to check",
            Mode::Conversation => "Say something to your tutor",
        }
    }

    /// Progress module written by this mode, if any
    pub fn module(&self) -> Option<&'static str> {
        match self {
            Mode::Vocabulary => Some(VOCABULARY_MODULE),
            Mode::Grammar => Some(GRAMMAR_MODULE),
            Mode::Conversation => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
