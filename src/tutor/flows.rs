//! Vocabulary, grammar and conversation handlers
//!
//! Each handler validates its input, dispatches one prompt and records the
//! outcome. Errors are returned per boundary: validation and dispatch
//! failures abort the action, a persistence failure travels with the
//! successful [`Lesson`] so the answer is still shown.

use std::sync::Arc;

use crate::conversation::{ConversationSession, ConversationTurn};
use crate::dispatch::Dispatcher;
use crate::errors::{Result, TutorError};
use crate::progress::{entry, ProgressStore};
use crate::tutor::{prompts, Mode, GRAMMAR_MODULE, VOCABULARY_MODULE};

/// Answer from a vocabulary or grammar request
#[derive(Debug)]
pub struct Lesson {
    pub mode: Mode,
    pub response: String,
    /// Set when the answer could not be written to the progress file
    pub save_error: Option<TutorError>,
}

impl Lesson {
    pub fn saved(&self) -> bool {
        self.save_error.is_none()
    }
}

/// Runs the practice flows against a dispatcher and a progress store
#[derive(Clone)]
pub struct Tutor {
    dispatcher: Arc<dyn Dispatcher>,
    store: ProgressStore,
}

impl Tutor {
    pub fn new(dispatcher: Arc<dyn Dispatcher>, store: ProgressStore) -> Self {
        Self { dispatcher, store }
    }

    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    /// Define `word`, then record `{word, definition}` under Vocabulary
    pub async fn vocabulary(&self, word: &str) -> Result<Lesson> {
        let word = require(word, "word")?;
        let definition = self.dispatcher.ask(&prompts::vocabulary(word)).await?;

        let save_error = self
            .store
            .save(
                VOCABULARY_MODULE,
                entry([("word", word), ("definition", definition.as_str())]),
            )
            .err();

        Ok(self.lesson(Mode::Vocabulary, definition, save_error))
    }

    /// Correct `sentence`, then record `{sentence, correction}` under Grammar
    pub async fn grammar(&self, sentence: &str) -> Result<Lesson> {
        let sentence = require(sentence, "sentence")?;
        let correction = self.dispatcher.ask(&prompts::grammar(sentence)).await?;

        let save_error = self
            .store
            .save(
                GRAMMAR_MODULE,
                entry([("sentence", sentence), ("correction", correction.as_str())]),
            )
            .err();

        Ok(self.lesson(Mode::Grammar, correction, save_error))
    }

    /// Continue the session's conversation; nothing is written to disk
    pub async fn converse<'s>(
        &self,
        session: &'s mut ConversationSession,
        message: &str,
    ) -> Result<&'s [ConversationTurn]> {
        session.send(self.dispatcher.as_ref(), message).await
    }

    fn lesson(&self, mode: Mode, response: String, save_error: Option<TutorError>) -> Lesson {
        if let Some(e) = &save_error {
            tracing::warn!(mode = %mode, error = %e, "progress not saved");
        }
        Lesson {
            mode,
            response,
            save_error,
        }
    }
}

/// Reject empty or whitespace-only input before any request is made
fn require<'a>(input: &'a str, field: &'static str) -> Result<&'a str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TutorError::Validation { field });
    }
    Ok(trimmed)
}
