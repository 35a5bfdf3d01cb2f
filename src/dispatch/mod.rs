//! Request dispatching to the chat-completion service
//!
//! The [`Dispatcher`] trait is the single seam between the tutor flows and
//! the remote model. [`ChatClient`] is the OpenAI-compatible implementation.

pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::errors::Result;

pub use client::ChatClient;
pub use types::{ChatMessage, ChatRequest, ChatResponse, RequestParams};

/// Sends one prompt and returns the model's reply
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Ask the model; the returned text has no leading/trailing whitespace
    async fn ask(&self, prompt: &str) -> Result<String>;
}
