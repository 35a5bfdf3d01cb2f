//! Wire types for the chat-completion endpoint

use serde::{Deserialize, Serialize};

use crate::cli::Config;
use crate::errors::DispatchError;

/// Fixed parameters attached to every request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParams {
    pub model: String,
    pub system_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl RequestParams {
    /// Build from the `[api]` and `[tutor]` config sections
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.api.model.clone(),
            system_prompt: config.tutor.system_prompt.clone(),
            max_tokens: config.tutor.max_tokens,
            temperature: config.tutor.temperature,
        }
    }

    /// Request body for a single user prompt
    pub fn request(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: self.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            n: 1,
        }
    }
}

impl Default for RequestParams {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub n: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    pub content: Option<String>,
}

impl ChatResponse {
    /// Parse a raw response body
    pub fn parse(body: &str) -> Result<Self, DispatchError> {
        serde_json::from_str(body).map_err(|e| DispatchError::Malformed(e.to_string()))
    }

    /// Trimmed text of the first choice
    ///
    /// Whitespace-only content is deliberately treated as
    /// [`DispatchError::EmptyResponse`] instead of being saved as an empty
    /// answer.
    pub fn into_text(self) -> Result<String, DispatchError> {
        let text = self
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(DispatchError::EmptyResponse);
        }
        Ok(text)
    }
}
