//! OpenAI-compatible chat-completion client
//!
//! - Endpoint: POST {base_url}/chat/completions
//! - Auth: bearer token from the configured environment variable
//! - One request per prompt, no retry

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};

use crate::cli::{Config, Credential};
use crate::dispatch::types::{ChatResponse, RequestParams};
use crate::dispatch::Dispatcher;
use crate::errors::{DispatchError, Result};

/// Longest error body echoed back to the user
const MAX_ERROR_BODY: usize = 300;

/// HTTP client for the chat-completion API
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    credential: Credential,
    params: RequestParams,
}

impl ChatClient {
    /// Create client with explicit settings
    pub fn new(
        base_url: &str,
        credential: Credential,
        params: RequestParams,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DispatchError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credential,
            params,
        })
    }

    /// Create client from configuration and a resolved credential
    pub fn from_config(config: &Config, credential: Credential) -> Result<Self> {
        Self::new(
            &config.api.base_url,
            credential,
            RequestParams::from_config(config),
            Duration::from_secs(config.api.timeout_secs),
        )
    }

    /// Completion endpoint URL
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Request parameters in use
    pub fn params(&self) -> &RequestParams {
        &self.params
    }
}

#[async_trait]
impl Dispatcher for ChatClient {
    async fn ask(&self, prompt: &str) -> Result<String> {
        let request = self.params.request(prompt);
        let started = Instant::now();
        tracing::debug!(
            model = %request.model,
            prompt_chars = prompt.chars().count(),
            "sending completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.credential.expose())
            .json(&request)
            .send()
            .await
            .map_err(DispatchError::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(DispatchError::Http)?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "completion request rejected");
            return Err(DispatchError::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY),
            }
            .into());
        }

        let text = ChatResponse::parse(&body)?.into_text()?;
        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            reply_chars = text.chars().count(),
            "completion received"
        );
        Ok(text)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TutorError;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn credential() -> Credential {
        Credential::from_lookup("KEY", |_| Some("sk-test".to_string())).unwrap()
    }

    /// Serve one canned HTTP response and hand back the raw request text
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{}", addr), handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        raw.len() >= header_end + 4 + content_length
    }

    fn client_for(base_url: &str) -> ChatClient {
        ChatClient::new(
            base_url,
            credential(),
            RequestParams::default(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client = client_for("https://api.openai.com/v1/");
        assert_eq!(client.endpoint(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_from_config_uses_tutor_params() {
        let mut config = Config::default();
        config.api.model = "gpt-4o-mini".to_string();
        config.tutor.max_tokens = 64;

        let client = ChatClient::from_config(&config, credential()).unwrap();
        assert_eq!(client.params().model, "gpt-4o-mini");
        assert_eq!(client.params().max_tokens, 64);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("  short ", 10), "short");
        assert_eq!(truncate("abcdefghij", 4), "abcd...");
    }

    #[tokio::test]
    async fn test_ask_returns_trimmed_first_choice() {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"\n  Ubiquitous means everywhere.  "}}]}"#,
        )
        .await;

        let reply = client_for(&url).ask("Define the word 'ubiquitous'").await.unwrap();
        assert_eq!(reply, "Ubiquitous means everywhere.");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /chat/completions"));
        assert!(request.to_lowercase().contains("authorization: bearer sk-test"));
        assert!(request.contains("You are a helpful English tutor."));
        assert!(request.contains("Define the word 'ubiquitous'"));
        assert!(request.contains("\"n\":1"));
    }

    #[tokio::test]
    async fn test_ask_surfaces_status_error() {
        let (url, server) = serve_once(
            "HTTP/1.1 401 Unauthorized",
            r#"{"error":{"message":"Incorrect API key provided"}}"#,
        )
        .await;

        let err = client_for(&url).ask("hello").await.unwrap_err();
        match err {
            TutorError::Dispatch(DispatchError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("Incorrect API key"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_ask_connection_refused_is_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(&format!("http://{}", addr)).ask("hello").await.unwrap_err();
        assert!(matches!(err, TutorError::Dispatch(DispatchError::Http(_))));
    }
}
