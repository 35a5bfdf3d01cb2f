//! Tutor Integration Tests
//!
//! Practice flows end to end against a scripted dispatcher, and once over
//! real HTTP against a local stub of the chat completion endpoint.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tutorbuddy::cli::Credential;
use tutorbuddy::conversation::{ContextPolicy, ConversationSession, Role};
use tutorbuddy::dispatch::{ChatClient, Dispatcher, RequestParams};
use tutorbuddy::progress::{entry, ProgressStore};
use tutorbuddy::tutor::Tutor;
use tutorbuddy::{DispatchError, Result, TutorError};

/// Replies from a fixed script, recording every prompt
struct ScriptedDispatcher {
    replies: Mutex<Vec<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedDispatcher {
    fn new(replies: Vec<Result<String>>) -> Arc<Self> {
        let mut replies = replies;
        replies.reverse();
        Arc::new(Self {
            replies: Mutex::new(replies),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn answering(replies: &[&str]) -> Arc<Self> {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Dispatcher for ScriptedDispatcher {
    async fn ask(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or(Err(DispatchError::EmptyResponse.into()))
    }
}

fn tutor_in(temp: &TempDir, dispatcher: Arc<ScriptedDispatcher>) -> Tutor {
    Tutor::new(dispatcher, ProgressStore::new(temp.path().join("progress.json")))
}

#[tokio::test]
async fn test_vocabulary_creates_progress_file() {
    let temp = TempDir::new().unwrap();
    let dispatcher = ScriptedDispatcher::answering(&["Ubiquitous means present everywhere."]);
    let tutor = tutor_in(&temp, dispatcher.clone());

    let lesson = tutor.vocabulary("ubiquitous").await.unwrap();
    assert_eq!(lesson.response, "Ubiquitous means present everywhere.");
    assert!(lesson.saved());

    let raw = std::fs::read_to_string(tutor.store().path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "Vocabulary": [
                {"word": "ubiquitous", "definition": "Ubiquitous means present everywhere."}
            ]
        })
    );
    assert_eq!(
        dispatcher.prompts(),
        vec!["Define the word 'ubiquitous' and use it in a sentence.".to_string()]
    );
}

#[tokio::test]
async fn test_vocabulary_and_grammar_share_one_file() {
    let temp = TempDir::new().unwrap();
    let dispatcher = ScriptedDispatcher::answering(&["def one", "fixed", "def two"]);
    let tutor = tutor_in(&temp, dispatcher);

    tutor.vocabulary("one").await.unwrap();
    tutor.grammar("me and him goes").await.unwrap();
    tutor.vocabulary("two").await.unwrap();

    let log = tutor.store().load().unwrap();
    assert_eq!(
        log.summary(),
        vec![("Vocabulary".to_string(), 2), ("Grammar".to_string(), 1)]
    );
    let vocab = log.record("Vocabulary").unwrap();
    assert_eq!(vocab.entries[0]["word"], "one");
    assert_eq!(vocab.entries[1]["word"], "two");
}

#[tokio::test]
async fn test_grammar_prompt_carries_sentence() {
    let temp = TempDir::new().unwrap();
    let dispatcher = ScriptedDispatcher::answering(&["She doesn't like apples."]);
    let tutor = tutor_in(&temp, dispatcher.clone());

    tutor.grammar("She don't like apples.").await.unwrap();
    assert_eq!(
        dispatcher.prompts()[0],
        "Correct the grammar of the following sentence and explain the changes:\n\nShe don't like apples."
    );

    let record = tutor.store().record("Grammar").unwrap().unwrap();
    assert_eq!(
        record.entries,
        vec![entry([
            ("sentence", "She don't like apples."),
            ("correction", "She doesn't like apples.")
        ])]
    );
}

#[tokio::test]
async fn test_existing_entries_are_kept() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("progress.json");
    std::fs::write(
        &path,
        r#"{"Listening":[{"clip":"intro"}],"Vocabulary":[{"word":"cat","definition":"feline"}]}"#,
    )
    .unwrap();

    let tutor = tutor_in(&temp, ScriptedDispatcher::answering(&["canine"]));
    tutor.vocabulary("dog").await.unwrap();

    let log = tutor.store().load().unwrap();
    assert_eq!(log.record("Listening").unwrap().entries.len(), 1);
    let vocab = log.record("Vocabulary").unwrap();
    assert_eq!(vocab.entries.len(), 2);
    assert_eq!(vocab.entries[1]["word"], "dog");
}

#[tokio::test]
async fn test_failed_request_leaves_file_unchanged() {
    let temp = TempDir::new().unwrap();
    let tutor = tutor_in(
        &temp,
        ScriptedDispatcher::new(vec![
            Ok("feline".to_string()),
            Err(DispatchError::Status {
                status: 500,
                body: "server error".to_string(),
            }
            .into()),
        ]),
    );

    tutor.vocabulary("cat").await.unwrap();
    let before = std::fs::read_to_string(tutor.store().path()).unwrap();

    let err = tutor.vocabulary("dog").await.unwrap_err();
    assert!(matches!(err, TutorError::Dispatch(_)));
    assert!(!err.is_warning());

    let after = std::fs::read_to_string(tutor.store().path()).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_empty_input_is_a_warning() {
    let temp = TempDir::new().unwrap();
    let dispatcher = ScriptedDispatcher::answering(&[]);
    let tutor = tutor_in(&temp, dispatcher.clone());
    let mut session = ConversationSession::default();

    for err in [
        tutor.vocabulary("").await.unwrap_err(),
        tutor.grammar(" ").await.unwrap_err(),
        tutor.converse(&mut session, "\t").await.unwrap_err(),
    ] {
        assert!(matches!(err, TutorError::Validation { .. }));
        assert!(err.is_warning());
    }

    assert!(dispatcher.prompts().is_empty());
    assert!(session.buffer().is_empty());
}

#[tokio::test]
async fn test_conversation_transcript() {
    let temp = TempDir::new().unwrap();
    let dispatcher = ScriptedDispatcher::answering(&["Hello! How are you?", "Glad to hear it."]);
    let tutor = tutor_in(&temp, dispatcher.clone());
    let mut session = ConversationSession::default();

    tutor.converse(&mut session, "Hi").await.unwrap();
    let shown = tutor.converse(&mut session, "I'm fine").await.unwrap();

    assert_eq!(shown.len(), 4);
    assert_eq!(shown[3].role, Role::Assistant);
    assert_eq!(shown[3].content, "Glad to hear it.");

    let prompts = dispatcher.prompts();
    assert_eq!(prompts[0], "User: Hi\nAI:");
    assert_eq!(
        prompts[1],
        "User: Hi\nAI: Hello! How are you?\nUser: I'm fine\nAI:"
    );
    assert!(!tutor.store().path().exists());
}

#[tokio::test]
async fn test_conversation_context_limit() {
    let temp = TempDir::new().unwrap();
    let dispatcher = ScriptedDispatcher::answering(&["a1", "a2", "a3"]);
    let tutor = tutor_in(&temp, dispatcher.clone());
    let mut session = ConversationSession::new(ContextPolicy::LastTurns(3));

    for message in ["m1", "m2", "m3"] {
        tutor.converse(&mut session, message).await.unwrap();
    }

    assert_eq!(dispatcher.prompts()[2], "User: m2\nAI: a2\nUser: m3\nAI:");
    assert_eq!(session.buffer().len(), 6);
    assert_eq!(session.window().len(), 4);
}

/// Serve one canned HTTP response and hand back the raw request
async fn serve_once(body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request);
            if let Some(split) = text.find("\r\n\r\n") {
                let length = text[..split]
                    .lines()
                    .find_map(|l| {
                        let lower = l.to_ascii_lowercase();
                        lower
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse::<usize>().unwrap())
                    })
                    .unwrap_or(0);
                if request.len() >= split + 4 + length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        String::from_utf8_lossy(&request).to_string()
    });

    (format!("http://{}/v1", addr), handle)
}

#[tokio::test]
async fn test_vocabulary_over_http() {
    let (base_url, server) =
        serve_once(r#"{"choices":[{"message":{"role":"assistant","content":"  Present everywhere.\n"}}]}"#)
            .await;

    let temp = TempDir::new().unwrap();
    let credential = Credential::from_lookup("OPENAI_API_KEY", |_| Some("sk-test".to_string())).unwrap();
    let client = ChatClient::new(
        &base_url,
        credential,
        RequestParams::default(),
        Duration::from_secs(5),
    )
    .unwrap();
    let tutor = Tutor::new(
        Arc::new(client),
        ProgressStore::new(temp.path().join("progress.json")),
    );

    let lesson = tutor.vocabulary("ubiquitous").await.unwrap();
    assert_eq!(lesson.response, "Present everywhere.");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /v1/chat/completions"));
    assert!(request.contains("Define the word 'ubiquitous'"));
    assert!(request.contains("\"max_tokens\":150"));

    let record = tutor.store().record("Vocabulary").unwrap().unwrap();
    assert_eq!(record.entries[0]["definition"], "Present everywhere.");
}
