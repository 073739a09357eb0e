use playground_cli::session::{export_to, render_message, ChatSession, SessionEvent};
use playground_core::{
    CompletionGateway, CompletionRequest, Conversation, GenerationRequest, InferenceBackend,
    Message, PlaygroundError, Role, Settings,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Echoes the last message back through chat completion, or always fails.
struct EchoBackend {
    fail: bool,
    calls: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl InferenceBackend for EchoBackend {
    async fn chat_completion(&self, request: &CompletionRequest) -> Result<String, PlaygroundError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PlaygroundError::Inference("chat down".into()));
        }
        let last = request.messages.last().map(|m| m.content()).unwrap_or("");
        Ok(format!("echo: {last}"))
    }

    async fn text_generation(&self, _request: &GenerationRequest) -> Result<String, PlaygroundError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PlaygroundError::Inference("generation down".into()));
        }
        Ok("generated".into())
    }
}

fn session(fail: bool, token: &str) -> (ChatSession, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let backend = EchoBackend {
        fail,
        calls: calls.clone(),
    };
    let gateway = CompletionGateway::new(Box::new(backend));
    (ChatSession::new(gateway, &Settings::default(), token), calls)
}

#[tokio::test]
async fn test_plain_input_produces_reply() {
    let (mut session, _) = session(false, "tok");

    match session.handle_input("Hello").await.unwrap() {
        SessionEvent::Reply { message, degraded } => {
            assert_eq!(message.role(), Role::Assistant);
            assert_eq!(message.content(), "echo: Hello");
            assert!(!degraded);
        }
        other => panic!("Expected Reply, got {:?}", other),
    }
    assert_eq!(session.conversation().len(), 2);
}

#[tokio::test]
async fn test_failed_turn_shows_composite_error_as_reply() {
    let (mut session, calls) = session(true, "tok");

    match session.handle_input("Hello").await.unwrap() {
        SessionEvent::Reply { message, degraded } => {
            assert!(degraded);
            assert!(message.content().contains("chat down"));
            assert!(message.content().contains("Fallback also failed"));
            assert!(message.content().contains("generation down"));
        }
        other => panic!("Expected Reply, got {:?}", other),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_missing_token_warns_without_calling_backend() {
    let (mut session, calls) = session(false, "   ");

    let event = session.handle_input("Hello").await.unwrap();

    assert!(matches!(event, SessionEvent::Warning(ref w) if w.contains("Hugging Face token")));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(session.conversation().len(), 1);
}

#[tokio::test]
async fn test_blank_input_is_ignored() {
    let (mut session, calls) = session(false, "tok");
    assert_eq!(session.handle_input("   ").await.unwrap(), SessionEvent::Ignored);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_clear_command_resets_conversation() {
    let (mut session, _) = session(false, "tok");
    session.handle_input("one").await.unwrap();
    session.handle_input("two").await.unwrap();
    assert_eq!(session.conversation().len(), 4);

    assert_eq!(session.handle_input("/clear").await.unwrap(), SessionEvent::Cleared);
    assert!(session.conversation().is_empty());
}

#[tokio::test]
async fn test_model_change_limited_to_selectable_models() {
    let (mut session, _) = session(false, "tok");

    session
        .handle_input("/model mistralai/Mistral-7B-Instruct-v0.1")
        .await
        .unwrap();
    assert_eq!(session.options().model, "mistralai/Mistral-7B-Instruct-v0.1");

    match session.handle_input("/model gpt-4o").await.unwrap() {
        SessionEvent::Notice(text) => assert!(text.contains("Unknown model: gpt-4o")),
        other => panic!("Expected Notice, got {:?}", other),
    }
    assert_eq!(session.options().model, "mistralai/Mistral-7B-Instruct-v0.1");
}

#[tokio::test]
async fn test_max_tokens_change_is_clamped() {
    let (mut session, _) = session(false, "tok");

    session.handle_input("/max-tokens 2048").await.unwrap();
    assert_eq!(session.options().max_tokens, 1024);

    session.handle_input("/max-tokens 320").await.unwrap();
    assert_eq!(session.options().max_tokens, 320);

    match session.handle_input("/max-tokens 300").await.unwrap() {
        SessionEvent::Notice(text) => {
            assert!(text.starts_with("Max tokens set to 320"), "{text}");
            assert!(text.contains("steps of 64"), "{text}");
        }
        other => panic!("Expected Notice, got {:?}", other),
    }
    assert_eq!(session.options().max_tokens, 320);
}

#[tokio::test]
async fn test_export_command_refused_when_empty() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out.txt");
    let (mut session, _) = session(false, "tok");

    let event = session
        .handle_input(&format!("/export {}", path.display()))
        .await
        .unwrap();

    assert!(matches!(event, SessionEvent::Warning(_)));
    assert!(!path.exists());
}

#[tokio::test]
async fn test_export_command_writes_transcript() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out.txt");
    let (mut session, _) = session(false, "tok");
    session.handle_input("Hello").await.unwrap();

    let event = session
        .handle_input(&format!("/export {}", path.display()))
        .await
        .unwrap();

    assert!(matches!(event, SessionEvent::Notice(ref t) if t.contains("exported")));
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("🧠 LLM Playground conversation export\n"));
    assert!(text.contains("]: Hello"));
    assert!(text.contains("]: echo: Hello"));
}

#[tokio::test]
async fn test_export_failure_keeps_session_alive() {
    let temp_dir = TempDir::new().unwrap();
    let (mut session, _) = session(false, "tok");
    session.handle_input("Hello").await.unwrap();

    // Writing to an existing directory fails.
    let event = session
        .handle_input(&format!("/export {}", temp_dir.path().display()))
        .await
        .unwrap();

    match event {
        SessionEvent::Warning(text) => assert!(text.starts_with("Export failed:"), "{text}"),
        other => panic!("Expected Warning, got {:?}", other),
    }
    assert_eq!(session.conversation().len(), 2);

    let next = session.handle_input("Still here?").await.unwrap();
    assert!(matches!(next, SessionEvent::Reply { .. }));
    assert_eq!(session.conversation().len(), 4);
}

#[test]
fn test_export_to_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("a").join("b").join("conversation.txt");
    let mut conversation = Conversation::new();
    conversation.push(Message::user("hi"));

    let written = export_to(&conversation, &path).unwrap();

    assert_eq!(written.as_deref(), Some(path.as_path()));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "🧠 LLM Playground conversation export\n\n\nYou: hi"
    );
}

#[test]
fn test_render_message_labels() {
    assert_eq!(render_message(&Message::user("hi")), "You\nhi");
    assert_eq!(render_message(&Message::assistant("yo")), "Bot\nyo");
}
