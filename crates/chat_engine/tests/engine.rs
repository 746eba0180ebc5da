use std::sync::{Arc, Mutex};
use std::time::Duration;

use chat_core::{ChatAnswer, ChatOutcome, AGENT_ROSTER};
use chat_engine::{BackendStatus, ChatBackend, ClientError, EngineEvent, EngineHandle};

/// Records what it was asked and replays canned results.
struct ScriptedBackend {
    seen: Arc<Mutex<Vec<String>>>,
    reply: Result<ChatOutcome, ClientError>,
}

#[async_trait::async_trait]
impl ChatBackend for ScriptedBackend {
    async fn send_message(&self, text: &str) -> Result<ChatOutcome, ClientError> {
        self.seen.lock().unwrap().push(text.to_string());
        self.reply.clone()
    }

    async fn status(&self) -> Result<BackendStatus, ClientError> {
        Ok(BackendStatus {
            status: "ready".into(),
            doc_count: 3,
        })
    }
}

fn engine_with(reply: Result<ChatOutcome, ClientError>) -> (EngineHandle, Arc<Mutex<Vec<String>>>) {
    engine_logging::initialize_for_tests();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let backend = ScriptedBackend {
        seen: seen.clone(),
        reply,
    };
    (EngineHandle::with_backend(Arc::new(backend)).unwrap(), seen)
}

const WAIT: Duration = Duration::from_secs(5);

#[test]
fn send_chat_reports_reply() {
    let answer = ChatOutcome::Answer(ChatAnswer {
        answer: "hello".into(),
        ..ChatAnswer::default()
    });
    let (engine, seen) = engine_with(Ok(answer.clone()));

    engine.send_chat(4, "hi").unwrap();

    assert_eq!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::ReplyReady {
            request_id: 4,
            outcome: answer,
        })
    );
    assert_eq!(*seen.lock().unwrap(), vec!["hi".to_string()]);
}

#[test]
fn failed_call_still_resolves() {
    let (engine, _) = engine_with(Err(ClientError::Timeout));

    engine.send_chat(1, "hi").unwrap();

    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::ReplyReady {
            request_id: 1,
            outcome: ChatOutcome::TransportError(detail),
        }) => assert_eq!(detail, "request timed out"),
        other => panic!("unexpected event {other:?}"),
    }
}

/// Panics instead of answering.
struct PanickingBackend;

#[async_trait::async_trait]
impl ChatBackend for PanickingBackend {
    async fn send_message(&self, _text: &str) -> Result<ChatOutcome, ClientError> {
        panic!("backend blew up");
    }

    async fn status(&self) -> Result<BackendStatus, ClientError> {
        Err(ClientError::Network("down".into()))
    }
}

#[test]
fn panicking_backend_still_resolves_request() {
    engine_logging::initialize_for_tests();
    let engine = EngineHandle::with_backend(Arc::new(PanickingBackend)).unwrap();

    engine.send_chat(7, "hi").unwrap();

    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::ReplyReady {
            request_id: 7,
            outcome: ChatOutcome::TransportError(detail),
        }) => assert!(detail.contains("aborted"), "{detail}"),
        other => panic!("unexpected event {other:?}"),
    }

    // The engine keeps serving after the panic.
    engine.check_status().unwrap();
    assert!(matches!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::StatusReady(Err(_)))
    ));
}

#[test]
fn blocking_recv_waits_for_timer() {
    let (engine, _) = engine_with(Err(ClientError::Timeout));
    engine.focus_after(Duration::from_millis(10)).unwrap();
    assert_eq!(engine.recv(), Some(EngineEvent::FocusDelayElapsed));
}

#[test]
fn agent_join_waits_then_names_roster_agent() {
    let (engine, _) = engine_with(Err(ClientError::Timeout));

    engine.agent_join_after(9, Duration::from_millis(100)).unwrap();
    assert_eq!(engine.try_recv(), None);

    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::AgentJoinDue { message_id, agent }) => {
            assert_eq!(message_id, 9);
            assert!(AGENT_ROSTER.contains(&agent.as_str()));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn focus_timer_fires() {
    let (engine, _) = engine_with(Err(ClientError::Timeout));
    engine.focus_after(Duration::from_millis(10)).unwrap();
    assert_eq!(engine.recv_timeout(WAIT), Some(EngineEvent::FocusDelayElapsed));
}

#[test]
fn status_is_forwarded() {
    let (engine, _) = engine_with(Err(ClientError::Timeout));
    engine.check_status().unwrap();
    assert_eq!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::StatusReady(Ok(BackendStatus {
            status: "ready".into(),
            doc_count: 3,
        })))
    );
}
