use chat_core::{ChatAnswer, ChatOutcome, MessageId, RequestId, Source};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    #[serde(rename = "apiKey", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<&'a str>,
}

/// Body returned by `POST /chat`, either `{error}` or `{answer, sources?, escalation?}`.
///
/// The server also sends `context` and per-source `score`/`text`; those are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct ChatResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub sources: Option<Vec<SourceRef>>,
    #[serde(default)]
    pub escalation: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceRef {
    pub source_id: String,
}

impl ChatResponse {
    /// An empty `error` counts as no error.
    pub fn error_reason(&self) -> Option<&str> {
        self.error.as_deref().filter(|reason| !reason.is_empty())
    }

    pub fn into_outcome(self) -> Result<ChatOutcome, ClientError> {
        if let Some(reason) = self.error_reason() {
            return Ok(ChatOutcome::BackendError(reason.to_string()));
        }
        let answer = self
            .answer
            .ok_or_else(|| ClientError::Decode("response has neither answer nor error".into()))?;
        Ok(ChatOutcome::Answer(ChatAnswer {
            answer,
            sources: self
                .sources
                .unwrap_or_default()
                .into_iter()
                .map(|source| Source::new(source.source_id))
                .collect(),
            escalation: self.escalation.unwrap_or(false),
        }))
    }
}

/// Body returned by `GET /status`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackendStatus {
    pub status: String,
    pub doc_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
    #[error("request timed out")]
    Timeout,
    #[error("http status {0}")]
    Status(u16),
    #[error("undecodable response: {0}")]
    Decode(String),
    #[error("network error: {0}")]
    Network(String),
}

impl ClientError {
    /// Collapses a failed call into the outcome the session understands.
    pub fn into_outcome(self) -> ChatOutcome {
        ChatOutcome::TransportError(self.to_string())
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(ClientError),
    #[error("engine is no longer running")]
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ReplyReady {
        request_id: RequestId,
        outcome: ChatOutcome,
    },
    FocusDelayElapsed,
    AgentJoinDue {
        message_id: MessageId,
        agent: String,
    },
    StatusReady(Result<BackendStatus, ClientError>),
}
