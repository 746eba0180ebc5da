use std::time::Duration;

use chat_core::ChatOutcome;
use engine_logging::{engine_debug, engine_warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::{BackendStatus, ChatRequest, ChatResponse, ClientError};

#[derive(Debug, Clone)]
pub struct BackendSettings {
    /// Origin serving `/chat` and `/status`, without trailing path.
    pub base_url: String,
    /// Forwarded as `apiKey` for backends that accept a caller-supplied key.
    pub api_key: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            api_key: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// One best-effort exchange. `Ok` covers answers and server-reported errors.
    async fn send_message(&self, text: &str) -> Result<ChatOutcome, ClientError>;

    async fn status(&self) -> Result<BackendStatus, ClientError>;
}

/// Runs one exchange and folds every failure into a [`ChatOutcome`].
pub async fn resolve_chat(backend: &dyn ChatBackend, text: &str) -> ChatOutcome {
    match backend.send_message(text).await {
        Ok(outcome) => outcome,
        Err(err) => err.into_outcome(),
    }
}

#[derive(Debug, Clone)]
pub struct HttpChatBackend {
    settings: BackendSettings,
    client: reqwest::Client,
}

impl HttpChatBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, ClientError> {
        let base = self.settings.base_url.trim_end_matches('/');
        reqwest::Url::parse(&format!("{base}{path}"))
            .map_err(|err| ClientError::InvalidUrl(err.to_string()))
    }
}

#[async_trait::async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send_message(&self, text: &str) -> Result<ChatOutcome, ClientError> {
        let url = self.endpoint("/chat")?;
        let body = serde_json::to_vec(&ChatRequest {
            message: text,
            api_key: self.settings.api_key.as_deref(),
        })
        .map_err(|err| ClientError::Decode(err.to_string()))?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        engine_debug!("POST /chat -> {} ({} bytes)", status, bytes.len());

        let decoded = serde_json::from_slice::<ChatResponse>(&bytes);
        if !status.is_success() {
            // A JSON body still decides the outcome: the server rejects bad input
            // with `{error}`, and an `answer` is shown whatever the status.
            return match decoded {
                Ok(parsed) if parsed.error_reason().is_some() || parsed.answer.is_some() => {
                    parsed.into_outcome()
                }
                _ => {
                    engine_warn!("Chat backend answered {} without an error body", status);
                    Err(ClientError::Status(status.as_u16()))
                }
            };
        }

        decoded
            .map_err(|err| ClientError::Decode(err.to_string()))?
            .into_outcome()
    }

    async fn status(&self) -> Result<BackendStatus, ClientError> {
        let url = self.endpoint("/status")?;
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode(err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::Timeout;
    }
    ClientError::Network(err.to_string())
}
