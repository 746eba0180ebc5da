use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use chat_core::{ChatOutcome, MessageId, RequestId};
use engine_logging::{engine_debug, engine_error, engine_info};

use crate::agent::pick_agent;
use crate::backend::{resolve_chat, BackendSettings, ChatBackend, HttpChatBackend};
use crate::{EngineError, EngineEvent};

enum EngineCommand {
    SendChat { request_id: RequestId, text: String },
    FocusAfter { delay: Duration },
    AgentJoinAfter { message_id: MessageId, delay: Duration },
    CheckStatus,
}

/// Owns the async runtime that talks to the chat backend and drives timers.
///
/// Commands go in over a channel; results come back as [`EngineEvent`]s.
/// The handle is `Sync`, so one thread can issue commands while another drains events.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Mutex<mpsc::Receiver<EngineEvent>>,
}

impl EngineHandle {
    pub fn new(settings: BackendSettings) -> Result<Self, EngineError> {
        let backend = HttpChatBackend::new(settings).map_err(EngineError::Client)?;
        Self::with_backend(Arc::new(backend))
    }

    pub fn with_backend(backend: Arc<dyn ChatBackend>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let backend = backend.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(backend, command, event_tx).await;
                });
            }
            engine_debug!("Engine command channel closed");
        });

        Ok(Self {
            cmd_tx,
            event_rx: Mutex::new(event_rx),
        })
    }

    /// Fails only when the engine thread is gone; no reply will follow in that case.
    pub fn send_chat(
        &self,
        request_id: RequestId,
        text: impl Into<String>,
    ) -> Result<(), EngineError> {
        self.command(EngineCommand::SendChat {
            request_id,
            text: text.into(),
        })
    }

    pub fn focus_after(&self, delay: Duration) -> Result<(), EngineError> {
        self.command(EngineCommand::FocusAfter { delay })
    }

    pub fn agent_join_after(
        &self,
        message_id: MessageId,
        delay: Duration,
    ) -> Result<(), EngineError> {
        self.command(EngineCommand::AgentJoinAfter { message_id, delay })
    }

    pub fn check_status(&self) -> Result<(), EngineError> {
        self.command(EngineCommand::CheckStatus)
    }

    /// Blocks until the next event; `None` once the engine has shut down.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv().ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }

    fn command(&self, command: EngineCommand) -> Result<(), EngineError> {
        self.cmd_tx.send(command).map_err(|_| EngineError::Stopped)
    }
}

async fn handle_command(
    backend: Arc<dyn ChatBackend>,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::SendChat { request_id, text } => {
            // Its own task, so a panicking backend still resolves the request.
            let call = tokio::spawn(async move { resolve_chat(backend.as_ref(), &text).await });
            let outcome = match call.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    engine_error!("Chat request {} aborted: {}", request_id, err);
                    ChatOutcome::TransportError(format!("backend call aborted: {err}"))
                }
            };
            engine_info!("Chat request {} resolved", request_id);
            EngineEvent::ReplyReady {
                request_id,
                outcome,
            }
        }
        EngineCommand::FocusAfter { delay } => {
            tokio::time::sleep(delay).await;
            EngineEvent::FocusDelayElapsed
        }
        EngineCommand::AgentJoinAfter { message_id, delay } => {
            tokio::time::sleep(delay).await;
            let agent = pick_agent(&mut rand::thread_rng()).to_string();
            EngineEvent::AgentJoinDue { message_id, agent }
        }
        EngineCommand::CheckStatus => EngineEvent::StatusReady(backend.status().await),
    };
    let _ = event_tx.send(event);
}
