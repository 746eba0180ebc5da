use std::sync::{mpsc, Arc};
use std::thread;

use chat_core::{ChatOutcome, Effect, Msg, RequestId};
use chat_engine::{BackendSettings, EngineError, EngineEvent, EngineHandle};
use chrono::Local;
use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};

use super::app::AppEvent;

/// Executes effects from the session on the engine and feeds results back as events.
pub struct EffectRunner {
    engine: Arc<EngineHandle>,
    event_tx: mpsc::Sender<AppEvent>,
}

impl EffectRunner {
    pub fn new(
        settings: BackendSettings,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Result<Self, EngineError> {
        engine_info!("Chat backend at {}", settings.base_url);
        let engine = Arc::new(EngineHandle::new(settings)?);
        let runner = Self { engine, event_tx };
        runner.spawn_event_loop();
        Ok(runner)
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FocusInputAfter { delay } => {
                    if let Err(err) = self.engine.focus_after(delay) {
                        engine_warn!("Focus timer not started: {}", err);
                    }
                }
                Effect::SendChat { request_id, text } => {
                    engine_debug!("Forwarding request {} to the engine", request_id);
                    if let Err(err) = self.engine.send_chat(request_id, text) {
                        // Nothing will answer this request, so resolve it here.
                        engine_error!("Request {} not sent: {}", request_id, err);
                        let _ = self.event_tx.send(undeliverable_reply(request_id, &err));
                    }
                }
                Effect::ScheduleAgentJoin { message_id, delay } => {
                    engine_debug!("Agent join for message {} in {:?}", message_id, delay);
                    if let Err(err) = self.engine.agent_join_after(message_id, delay) {
                        engine_warn!(
                            "Agent join for message {} not scheduled: {}",
                            message_id,
                            err
                        );
                    }
                }
            }
        }
    }

    pub fn check_status(&self) {
        if let Err(err) = self.engine.check_status() {
            engine_warn!("Status check not sent: {}", err);
        }
    }

    fn spawn_event_loop(&self) {
        let engine = self.engine.clone();
        let event_tx = self.event_tx.clone();
        thread::spawn(move || {
            while let Some(event) = engine.recv() {
                if event_tx.send(map_event(event)).is_err() {
                    return;
                }
            }
            engine_debug!("Engine event channel closed");
        });
    }
}

fn undeliverable_reply(request_id: RequestId, err: &EngineError) -> AppEvent {
    AppEvent::Core(Msg::ReplyReceived {
        request_id,
        outcome: ChatOutcome::TransportError(err.to_string()),
        at: Local::now().time(),
    })
}

fn map_event(event: EngineEvent) -> AppEvent {
    let at = Local::now().time();
    match event {
        EngineEvent::ReplyReady {
            request_id,
            outcome,
        } => AppEvent::Core(Msg::ReplyReceived {
            request_id,
            outcome,
            at,
        }),
        EngineEvent::FocusDelayElapsed => AppEvent::Core(Msg::FocusDelayElapsed),
        EngineEvent::AgentJoinDue { message_id, agent } => AppEvent::Core(Msg::AgentJoined {
            message_id,
            agent,
            at,
        }),
        EngineEvent::StatusReady(status) => AppEvent::Status(status),
    }
}
