use chrono::NaiveTime;
use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};

use crate::{
    Author, ChatOutcome, ChatSession, Effect, EscalationPrompt, MessageId, MessageKind, Msg,
    RequestId, AGENT_ROSTER, TRANSPORT_ERROR_TEXT,
};

const AGENT_GREETING: &str = "Hi there! I'm reading through your issue now. Give me a moment.";

/// Pure update function: applies a message to the session and returns any effects.
pub fn update(mut session: ChatSession, msg: Msg) -> (ChatSession, Vec<Effect>) {
    let effects = match msg {
        Msg::ToggleClicked => {
            let open = !session.is_open();
            apply_open(&mut session, open)
        }
        Msg::SetOpen(open) => {
            if session.is_open() == open {
                Vec::new()
            } else {
                apply_open(&mut session, open)
            }
        }
        Msg::FocusDelayElapsed => {
            // The widget may have been closed again before the delay ran out.
            if session.is_open() {
                session.focus_input();
            }
            Vec::new()
        }
        Msg::InputChanged(text) => {
            if session.pending_request().is_none() {
                session.set_input(text);
            }
            Vec::new()
        }
        Msg::SendRequested { at } => send(&mut session, at),
        Msg::QuickActionClicked { query, at } => {
            if session.pending_request().is_some() {
                engine_debug!("Quick action ignored while a request is pending");
                Vec::new()
            } else {
                session.set_input(query);
                send(&mut session, at)
            }
        }
        Msg::ReplyReceived {
            request_id,
            outcome,
            at,
        } => {
            receive(&mut session, request_id, outcome, at);
            Vec::new()
        }
        Msg::ConnectAgentClicked { message_id } => connect_agent(&mut session, message_id),
        Msg::AgentJoined {
            message_id,
            agent,
            at,
        } => {
            agent_joined(&mut session, message_id, agent, at);
            Vec::new()
        }
    };

    (session, effects)
}

fn apply_open(session: &mut ChatSession, open: bool) -> Vec<Effect> {
    session.set_open(open);
    if open {
        vec![Effect::FocusInputAfter {
            delay: session.timings().focus_delay,
        }]
    } else {
        Vec::new()
    }
}

fn send(session: &mut ChatSession, at: NaiveTime) -> Vec<Effect> {
    let Some(text) = session.sendable_input() else {
        return Vec::new();
    };
    if let Some(pending) = session.pending_request() {
        engine_debug!("Send dropped: request {} still pending", pending);
        return Vec::new();
    }

    session.clear_input();
    session.push_message(Author::User, MessageKind::Text, text.clone(), at);
    let request_id = session.begin_request();
    engine_info!("SendChat request_id={} text_len={}", request_id, text.len());
    vec![Effect::SendChat { request_id, text }]
}

fn receive(session: &mut ChatSession, request_id: RequestId, outcome: ChatOutcome, at: NaiveTime) {
    // Hide the typing indicator before anything is appended.
    if !session.finish_request(request_id) {
        engine_warn!("Ignoring reply for request {} that is not pending", request_id);
        return;
    }

    match outcome {
        ChatOutcome::Answer(answer) => {
            let message = session.push_message(Author::Bot, MessageKind::Text, answer.answer, at);
            message.sources = answer.sources;
            if answer.escalation {
                message.escalation = Some(EscalationPrompt::Available);
            }
        }
        ChatOutcome::BackendError(reason) => {
            session.push_message(
                Author::Bot,
                MessageKind::Error,
                format!("⚠️ Error: {reason}"),
                at,
            );
        }
        ChatOutcome::TransportError(detail) => {
            engine_error!("Chat request {} failed: {}", request_id, detail);
            session.push_message(
                Author::Bot,
                MessageKind::Error,
                TRANSPORT_ERROR_TEXT.to_string(),
                at,
            );
        }
    }
}

fn connect_agent(session: &mut ChatSession, message_id: MessageId) -> Vec<Effect> {
    let actionable = session
        .escalation(message_id)
        .is_some_and(EscalationPrompt::is_actionable);
    if !actionable {
        return Vec::new();
    }

    session.set_escalation(message_id, EscalationPrompt::Connecting);
    vec![Effect::ScheduleAgentJoin {
        message_id,
        delay: session.timings().agent_join_delay,
    }]
}

fn agent_joined(session: &mut ChatSession, message_id: MessageId, agent: String, at: NaiveTime) {
    if session.escalation(message_id) != Some(&EscalationPrompt::Connecting) {
        engine_warn!("Agent join for message {} without a connecting prompt", message_id);
        return;
    }
    if !AGENT_ROSTER.contains(&agent.as_str()) {
        engine_warn!("Agent {:?} is not on the roster", agent);
        return;
    }

    let text = format!("**💁‍♀️ Agent {agent} joined the chat**<br>\n{AGENT_GREETING}");
    session.push_message(
        Author::Bot,
        MessageKind::AgentJoined {
            agent: agent.clone(),
        },
        text,
        at,
    );
    session.set_escalation(message_id, EscalationPrompt::Connected { agent });
}
