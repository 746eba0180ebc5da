use chrono::NaiveTime;

use crate::{MessageId, RequestId, Source};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Launcher or minimize button clicked.
    ToggleClicked,
    /// Force the widget into the given open state (no-op when already there).
    SetOpen(bool),
    /// The post-open focus delay ran out.
    FocusDelayElapsed,
    /// User edited the text input.
    InputChanged(String),
    /// User pressed Enter or clicked Send.
    SendRequested { at: NaiveTime },
    /// User clicked a quick-action chip carrying `query`.
    QuickActionClicked { query: String, at: NaiveTime },
    /// The backend call for `request_id` resolved.
    ReplyReceived {
        request_id: RequestId,
        outcome: ChatOutcome,
        at: NaiveTime,
    },
    /// User clicked Connect on the escalation prompt of `message_id`.
    ConnectAgentClicked { message_id: MessageId },
    /// The simulated hand-off for `message_id` finished with `agent`.
    AgentJoined {
        message_id: MessageId,
        agent: String,
        at: NaiveTime,
    },
}

/// Resolution of one backend call. Every call ends in exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    Answer(ChatAnswer),
    /// The server answered but reported a failure.
    BackendError(String),
    /// The call never produced a usable answer. The detail is for logs only.
    TransportError(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatAnswer {
    pub answer: String,
    pub sources: Vec<Source>,
    pub escalation: bool,
}
