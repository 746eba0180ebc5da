use std::time::Duration;

use chrono::NaiveTime;

use crate::view_model::ChatViewModel;

pub type MessageId = u64;
pub type RequestId = u64;

/// Names the simulated hand-off may announce.
pub const AGENT_ROSTER: [&str; 3] = ["Sarah", "Mike", "Priya"];

/// Shown instead of the underlying failure when a backend call cannot complete.
pub const TRANSPORT_ERROR_TEXT: &str = "❌ Error connecting to server. Please try again.";

const SOURCE_ID_DELIMITER: &str = "::";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Bot,
}

/// One citation backing an answer, e.g. `faq.txt::row_2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub source_id: String,
}

impl Source {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
        }
    }

    /// Text before the first `::`, or the whole id when there is none.
    pub fn display_label(&self) -> &str {
        self.source_id
            .split_once(SOURCE_ID_DELIMITER)
            .map_or(self.source_id.as_str(), |(label, _)| label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    /// User input or a backend answer.
    Text,
    /// Backend or transport failure surfaced to the user.
    Error,
    /// Scripted announcement from the simulated hand-off.
    AgentJoined { agent: String },
}

/// Progress of the "Connect" action on an escalated answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscalationPrompt {
    Available,
    Connecting,
    Connected { agent: String },
}

impl EscalationPrompt {
    pub fn is_actionable(&self) -> bool {
        matches!(self, EscalationPrompt::Available)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    /// Bumped whenever the rendered form of an already-appended message changes.
    pub revision: u32,
    pub author: Author,
    pub kind: MessageKind,
    pub text: String,
    pub timestamp: NaiveTime,
    pub sources: Vec<Source>,
    pub escalation: Option<EscalationPrompt>,
}

/// Cosmetic delays handed to the platform through effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub focus_delay: Duration,
    pub agent_join_delay: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            focus_delay: Duration::from_millis(300),
            agent_join_delay: Duration::from_secs(2),
        }
    }
}

/// State of one mounted widget. Dropping it is the unmount.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatSession {
    timings: Timings,
    is_open: bool,
    input: String,
    input_focused: bool,
    pending: Option<RequestId>,
    messages: Vec<Message>,
    last_message_id: MessageId,
    last_request_id: RequestId,
    dirty: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timings(timings: Timings) -> Self {
        Self {
            timings,
            ..Self::default()
        }
    }

    pub fn view(&self) -> ChatViewModel {
        ChatViewModel {
            is_open: self.is_open,
            launcher_visible: !self.is_open,
            input: self.input.clone(),
            input_enabled: self.pending.is_none(),
            input_focused: self.input_focused,
            typing_visible: self.pending.is_some(),
            messages: self.messages.clone(),
            dirty: self.dirty,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn pending_request(&self) -> Option<RequestId> {
        self.pending
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    /// Returns whether anything visible changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_open(&mut self, open: bool) {
        self.is_open = open;
        if !open {
            self.input_focused = false;
        }
        self.mark_dirty();
    }

    pub(crate) fn focus_input(&mut self) {
        if !self.input_focused {
            self.input_focused = true;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    /// Trimmed input, or `None` when there is nothing to send.
    pub(crate) fn sendable_input(&self) -> Option<String> {
        let trimmed = self.input.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    pub(crate) fn clear_input(&mut self) {
        self.input.clear();
        self.mark_dirty();
    }

    pub(crate) fn begin_request(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.pending = Some(self.last_request_id);
        self.mark_dirty();
        self.last_request_id
    }

    /// Clears the pending request if it is `request_id`.
    pub(crate) fn finish_request(&mut self, request_id: RequestId) -> bool {
        if self.pending == Some(request_id) {
            self.pending = None;
            self.mark_dirty();
            true
        } else {
            false
        }
    }

    pub(crate) fn push_message(
        &mut self,
        author: Author,
        kind: MessageKind,
        text: String,
        timestamp: NaiveTime,
    ) -> &mut Message {
        self.last_message_id += 1;
        self.messages.push(Message {
            id: self.last_message_id,
            revision: 0,
            author,
            kind,
            text,
            timestamp,
            sources: Vec::new(),
            escalation: None,
        });
        self.mark_dirty();
        let last = self.messages.len() - 1;
        &mut self.messages[last]
    }

    pub(crate) fn escalation(&self, message_id: MessageId) -> Option<&EscalationPrompt> {
        self.messages
            .iter()
            .find(|message| message.id == message_id)
            .and_then(|message| message.escalation.as_ref())
    }

    pub(crate) fn set_escalation(&mut self, message_id: MessageId, prompt: EscalationPrompt) {
        if let Some(message) = self
            .messages
            .iter_mut()
            .find(|message| message.id == message_id)
        {
            message.escalation = Some(prompt);
            message.revision += 1;
            self.dirty = true;
        }
    }
}
