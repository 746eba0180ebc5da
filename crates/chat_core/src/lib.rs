//! Chat core: pure session state machine, view model and message rendering.
mod conversation;
mod effect;
mod msg;
mod render;
mod state;
mod update;
mod view_model;

pub use conversation::{ConversationView, SyncReport, ViewElement};
pub use effect::Effect;
pub use msg::{ChatAnswer, ChatOutcome, Msg};
pub use render::{
    escape_html, highlight_citations, render_message, CmarkRenderer, MarkdownRenderer,
    RenderedMessage,
};
pub use state::{
    Author, ChatSession, EscalationPrompt, Message, MessageId, MessageKind, RequestId, Source,
    Timings, AGENT_ROSTER, TRANSPORT_ERROR_TEXT,
};
pub use update::update;
pub use view_model::ChatViewModel;
