//! Chat engine: backend client, timers and page snapshots for the widget.
mod agent;
mod backend;
mod engine;
mod snapshot;
mod types;

pub use agent::pick_agent;
pub use backend::{resolve_chat, BackendSettings, ChatBackend, HttpChatBackend};
pub use engine::EngineHandle;
pub use snapshot::{SnapshotError, SnapshotWriter};
pub use types::{
    BackendStatus, ChatRequest, ChatResponse, ClientError, EngineError, EngineEvent, SourceRef,
};
