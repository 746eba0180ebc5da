use std::time::Duration;

use crate::{MessageId, RequestId};

/// Side effects requested by [`crate::update`]; executed by the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Focus the text input once the open transition has had time to finish.
    FocusInputAfter { delay: Duration },
    /// Issue exactly one backend call for `text`; resolves as `Msg::ReplyReceived`.
    SendChat { request_id: RequestId, text: String },
    /// Resolve the simulated agent hand-off after `delay` as `Msg::AgentJoined`.
    ScheduleAgentJoin { message_id: MessageId, delay: Duration },
}
