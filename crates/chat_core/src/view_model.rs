use crate::Message;

/// Everything the platform needs to draw the widget.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatViewModel {
    pub is_open: bool,
    pub launcher_visible: bool,
    pub input: String,
    /// False while a request is pending; sends are dropped until it resolves.
    pub input_enabled: bool,
    pub input_focused: bool,
    pub typing_visible: bool,
    pub messages: Vec<Message>,
    pub dirty: bool,
}

impl ChatViewModel {
    /// Latest message whose escalation prompt can still be acted on.
    pub fn latest_actionable_escalation(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|message| {
            message
                .escalation
                .as_ref()
                .is_some_and(|prompt| prompt.is_actionable())
        })
    }
}
