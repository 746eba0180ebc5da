use chat_core::{Author, ChatViewModel, EscalationPrompt, Message, MessageKind};

use super::constants::*;
use crate::platform::config::QuickAction;

/// Terminal lines for one message.
pub fn transcript(message: &Message) -> Vec<String> {
    let time = message.timestamp.format("%H:%M");
    let mut lines = match (&message.author, &message.kind) {
        (_, MessageKind::AgentJoined { agent }) => {
            vec![format!("[{time}] Agent {agent} joined the chat.")]
        }
        (Author::User, _) => vec![format!("[{time}] You: {}", message.text)],
        (Author::Bot, _) => vec![format!("[{time}] Bot: {}", message.text)],
    };

    if !message.sources.is_empty() {
        let chips: Vec<String> = message
            .sources
            .iter()
            .enumerate()
            .map(|(index, source)| format!("[{}] {}", index + 1, source.display_label()))
            .collect();
        lines.push(format!("        Sources: {}", chips.join("  ")));
    }
    if let Some(prompt) = &message.escalation {
        lines.push(escalation_line(prompt));
    }
    lines
}

/// Status shown when an escalation prompt changes after it was first printed.
pub fn escalation_line(prompt: &EscalationPrompt) -> String {
    match prompt {
        EscalationPrompt::Available => format!(
            "        Human agent needed? Type {CMD_CONNECT} to reach a specialist."
        ),
        EscalationPrompt::Connecting => "        Connecting...".to_string(),
        EscalationPrompt::Connected { agent } => format!("        Connected to {agent}."),
    }
}

pub fn visibility_line(view: &ChatViewModel) -> &'static str {
    if view.is_open {
        "-- chat opened --"
    } else {
        "-- chat minimized --"
    }
}

pub fn help(quick_actions: &[QuickAction]) -> Vec<String> {
    let mut lines = vec![
        format!("Type a question and press Enter to send. {CMD_OPEN} / {CMD_CLOSE} / {CMD_TOGGLE} show or hide the chat."),
        format!("{CMD_CONNECT} answers the latest escalation prompt, {CMD_STATUS} checks the backend, {CMD_QUIT} exits."),
    ];
    for (index, action) in quick_actions.iter().enumerate() {
        lines.push(format!("  {CMD_QUICK} {}  {}", index + 1, action.label));
    }
    lines
}
