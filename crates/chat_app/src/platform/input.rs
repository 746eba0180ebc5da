//! Maps terminal lines onto widget interactions.

use super::ui::constants::{
    CMD_CLOSE, CMD_CONNECT, CMD_HELP, CMD_OPEN, CMD_QUICK, CMD_QUIT, CMD_STATUS, CMD_TOGGLE,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Toggle,
    SetOpen(bool),
    /// 1-based index into the configured quick actions.
    QuickAction(usize),
    /// Connect on the newest prompt that still offers it.
    Connect,
    Status,
    Help,
    Quit,
    /// Anything else is typed into the input and sent.
    Send(String),
    Invalid(String),
}

pub fn parse_line(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !trimmed.starts_with('/') {
        return Some(Command::Send(line.trim_end_matches(['\r', '\n']).to_string()));
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let word = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    let command = match word {
        CMD_TOGGLE => Command::Toggle,
        CMD_OPEN => Command::SetOpen(true),
        CMD_CLOSE => Command::SetOpen(false),
        CMD_CONNECT => Command::Connect,
        CMD_STATUS => Command::Status,
        CMD_HELP => Command::Help,
        CMD_QUIT => Command::Quit,
        CMD_QUICK => match arg.parse::<usize>() {
            Ok(index) if index > 0 => Command::QuickAction(index),
            _ => Command::Invalid(format!("{CMD_QUICK} expects a chip number, got {arg:?}")),
        },
        other => Command::Invalid(format!("unknown command {other}")),
    };
    Some(command)
}
