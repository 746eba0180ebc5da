use std::fmt::Write as _;

use chat_core::{escape_html, ChatViewModel, ConversationView};

use super::constants::*;
use crate::platform::config::QuickAction;

const PAGE_STYLE: &str = "\
.launcher{position:fixed;bottom:24px;right:24px}\
.chat-widget{display:none;position:fixed;bottom:24px;right:24px;width:380px}\
.chat-widget.active{display:flex;flex-direction:column}\
.chat-area{overflow-y:auto;max-height:480px}\
.message.user{text-align:right}\
.citation-link{color:#2563eb;font-weight:600}\
.source-chip{display:inline-flex;gap:4px;font-size:10px}\
.typing-indicator span{display:inline-block;width:6px;height:6px;border-radius:3px;background:#9ca3af;margin:0 2px}";

/// Full widget page: launcher, panel, conversation, quick actions and input.
pub fn page(
    view: &ChatViewModel,
    conversation: &ConversationView,
    quick_actions: &[QuickAction],
) -> String {
    let widget_class = if view.is_open {
        "chat-widget active"
    } else {
        "chat-widget"
    };
    let launcher_style = if view.launcher_visible {
        "transform: scale(1) rotate(0deg);"
    } else {
        "transform: scale(0) rotate(180deg);"
    };
    let input_attrs = match (view.input_enabled, view.input_focused) {
        (true, true) => " autofocus",
        (true, false) => "",
        (false, _) => " disabled",
    };

    let mut out = String::from("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">");
    let _ = write!(out, "<title>Support chat</title><style>{PAGE_STYLE}</style></head><body>");
    let _ = write!(
        out,
        r#"<button id="{LAUNCHER_BTN}" class="launcher" style="{launcher_style}">Chat</button>"#
    );
    let _ = write!(out, r#"<div id="{CHAT_WIDGET}" class="{widget_class}">"#);
    let _ = write!(
        out,
        r#"<div class="chat-header"><span>Support</span><button id="{MINIMIZE_BTN}">&minus;</button></div>"#
    );
    out.push_str(&conversation.to_html());

    let _ = write!(out, r#"<div class="{QUICK_ACTIONS}">"#);
    for action in quick_actions {
        let _ = write!(
            out,
            r#"<button class="chip" data-query="{}">{}</button>"#,
            escape_html(&action.query),
            escape_html(&action.label)
        );
    }
    out.push_str("</div>");

    let _ = write!(
        out,
        r#"<div class="chat-input"><input id="{USER_INPUT}" type="text" placeholder="Type your question..." value="{}"{input_attrs}><button id="{SEND_BTN}"{}>Send</button></div>"#,
        escape_html(&view.input),
        if view.input_enabled { "" } else { " disabled" }
    );
    out.push_str("</div></body></html>\n");
    out
}
