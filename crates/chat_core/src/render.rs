use std::borrow::Cow;
use std::fmt::Write as _;
use std::sync::LazyLock;

use pulldown_cmark::{html, Options, Parser};
use regex::Regex;

use crate::{Author, EscalationPrompt, Message, MessageId, MessageKind, Source};

/// `[3]` and `[3 from search]`; both render as `[3]`.
static CITATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d+)(?: from search)?\]").expect("citation pattern is valid")
});

/// Markdown to HTML. Implementations must be pure.
pub trait MarkdownRenderer: Send + Sync {
    fn to_html(&self, markdown: &str) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CmarkRenderer;

impl MarkdownRenderer for CmarkRenderer {
    fn to_html(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        let parser = Parser::new_ext(markdown, options);
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

/// One message rendered to markup, ready to be inserted into a conversation view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub id: MessageId,
    pub revision: u32,
    pub html: String,
}

/// Wraps citation markers in already-rendered HTML.
pub fn highlight_citations(html: &str) -> Cow<'_, str> {
    CITATION.replace_all(html, r#"<span class="citation-link">[${1}]</span>"#)
}

pub fn render_message(message: &Message, renderer: &dyn MarkdownRenderer) -> RenderedMessage {
    let body = renderer.to_html(&message.text);
    let body = highlight_citations(&body);

    let author_class = match message.author {
        Author::User => "user",
        Author::Bot => "bot",
    };
    let (kind_class, bubble_class, meta) = match &message.kind {
        MessageKind::Text => ("", "bubble", message.timestamp.format("%H:%M").to_string()),
        MessageKind::Error => (" error", "bubble", message.timestamp.format("%H:%M").to_string()),
        MessageKind::AgentJoined { .. } => {
            (" agent", "bubble agent-bubble", "Agent • Just now".to_string())
        }
    };

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<div class="message {author_class}{kind_class}" data-message-id="{id}">"#,
        id = message.id
    );
    let _ = write!(out, r#"<div class="{bubble_class}">{body}</div>"#);
    let _ = write!(out, r#"<div class="message-meta">{meta}</div>"#);

    // Error bubbles never carry answer decorations.
    if message.kind != MessageKind::Error {
        if let Some(prompt) = &message.escalation {
            push_escalation(&mut out, message.id, prompt);
        }
        if !message.sources.is_empty() {
            push_sources(&mut out, &message.sources);
        }
    }
    out.push_str("</div>");

    RenderedMessage {
        id: message.id,
        revision: message.revision,
        html: out,
    }
}

fn push_escalation(out: &mut String, message_id: MessageId, prompt: &EscalationPrompt) {
    let (button_class, attrs, label) = match prompt {
        EscalationPrompt::Available => ("escalate-btn", "", "Connect Now"),
        EscalationPrompt::Connecting => ("escalate-btn connecting", " disabled", "Connecting..."),
        EscalationPrompt::Connected { .. } => ("escalate-btn connected", " disabled", "Connected"),
    };
    out.push_str(r#"<div class="escalation-box">"#);
    out.push_str(r#"<div class="escalation-title">Human Agent Needed?</div>"#);
    out.push_str(
        r#"<p class="escalation-text">This query seems complex. Would you like to connect with a specialist?</p>"#,
    );
    let _ = write!(
        out,
        r#"<button class="{button_class}" data-action="connect-agent" data-message-id="{message_id}"{attrs}>{label}</button>"#
    );
    out.push_str("</div>");
}

fn push_sources(out: &mut String, sources: &[Source]) {
    out.push_str(r#"<div class="sources-container">"#);
    out.push_str(r#"<div class="sources-title">📚 Sources:</div>"#);
    out.push_str(r#"<div class="sources-list">"#);
    for (index, source) in sources.iter().enumerate() {
        let label = escape_html(source.display_label());
        let _ = write!(
            out,
            r#"<div class="source-chip" title="{label}"><span class="source-index">[{n}]</span><span class="source-label">{label}</span></div>"#,
            n = index + 1
        );
    }
    out.push_str("</div></div>");
}

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(raw);
    }
    let mut escaped = String::with_capacity(raw.len() + 8);
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}
