use chat_core::{
    render_message, update, ChatAnswer, ChatOutcome, ChatSession, CmarkRenderer, EscalationPrompt,
    MarkdownRenderer, Message, Msg, Source,
};
use chrono::NaiveTime;
use pretty_assertions::assert_eq;

fn at() -> NaiveTime {
    NaiveTime::from_hms_opt(14, 5, 0).unwrap()
}

/// Runs one send/reply round trip and returns the bot message.
fn bot_reply(outcome: ChatOutcome) -> Message {
    let (state, _) = update(ChatSession::new(), Msg::InputChanged("question".into()));
    let (state, _) = update(state, Msg::SendRequested { at: at() });
    let (state, _) = update(
        state,
        Msg::ReplyReceived {
            request_id: 1,
            outcome,
            at: at(),
        },
    );
    state.messages()[1].clone()
}

struct Verbatim;

impl MarkdownRenderer for Verbatim {
    fn to_html(&self, markdown: &str) -> String {
        markdown.to_string()
    }
}

#[test]
fn answer_highlights_citation_and_shows_source_chip() {
    let message = bot_reply(ChatOutcome::Answer(ChatAnswer {
        answer: "Hi [1]".into(),
        sources: vec![Source::new("faq.txt::row_2")],
        escalation: false,
    }));

    let html = render_message(&message, &CmarkRenderer).html;

    assert!(html.contains(r#"<p>Hi <span class="citation-link">[1]</span></p>"#));
    assert_eq!(html.matches(r#"class="source-chip""#).count(), 1);
    assert!(html.contains(r#"<span class="source-index">[1]</span>"#));
    assert!(html.contains(r#"<span class="source-label">faq.txt</span>"#));
    assert!(!html.contains("row_2"));
    assert!(!html.contains("escalation-box"));
    assert!(html.contains(r#"<div class="message-meta">14:05</div>"#));
}

#[test]
fn error_reply_renders_without_decorations() {
    let message = bot_reply(ChatOutcome::BackendError("not found".into()));

    let html = render_message(&message, &CmarkRenderer).html;

    assert!(html.starts_with(r#"<div class="message bot error""#));
    assert!(html.contains("⚠️ Error: not found"));
    assert!(!html.contains("sources-container"));
    assert!(!html.contains("escalation-box"));
    assert!(!html.contains("escalate-btn"));
}

#[test]
fn search_citations_are_normalized_after_markdown() {
    let message = bot_reply(ChatOutcome::Answer(ChatAnswer {
        answer: "Restart it [2 from search] and **wait** [10].".into(),
        ..ChatAnswer::default()
    }));

    let html = render_message(&message, &CmarkRenderer).html;

    assert!(html.contains(
        r#"<p>Restart it <span class="citation-link">[2]</span> and <strong>wait</strong> <span class="citation-link">[10]</span>.</p>"#
    ));
    assert!(!html.contains("from search"));
}

#[test]
fn highlighting_runs_on_renderer_output() {
    let message = bot_reply(ChatOutcome::Answer(ChatAnswer {
        answer: "plain [3]".into(),
        ..ChatAnswer::default()
    }));

    let html = render_message(&message, &Verbatim).html;
    assert!(html.contains(r#"<div class="bubble">plain <span class="citation-link">[3]</span></div>"#));
}

#[test]
fn sources_are_numbered_in_order() {
    let message = bot_reply(ChatOutcome::Answer(ChatAnswer {
        answer: "see below".into(),
        sources: vec![
            Source::new("manual.txt::row_5"),
            Source::new("plain-id"),
            Source::new("a::b::c"),
        ],
        escalation: false,
    }));

    let html = render_message(&message, &CmarkRenderer).html;

    let first = html.find(r#"[1]</span><span class="source-label">manual.txt<"#);
    let second = html.find(r#"[2]</span><span class="source-label">plain-id<"#);
    let third = html.find(r#"[3]</span><span class="source-label">a<"#);
    assert!(first.is_some() && second.is_some() && third.is_some());
    assert!(first < second && second < third);
}

#[test]
fn source_labels_are_escaped() {
    let message = bot_reply(ChatOutcome::Answer(ChatAnswer {
        answer: "x".into(),
        sources: vec![Source::new("<script>.csv::row_1")],
        escalation: false,
    }));

    let html = render_message(&message, &CmarkRenderer).html;
    assert!(html.contains("&lt;script&gt;.csv"));
    assert!(!html.contains("<script>"));
}

#[test]
fn escalation_prompt_has_one_connect_control() {
    let message = bot_reply(ChatOutcome::Answer(ChatAnswer {
        answer: "I am not sure.".into(),
        sources: Vec::new(),
        escalation: true,
    }));
    assert_eq!(message.escalation, Some(EscalationPrompt::Available));

    let html = render_message(&message, &CmarkRenderer).html;

    assert_eq!(html.matches("escalation-box").count(), 1);
    assert_eq!(html.matches("<button").count(), 1);
    assert!(html.contains(&format!(
        r#"<button class="escalate-btn" data-action="connect-agent" data-message-id="{}">Connect Now</button>"#,
        message.id
    )));
    assert!(!html.contains("sources-container"));
}

#[test]
fn connecting_prompt_renders_disabled() {
    let mut message = bot_reply(ChatOutcome::Answer(ChatAnswer {
        answer: "hmm".into(),
        sources: Vec::new(),
        escalation: true,
    }));

    message.escalation = Some(EscalationPrompt::Connecting);
    let html = render_message(&message, &CmarkRenderer).html;
    assert!(html.contains(" disabled>Connecting...</button>"));

    message.escalation = Some(EscalationPrompt::Connected {
        agent: "Mike".into(),
    });
    let html = render_message(&message, &CmarkRenderer).html;
    assert!(html.contains(r#"class="escalate-btn connected""#));
    assert!(html.contains(" disabled>Connected</button>"));
}

#[test]
fn user_text_goes_through_markdown() {
    let (state, _) = update(ChatSession::new(), Msg::InputChanged("*why* [1]".into()));
    let (state, _) = update(state, Msg::SendRequested { at: at() });

    let html = render_message(&state.messages()[0], &CmarkRenderer).html;
    assert!(html.starts_with(r#"<div class="message user" data-message-id="1">"#));
    assert!(html.contains(r#"<em>why</em> <span class="citation-link">[1]</span>"#));
}
