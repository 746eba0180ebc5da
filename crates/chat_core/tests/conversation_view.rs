use chat_core::{
    update, ChatAnswer, ChatOutcome, ChatSession, CmarkRenderer, ConversationView, Msg,
    ViewElement,
};
use chrono::NaiveTime;

fn at() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 30, 0).unwrap()
}

fn assert_indicator_last(view: &ConversationView) {
    assert!(matches!(
        view.elements().last(),
        Some(ViewElement::TypingIndicator { .. })
    ));
    let indicators = view
        .elements()
        .iter()
        .filter(|element| matches!(element, ViewElement::TypingIndicator { .. }))
        .count();
    assert_eq!(indicators, 1);
    assert!(view.is_scrolled_to_end());
}

#[test]
fn new_view_holds_only_hidden_indicator() {
    let view = ConversationView::new();
    assert_eq!(
        view.elements(),
        &[ViewElement::TypingIndicator { visible: false }]
    );
    assert!(view.is_scrolled_to_end());
    assert!(!view.typing_visible());
}

#[test]
fn sync_follows_send_and_reply() {
    let mut view = ConversationView::new();

    let (state, _) = update(ChatSession::new(), Msg::InputChanged("hi".into()));
    let (state, _) = update(state, Msg::SendRequested { at: at() });
    let report = view.sync(&state.view(), &CmarkRenderer);
    assert_eq!(report.inserted, vec![1]);
    assert!(report.typing_changed);
    assert!(view.typing_visible());
    assert_indicator_last(&view);

    let (state, _) = update(
        state,
        Msg::ReplyReceived {
            request_id: 1,
            outcome: ChatOutcome::Answer(ChatAnswer {
                answer: "hello [1]".into(),
                ..ChatAnswer::default()
            }),
            at: at(),
        },
    );
    let report = view.sync(&state.view(), &CmarkRenderer);
    assert_eq!(report.inserted, vec![2]);
    assert!(report.typing_changed);
    assert!(!view.typing_visible());
    assert_indicator_last(&view);

    let ids: Vec<_> = view.messages().map(|m| m.id).collect();
    assert_eq!(ids, vec![1, 2]);

    // Nothing changed, nothing to do.
    assert!(view.sync(&state.view(), &CmarkRenderer).is_empty());
}

#[test]
fn revised_message_is_replaced_in_place() {
    let mut view = ConversationView::new();
    let (state, _) = update(ChatSession::new(), Msg::InputChanged("help".into()));
    let (state, _) = update(state, Msg::SendRequested { at: at() });
    let (state, _) = update(
        state,
        Msg::ReplyReceived {
            request_id: 1,
            outcome: ChatOutcome::Answer(ChatAnswer {
                answer: "escalating".into(),
                sources: Vec::new(),
                escalation: true,
            }),
            at: at(),
        },
    );
    view.sync(&state.view(), &CmarkRenderer);

    let (state, _) = update(state, Msg::ConnectAgentClicked { message_id: 2 });
    let report = view.sync(&state.view(), &CmarkRenderer);

    assert!(report.inserted.is_empty());
    assert_eq!(report.replaced, vec![2]);
    let second = view.messages().nth(1).unwrap();
    assert!(second.html.contains("Connecting..."));
    assert_eq!(view.messages().count(), 2);
    assert_indicator_last(&view);
}

#[test]
fn toggling_does_not_touch_rendered_messages() {
    let mut view = ConversationView::new();
    let (state, _) = update(ChatSession::new(), Msg::ToggleClicked);
    let (state, _) = update(state, Msg::InputChanged("hi".into()));
    let (state, _) = update(state, Msg::SendRequested { at: at() });
    view.sync(&state.view(), &CmarkRenderer);
    let before: Vec<_> = view.messages().cloned().collect();

    let (state, _) = update(state, Msg::ToggleClicked);
    view.sync(&state.view(), &CmarkRenderer);
    let (state, _) = update(state, Msg::ToggleClicked);
    let report = view.sync(&state.view(), &CmarkRenderer);

    assert!(state.is_open());
    assert!(report.inserted.is_empty() && report.replaced.is_empty());
    let after: Vec<_> = view.messages().cloned().collect();
    assert_eq!(before, after);
}

#[test]
fn html_places_indicator_after_messages() {
    let mut view = ConversationView::new();
    let (state, _) = update(ChatSession::new(), Msg::InputChanged("hi".into()));
    let (state, _) = update(state, Msg::SendRequested { at: at() });
    view.sync(&state.view(), &CmarkRenderer);

    let html = view.to_html();
    let message = html.find(r#"data-message-id="1""#).unwrap();
    let indicator = html.find(r#"id="typing-indicator""#).unwrap();
    assert!(message < indicator);
    assert!(html.contains("display: flex;"));
}
