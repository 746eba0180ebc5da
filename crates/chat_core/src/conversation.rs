use crate::{render_message, ChatViewModel, MarkdownRenderer, MessageId, RenderedMessage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewElement {
    Message(RenderedMessage),
    TypingIndicator { visible: bool },
}

/// What a [`ConversationView::sync`] pass changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncReport {
    pub inserted: Vec<MessageId>,
    pub replaced: Vec<MessageId>,
    pub typing_changed: bool,
}

impl SyncReport {
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.replaced.is_empty() && !self.typing_changed
    }
}

/// The message list as displayed.
///
/// The typing indicator is always the last element; messages are inserted
/// immediately before it and the view scrolls to its end after every change,
/// so the indicator and the newest message stay visible together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationView {
    elements: Vec<ViewElement>,
    scroll_top: usize,
}

impl Default for ConversationView {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationView {
    pub fn new() -> Self {
        let mut view = Self {
            elements: vec![ViewElement::TypingIndicator { visible: false }],
            scroll_top: 0,
        };
        view.scroll_to_end();
        view
    }

    pub fn elements(&self) -> &[ViewElement] {
        &self.elements
    }

    pub fn messages(&self) -> impl Iterator<Item = &RenderedMessage> {
        self.elements.iter().filter_map(|element| match element {
            ViewElement::Message(rendered) => Some(rendered),
            ViewElement::TypingIndicator { .. } => None,
        })
    }

    pub fn typing_visible(&self) -> bool {
        matches!(
            self.elements.last(),
            Some(ViewElement::TypingIndicator { visible: true })
        )
    }

    pub fn is_scrolled_to_end(&self) -> bool {
        self.scroll_top == self.elements.len()
    }

    pub fn insert_before_indicator(&mut self, rendered: RenderedMessage) {
        let at = self.indicator_index();
        self.elements.insert(at, ViewElement::Message(rendered));
        self.scroll_to_end();
    }

    /// Swaps in a fresh rendering of an existing message. Returns false when absent.
    pub fn replace(&mut self, rendered: RenderedMessage) -> bool {
        let slot = self.elements.iter_mut().find(|element| {
            matches!(element, ViewElement::Message(existing) if existing.id == rendered.id)
        });
        match slot {
            Some(slot) => {
                *slot = ViewElement::Message(rendered);
                true
            }
            None => false,
        }
    }

    pub fn set_typing_visible(&mut self, visible: bool) -> bool {
        let at = self.indicator_index();
        let changed = self.elements[at] != ViewElement::TypingIndicator { visible };
        self.elements[at] = ViewElement::TypingIndicator { visible };
        self.scroll_to_end();
        changed
    }

    /// Brings the view in line with `view`, rendering only new or revised messages.
    pub fn sync(&mut self, view: &ChatViewModel, renderer: &dyn MarkdownRenderer) -> SyncReport {
        let mut report = SyncReport::default();

        // A resolved request hides the indicator before its reply is inserted;
        // a new request shows it only after the user message is in place.
        if !view.typing_visible {
            report.typing_changed |= self.set_typing_visible(false);
        }

        for message in &view.messages {
            let known_revision = self
                .messages()
                .find(|rendered| rendered.id == message.id)
                .map(|rendered| rendered.revision);
            match known_revision {
                None => {
                    self.insert_before_indicator(render_message(message, renderer));
                    report.inserted.push(message.id);
                }
                Some(revision) if revision != message.revision => {
                    self.replace(render_message(message, renderer));
                    report.replaced.push(message.id);
                }
                Some(_) => {}
            }
        }

        if view.typing_visible {
            report.typing_changed |= self.set_typing_visible(true);
        }
        report
    }

    /// Markup for the scrollable chat area.
    pub fn to_html(&self) -> String {
        let mut out = String::from(r#"<div id="chat-area" class="chat-area">"#);
        for element in &self.elements {
            match element {
                ViewElement::Message(rendered) => out.push_str(&rendered.html),
                ViewElement::TypingIndicator { visible } => {
                    let display = if *visible { "flex" } else { "none" };
                    out.push_str(&format!(
                        r#"<div id="typing-indicator" class="typing-indicator" style="display: {display};"><span></span><span></span><span></span></div>"#
                    ));
                }
            }
        }
        out.push_str("</div>");
        out
    }

    fn indicator_index(&self) -> usize {
        self.elements.len() - 1
    }

    fn scroll_to_end(&mut self) {
        self.scroll_top = self.elements.len();
    }
}
