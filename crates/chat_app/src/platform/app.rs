use std::io::{self, BufRead};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use chat_core::{update, ChatSession, CmarkRenderer, ConversationView, Msg};
use chat_engine::{BackendStatus, ClientError, SnapshotWriter};
use chrono::Local;
use engine_logging::{engine_info, engine_warn};

use super::config::{self, QuickAction, WidgetConfig, CONFIG_FILENAME};
use super::effects::EffectRunner;
use super::input::{parse_line, Command};
use super::logging;
use super::ui;

/// Everything the host loop reacts to.
pub enum AppEvent {
    Core(Msg),
    Command(Command),
    Status(Result<BackendStatus, ClientError>),
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

    // The log destination lives in the config, so report config problems after init.
    let loaded = config::load_config(&config_path);
    let config = loaded.as_ref().ok().cloned().unwrap_or_default();
    logging::initialize(config.log_destination);
    match loaded {
        Ok(_) => engine_info!("Widget config resolved from {:?}", config_path),
        Err(err) => engine_warn!("{}; using defaults", err),
    }

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let effects = EffectRunner::new(config.backend_settings(), event_tx.clone())?;
    spawn_stdin_reader(event_tx);

    let mut host = WidgetHost::new(&config, effects);
    host.start();
    while let Ok(event) = event_rx.recv() {
        if host.handle(event).is_break() {
            break;
        }
    }
    engine_info!("Widget host stopped");
    Ok(())
}

fn spawn_stdin_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if let Some(command) = parse_line(&line) {
                if event_tx.send(AppEvent::Command(command)).is_err() {
                    return;
                }
            }
        }
        let _ = event_tx.send(AppEvent::InputClosed);
    });
}

/// Owns the mounted widget: session state, its rendered view and the effect runner.
struct WidgetHost {
    session: ChatSession,
    conversation: ConversationView,
    renderer: CmarkRenderer,
    quick_actions: Vec<QuickAction>,
    snapshot: Option<SnapshotWriter>,
    effects: EffectRunner,
    shown_open: bool,
}

impl WidgetHost {
    fn new(config: &WidgetConfig, effects: EffectRunner) -> Self {
        Self {
            session: ChatSession::with_timings(config.timings()),
            conversation: ConversationView::new(),
            renderer: CmarkRenderer,
            quick_actions: config.quick_actions.clone(),
            snapshot: config.page_snapshot.clone().map(SnapshotWriter::new),
            effects,
            shown_open: false,
        }
    }

    fn start(&mut self) {
        for line in ui::render::help(&self.quick_actions) {
            println!("{line}");
        }
        self.effects.check_status();
        self.render();
    }

    fn handle(&mut self, event: AppEvent) -> ControlFlow<()> {
        match event {
            AppEvent::Core(msg) => self.dispatch(msg),
            AppEvent::Command(command) => return self.run_command(command),
            AppEvent::Status(Ok(status)) => {
                engine_info!("Backend status {} ({} documents)", status.status, status.doc_count);
                println!("Backend: {} ({} documents indexed)", status.status, status.doc_count);
            }
            AppEvent::Status(Err(err)) => {
                engine_warn!("Backend status check failed: {}", err);
                println!("Backend unreachable: {err}");
            }
            AppEvent::InputClosed => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn run_command(&mut self, command: Command) -> ControlFlow<()> {
        let now = Local::now().time();
        match command {
            Command::Toggle => self.dispatch(Msg::ToggleClicked),
            Command::SetOpen(open) => self.dispatch(Msg::SetOpen(open)),
            Command::QuickAction(index) => match self.quick_actions.get(index - 1) {
                Some(action) if self.ready_for_input() => {
                    let query = action.query.clone();
                    self.dispatch(Msg::QuickActionClicked { query, at: now });
                }
                Some(_) => {}
                None => println!("There is no quick action {index}."),
            },
            Command::Connect => {
                let target = self
                    .session
                    .view()
                    .latest_actionable_escalation()
                    .map(|message| message.id);
                match target {
                    Some(message_id) => self.dispatch(Msg::ConnectAgentClicked { message_id }),
                    None => println!("No escalation prompt is waiting."),
                }
            }
            Command::Status => self.effects.check_status(),
            Command::Help => {
                for line in ui::render::help(&self.quick_actions) {
                    println!("{line}");
                }
            }
            Command::Quit => return ControlFlow::Break(()),
            Command::Send(text) => {
                if self.ready_for_input() {
                    self.dispatch(Msg::InputChanged(text));
                    self.dispatch(Msg::SendRequested { at: now });
                }
            }
            Command::Invalid(reason) => println!("{reason}"),
        }
        ControlFlow::Continue(())
    }

    /// Input is hidden while minimized and disabled while a reply is pending.
    fn ready_for_input(&self) -> bool {
        if !self.session.is_open() {
            println!("The chat is minimized; type /open first.");
            return false;
        }
        if self.session.pending_request().is_some() {
            println!("Still waiting for the previous answer.");
            return false;
        }
        true
    }

    fn dispatch(&mut self, msg: Msg) {
        let session = std::mem::take(&mut self.session);
        let (mut session, effects) = update(session, msg);
        let dirty = session.consume_dirty();
        self.session = session;
        self.effects.enqueue(effects);
        if dirty {
            self.render();
        }
    }

    fn render(&mut self) {
        let view = self.session.view();
        if view.is_open != self.shown_open {
            println!("{}", ui::render::visibility_line(&view));
            self.shown_open = view.is_open;
        }

        let report = self.conversation.sync(&view, &self.renderer);
        for message in &view.messages {
            if report.inserted.contains(&message.id) {
                for line in ui::render::transcript(message) {
                    println!("{line}");
                }
            } else if report.replaced.contains(&message.id) {
                if let Some(prompt) = &message.escalation {
                    println!("{}", ui::render::escalation_line(prompt));
                }
            }
        }
        if report.typing_changed && view.typing_visible {
            println!("Bot is typing...");
        }

        if let Some(writer) = &self.snapshot {
            let page = ui::layout::page(&view, &self.conversation, &self.quick_actions);
            if let Err(err) = writer.write(&page) {
                engine_warn!("Failed to write page snapshot {:?}: {}", writer.target(), err);
            }
        }
    }
}
