//! Main application orchestrator.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyEvent};
use futures_util::StreamExt;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, error, info, warn};
use zeroize::Zeroizing;

use crate::application::{
    AppController, ChatTurnUseCase, ControllerError, DangerAction, NavigationShell, ProfileEditor,
    TurnOutcome,
};
use crate::domain::entities::{AppView, Message};
use crate::domain::errors::EngineError;
use crate::domain::keybinding::{Action, Keybind};
use crate::domain::ports::ChatEnginePort;
use crate::infrastructure::config::{AppConfig, UiConfig};
use crate::presentation::commands::{CommandRegistry, HasCommands};
use crate::presentation::events::{EventHandler, EventResult};
use crate::presentation::theme::Theme;
use crate::presentation::ui::{
    ChatKeyResult, ChatScreen, ChatScreenState, CredentialAction, CredentialScreen,
    ProfileKeyResult, ProfileScreen, ProfileScreenState, VoiceScreen,
};
use crate::presentation::widgets::{
    ConfirmDialog, FooterBar, HelpPopup, SIDEBAR_WIDTH, Sidebar, StatusBar,
};

const TICK_RATE: Duration = Duration::from_millis(250);
const STATUS_TTL: Duration = Duration::from_secs(6);

const GLOBAL_ACTIONS: [Action; 8] = [
    Action::Quit,
    Action::ToggleHelp,
    Action::ToggleDrawer,
    Action::NextView,
    Action::PreviousView,
    Action::GoToChat,
    Action::GoToVoice,
    Action::GoToProfile,
];
const DRAWER_ACTIONS: [Action; 4] = [
    Action::NavigateUp,
    Action::NavigateDown,
    Action::Select,
    Action::Cancel,
];
const FOOTER_GLOBALS: [Action; 3] = [Action::ToggleDrawer, Action::NextView, Action::ToggleHelp];

#[derive(Debug)]
enum AppEvent {
    ReplyReady {
        generation: u64,
        result: Result<Message, EngineError>,
    },
}

/// Owns the session and drives the terminal.
pub struct App {
    controller: AppController,
    navigation: NavigationShell,
    editor: ProfileEditor,
    chat_turn: Arc<ChatTurnUseCase>,
    registry: CommandRegistry,
    theme: Theme,
    ui_config: UiConfig,
    model: String,
    credential_screen: CredentialScreen,
    chat_state: ChatScreenState,
    profile_state: ProfileScreenState,
    drawer_cursor: AppView,
    show_help: bool,
    awaiting_reply: bool,
    /// Bumped whenever history is discarded, so late replies are dropped.
    generation: u64,
    status: Option<(StatusBar, Instant)>,
    should_quit: bool,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    /// Creates the app around an initialized controller.
    #[must_use]
    pub fn new(
        controller: AppController,
        engine: Arc<dyn ChatEnginePort>,
        config: &AppConfig,
    ) -> Self {
        let theme = Theme::from_config(&config.theme);
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            controller,
            navigation: NavigationShell::new(),
            editor: ProfileEditor::new(),
            chat_turn: Arc::new(ChatTurnUseCase::new(engine)),
            registry: CommandRegistry::new(),
            theme,
            ui_config: config.ui.clone(),
            model: config.engine.model.clone(),
            credential_screen: CredentialScreen::new(theme),
            chat_state: ChatScreenState::new(&theme),
            profile_state: ProfileScreenState::new(&theme),
            drawer_cursor: AppView::default(),
            show_help: false,
            awaiting_reply: false,
            generation: 0,
            status: None,
            should_quit: false,
            event_tx,
            event_rx,
        }
    }

    /// Runs until the user quits. A key from the command line unlocks a locked session.
    ///
    /// # Errors
    /// Returns error if the terminal fails.
    pub async fn run(
        mut self,
        terminal: &mut DefaultTerminal,
        cli_key: Option<Zeroizing<String>>,
    ) -> color_eyre::Result<()> {
        if !self.controller.is_unlocked()
            && let Some(key) = cli_key
        {
            info!("Using API key from command line");
            self.submit_credential(key);
        }

        self.run_event_loop(terminal).await?;

        info!("Application exiting normally");
        Ok(())
    }

    async fn run_event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mut terminal_events = EventStream::new();
        let mut tick = interval(TICK_RATE);

        terminal.draw(|frame| self.render(frame))?;

        while !self.should_quit {
            tokio::select! {
                Some(event) = self.event_rx.recv() => {
                    self.handle_app_event(event);
                }

                Some(Ok(event)) = terminal_events.next() => {
                    if self.handle_terminal_event(event) == EventResult::Exit {
                        self.should_quit = true;
                    }
                }

                _ = tick.tick() => {
                    self.expire_status();
                }
            }

            terminal.draw(|frame| self.render(frame))?;
        }

        Ok(())
    }

    fn handle_terminal_event(&mut self, event: Event) -> EventResult {
        match event {
            Event::Key(key) => self.handle_key(key),
            _ => EventResult::Continue,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> EventResult {
        if !EventHandler::is_actionable(&key) {
            return EventResult::Continue;
        }
        if EventHandler::is_quit_event(&key) {
            return EventResult::Exit;
        }

        if NavigationShell::visible_view(&self.controller).is_none() {
            return match self.credential_screen.handle_key(key) {
                CredentialAction::Submit(token) => {
                    self.submit_credential(Zeroizing::new(token));
                    EventResult::Continue
                }
                CredentialAction::Quit => EventResult::Exit,
                CredentialAction::None => EventResult::Continue,
            };
        }

        if self.editor.pending().is_some() {
            match self
                .registry
                .find_action_in(key, &[Action::Confirm, Action::Cancel])
            {
                Some(Action::Confirm) => self.confirm_pending(),
                Some(Action::Cancel) => self.editor.cancel(),
                _ => {}
            }
            return EventResult::Continue;
        }

        if self.show_help {
            if self
                .registry
                .find_action_in(key, &[Action::ToggleHelp, Action::Cancel])
                .is_some()
            {
                self.show_help = false;
            }
            return EventResult::Continue;
        }

        if let Some(action) = self.registry.find_action_in(key, &GLOBAL_ACTIONS) {
            return self.handle_global_action(action);
        }

        if self.navigation.is_drawer_open() {
            self.handle_drawer_key(key);
            return EventResult::Continue;
        }

        match self.controller.active_view() {
            AppView::Chat => {
                let result = self
                    .chat_state
                    .handle_key(key, &self.registry, self.awaiting_reply);
                if let ChatKeyResult::Send(text) = result {
                    self.send_message(text);
                }
            }
            AppView::Profile => {
                let result =
                    self.profile_state
                        .handle_key(key, &self.registry, self.controller.profile());
                self.apply_profile_result(result);
            }
            AppView::Voice => {}
        }

        EventResult::Continue
    }

    fn handle_global_action(&mut self, action: Action) -> EventResult {
        let result = match action {
            Action::Quit => return EventResult::Exit,
            Action::ToggleHelp => {
                self.show_help = true;
                Ok(())
            }
            Action::ToggleDrawer => {
                self.navigation.toggle_drawer();
                self.drawer_cursor = self.controller.active_view();
                Ok(())
            }
            Action::NextView => self.navigation.select_next(&mut self.controller),
            Action::PreviousView => self.navigation.select_previous(&mut self.controller),
            Action::GoToChat => self.navigation.select(&mut self.controller, AppView::Chat),
            Action::GoToVoice => self.navigation.select(&mut self.controller, AppView::Voice),
            Action::GoToProfile => self
                .navigation
                .select(&mut self.controller, AppView::Profile),
            _ => Ok(()),
        };
        self.report(result, None);
        EventResult::Continue
    }

    fn handle_drawer_key(&mut self, key: KeyEvent) {
        match self.registry.find_action_in(key, &DRAWER_ACTIONS) {
            Some(Action::NavigateUp) => self.drawer_cursor = self.drawer_cursor.previous(),
            Some(Action::NavigateDown) => self.drawer_cursor = self.drawer_cursor.next(),
            Some(Action::Select) => {
                let result = self.navigation.select(&mut self.controller, self.drawer_cursor);
                self.report(result, None);
            }
            Some(Action::Cancel) => self.navigation.close_drawer(),
            _ => {}
        }
    }

    fn apply_profile_result(&mut self, result: ProfileKeyResult) {
        let outcome = match result {
            ProfileKeyResult::Ignored | ProfileKeyResult::Consumed => return,
            ProfileKeyResult::Rename(name) => self.editor.rename_user(&mut self.controller, name),
            ProfileKeyResult::SetPersonality(text) => {
                self.editor.set_personality(&mut self.controller, text)
            }
            ProfileKeyResult::SetAvatar(url) => self.editor.set_avatar(&mut self.controller, url),
            ProfileKeyResult::ToggleInterest(tag) => {
                self.editor.toggle_interest(&mut self.controller, tag)
            }
            ProfileKeyResult::RequestClearHistory => {
                self.editor.request_clear_history();
                return;
            }
            ProfileKeyResult::RequestFullReset => {
                self.editor.request_full_reset();
                return;
            }
        };
        self.report(outcome, Some("Profile saved"));
    }

    fn submit_credential(&mut self, token: Zeroizing<String>) {
        match self.controller.submit_credential(&token) {
            Ok(()) => {
                self.credential_screen.reset();
                self.set_status(StatusBar::success("API key saved. Say hi to Luci!"));
            }
            Err(ControllerError::InvalidCredential) => {
                self.credential_screen.set_error("API key must not be empty");
            }
            Err(e) => {
                self.credential_screen.reset();
                warn!(error = %e, "Credential adopted but not persisted");
                self.set_status(StatusBar::warning(format!(
                    "API key works for this session only: {e}"
                )));
            }
        }
    }

    fn send_message(&mut self, text: String) {
        if self.awaiting_reply {
            return;
        }

        if let Err(e) = self.controller.append_message(Message::user(text)) {
            self.report(Err(e), None);
        }

        let request = match ChatTurnUseCase::prepare(&self.controller) {
            Ok(request) => request,
            Err(e) => {
                error!(error = %e, "Cannot start chat turn");
                self.set_status(StatusBar::error(e.to_string()));
                return;
            }
        };

        self.awaiting_reply = true;
        let generation = self.generation;
        let use_case = Arc::clone(&self.chat_turn);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let result = use_case.execute(request).await;
            let _ = tx.send(AppEvent::ReplyReady { generation, result });
        });
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ReplyReady { generation, result } => {
                if generation != self.generation {
                    debug!(generation, current = self.generation, "Dropping stale reply");
                    return;
                }
                self.awaiting_reply = false;

                match ChatTurnUseCase::apply(&mut self.controller, result) {
                    Ok(TurnOutcome::Replied) => self.chat_state.scroll_to_bottom(),
                    Ok(TurnOutcome::Locked) => {
                        self.lock("Your API key was rejected. Please enter a new one.");
                    }
                    Ok(TurnOutcome::Failed(e)) => {
                        self.set_status(StatusBar::error(format!("Luci couldn't reply: {e}")));
                    }
                    Err(e) => {
                        if !self.controller.is_unlocked() {
                            self.lock("Your API key was rejected. Please enter a new one.");
                        }
                        self.report(Err(e), None);
                    }
                }
            }
        }
    }

    fn confirm_pending(&mut self) {
        let Some(action) = self.editor.pending() else {
            return;
        };
        let result = self.editor.confirm(&mut self.controller);

        self.generation += 1;
        self.awaiting_reply = false;
        self.chat_state.scroll_to_bottom();

        match action {
            DangerAction::ClearHistory => {
                self.report(result.map(|_| ()), Some("Chat history cleared"));
            }
            DangerAction::FullReset => {
                self.chat_state = ChatScreenState::new(&self.theme);
                self.profile_state = ProfileScreenState::new(&self.theme);
                self.navigation.close_drawer();
                self.credential_screen.reset();
                self.report(result.map(|_| ()), Some("All data erased"));
            }
        }
    }

    fn lock(&mut self, reason: &str) {
        self.generation += 1;
        self.awaiting_reply = false;
        self.navigation.close_drawer();
        self.editor.cancel();
        self.credential_screen.reset();
        self.credential_screen.set_error(reason);
    }

    fn report(&mut self, result: Result<(), ControllerError>, success: Option<&str>) {
        match result {
            Ok(()) => {
                if let Some(message) = success {
                    self.set_status(StatusBar::success(message));
                }
            }
            Err(e) => {
                warn!(error = %e, "Change could not be saved");
                self.set_status(StatusBar::error(format!("Not saved: {e}")));
            }
        }
    }

    fn set_status(&mut self, status: StatusBar) {
        self.status = Some((status, Instant::now()));
    }

    fn expire_status(&mut self) {
        if self
            .status
            .as_ref()
            .is_some_and(|(_, at)| at.elapsed() >= STATUS_TTL)
        {
            self.status = None;
        }
    }

    fn context_commands(&self) -> (&'static str, Vec<Keybind>) {
        if NavigationShell::visible_view(&self.controller).is_none() {
            return ("LOCKED", self.registry.keybinds(&[Action::Quit]));
        }
        if self.editor.pending().is_some() {
            return (
                "CONFIRM",
                self.registry.keybinds(&[Action::Confirm, Action::Cancel]),
            );
        }
        if self.navigation.is_drawer_open() {
            return ("MENU", self.registry.keybinds(&DRAWER_ACTIONS));
        }

        let mut binds = match self.controller.active_view() {
            AppView::Chat => self.chat_state.get_commands(&self.registry),
            AppView::Profile => self.profile_state.get_commands(&self.registry),
            AppView::Voice => Vec::new(),
        };
        binds.extend(self.registry.keybinds(&FOOTER_GLOBALS));

        let mode = match self.controller.active_view() {
            AppView::Chat => "CHAT",
            AppView::Voice => "VOICE",
            AppView::Profile if self.profile_state.is_editing() => "EDIT",
            AppView::Profile => "PROFILE",
        };
        (mode, binds)
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [main, status_area, footer_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        match NavigationShell::visible_view(&self.controller) {
            None => frame.render_widget(&self.credential_screen, main),
            Some(view) => self.render_session(frame, main, view),
        }

        let status = self.status.as_ref().map_or_else(
            || StatusBar::new().left(" Luci"),
            |(bar, _)| bar.clone().left(format!(" {}", bar.message())),
        );
        let status = status.right(format!("{} ", self.model));
        frame.render_widget(&status, status_area);

        let (mode, binds) = self.context_commands();
        frame.render_widget(FooterBar::new(&binds, &self.theme).mode(mode), footer_area);

        if let Some(action) = self.editor.pending() {
            frame.render_widget(ConfirmDialog::new(action, &self.theme), main);
        }
        if self.show_help {
            let all = self.registry.keybinds(&[
                Action::Quit,
                Action::ToggleHelp,
                Action::ToggleDrawer,
                Action::NextView,
                Action::PreviousView,
                Action::GoToChat,
                Action::GoToVoice,
                Action::GoToProfile,
                Action::SendMessage,
                Action::ScrollUp,
                Action::ScrollDown,
                Action::EditName,
                Action::ClearHistory,
                Action::ResetAll,
            ]);
            frame.render_widget(HelpPopup::new(&all, &self.theme), main);
        }
    }

    fn render_session(&mut self, frame: &mut Frame, area: Rect, view: AppView) {
        let docked = area.width >= self.ui_config.sidebar_breakpoint;
        let drawer_open = self.navigation.is_drawer_open();
        let highlight = drawer_open.then_some(self.drawer_cursor);

        let content = if docked {
            let [sidebar_area, content] =
                Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Fill(1)])
                    .areas(area);
            frame.render_widget(
                Sidebar::new(view, self.controller.profile(), &self.theme).highlight(highlight),
                sidebar_area,
            );
            content
        } else {
            area
        };

        let timestamp_format = self
            .ui_config
            .show_timestamps
            .then_some(self.ui_config.timestamp_format.as_str());

        match view {
            AppView::Chat => frame.render_stateful_widget(
                ChatScreen::new(self.controller.messages(), self.controller.profile(), &self.theme)
                    .awaiting_reply(self.awaiting_reply)
                    .timestamps(timestamp_format),
                content,
                &mut self.chat_state,
            ),
            AppView::Voice => frame.render_widget(
                VoiceScreen::new(self.controller.profile(), &self.theme),
                content,
            ),
            AppView::Profile => frame.render_stateful_widget(
                ProfileScreen::new(
                    self.controller.profile(),
                    &self.theme,
                    self.controller.messages().len(),
                ),
                content,
                &mut self.profile_state,
            ),
        }

        if !docked && drawer_open {
            let drawer_area = Rect::new(area.x, area.y, SIDEBAR_WIDTH.min(area.width), area.height);
            frame.render_widget(
                Sidebar::new(view, self.controller.profile(), &self.theme)
                    .highlight(highlight)
                    .overlay(),
                drawer_area,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::PersistentStore;
    use crate::domain::errors::AuthError;
    use crate::domain::ports::mocks::MockChatEngine;
    use crate::domain::ports::{RecordKey, StorePort};
    use crate::infrastructure::store::MemoryStore;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{Terminal, backend::TestBackend};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn alt(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::ALT)
    }

    fn app_with(engine: MockChatEngine, unlocked: bool) -> (Arc<MemoryStore>, App) {
        let backend = Arc::new(MemoryStore::new());
        let mut controller = AppController::initialize(PersistentStore::new(backend.clone()));
        if unlocked {
            controller.submit_credential("tok123").unwrap();
        }
        let app = App::new(controller, Arc::new(engine), &AppConfig::default());
        (backend, app)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    async fn next_event(app: &mut App) {
        let event = app.event_rx.recv().await.unwrap();
        app.handle_app_event(event);
    }

    #[test]
    fn test_credential_entry_unlocks() {
        let (backend, mut app) = app_with(MockChatEngine::replying("hi"), false);

        type_text(&mut app, "tok123");
        app.handle_key(key(KeyCode::Enter));

        assert!(app.controller.is_unlocked());
        assert_eq!(
            backend.read(RecordKey::Credential).unwrap().as_deref(),
            Some("tok123")
        );
        assert_eq!(
            NavigationShell::visible_view(&app.controller),
            Some(AppView::Chat)
        );
    }

    #[test]
    fn test_global_keys_switch_views() {
        let (_, mut app) = app_with(MockChatEngine::replying("hi"), true);

        app.handle_key(alt('3'));
        assert_eq!(app.controller.active_view(), AppView::Profile);

        app.handle_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL));
        assert_eq!(app.controller.active_view(), AppView::Chat);
    }

    #[test]
    fn test_drawer_selection_closes_drawer() {
        let (_, mut app) = app_with(MockChatEngine::replying("hi"), true);

        app.handle_key(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL));
        assert!(app.navigation.is_drawer_open());

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.controller.active_view(), AppView::Voice);
        assert!(!app.navigation.is_drawer_open());
    }

    #[test]
    fn test_clear_history_requires_confirmation() {
        let (backend, mut app) = app_with(MockChatEngine::replying("hi"), true);
        app.controller.append_message(Message::user("hello")).unwrap();
        app.handle_key(alt('3'));

        app.handle_key(key(KeyCode::Char('x')));
        assert_eq!(app.editor.pending(), Some(DangerAction::ClearHistory));
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.controller.messages().len(), 1);

        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(key(KeyCode::Char('y')));
        assert!(app.controller.messages().is_empty());
        let stored = backend.read(RecordKey::Messages).unwrap().unwrap_or_default();
        assert!(!stored.contains("hello"));
    }

    #[test]
    fn test_full_reset_returns_to_credential_entry() {
        let (backend, mut app) = app_with(MockChatEngine::replying("hi"), true);
        app.handle_key(alt('3'));

        app.handle_key(KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT));
        app.handle_key(key(KeyCode::Enter));

        assert!(NavigationShell::visible_view(&app.controller).is_none());
        for record in RecordKey::ALL {
            assert!(!backend.contains(record).unwrap());
        }
    }

    #[tokio::test]
    async fn test_send_message_appends_reply() {
        let (_, mut app) = app_with(MockChatEngine::replying("Hey you!"), true);

        type_text(&mut app, "hi");
        app.handle_key(key(KeyCode::Enter));
        assert!(app.awaiting_reply);

        next_event(&mut app).await;

        assert!(!app.awaiting_reply);
        let messages = app.controller.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content(), "Hey you!");
    }

    #[tokio::test]
    async fn test_rejected_key_locks_session() {
        let engine = MockChatEngine::failing(AuthError::rejected("API key not valid").into());
        let (backend, mut app) = app_with(engine, true);

        type_text(&mut app, "hi");
        app.handle_key(key(KeyCode::Enter));
        next_event(&mut app).await;

        assert!(!app.controller.is_unlocked());
        assert!(backend.read(RecordKey::Credential).unwrap().is_none());
        assert!(app.credential_screen.error_message().is_some());
    }

    #[tokio::test]
    async fn test_reply_after_clear_is_dropped() {
        let (_, mut app) = app_with(MockChatEngine::replying("late"), true);

        type_text(&mut app, "hi");
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(alt('3'));
        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(key(KeyCode::Char('y')));

        next_event(&mut app).await;

        assert!(app.controller.messages().is_empty());
    }

    #[test]
    fn test_renders_locked_and_narrow_layouts() {
        let (_, mut app) = app_with(MockChatEngine::replying("hi"), false);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        app.submit_credential(Zeroizing::new("tok123".to_string()));
        app.handle_key(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL));
        let mut narrow = Terminal::new(TestBackend::new(50, 20)).unwrap();
        narrow.draw(|frame| app.render(frame)).unwrap();

        let text: String = narrow
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Voice Call"));
    }
}
