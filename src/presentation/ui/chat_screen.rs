//! Chat view.

use crossterm::event::KeyEvent;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, StatefulWidget, Widget},
};

use crate::domain::entities::{Message, UserProfile};
use crate::domain::keybinding::{Action, Keybind};
use crate::presentation::commands::{CommandRegistry, HasCommands};
use crate::presentation::theme::Theme;
use crate::presentation::widgets::{MessageList, TextInput};

const SCROLL_STEP: usize = 5;
const CHAT_ACTIONS: [Action; 4] = [
    Action::SendMessage,
    Action::ScrollUp,
    Action::ScrollDown,
    Action::ClearInput,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatKeyResult {
    Ignored,
    Consumed,
    Send(String),
}

/// Input and scroll position of the chat view.
pub struct ChatScreenState {
    input: TextInput,
    scroll: usize,
}

impl ChatScreenState {
    #[must_use]
    pub fn new(theme: &Theme) -> Self {
        let mut input = TextInput::new(" Message ")
            .placeholder("Type a message to Luci...")
            .accent(theme.accent);
        input.set_focused(true);

        Self { input, scroll: 0 }
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        self.input.value()
    }

    #[must_use]
    pub const fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = 0;
    }

    /// Handles a key. Sending is refused while a reply is pending; the draft is kept.
    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        registry: &CommandRegistry,
        awaiting_reply: bool,
    ) -> ChatKeyResult {
        match registry.find_action_in(key, &CHAT_ACTIONS) {
            Some(Action::SendMessage) => {
                if awaiting_reply || self.input.value().trim().is_empty() {
                    return ChatKeyResult::Consumed;
                }
                self.scroll = 0;
                ChatKeyResult::Send(self.input.take().trim().to_string())
            }
            Some(Action::ScrollUp) => {
                self.scroll = self.scroll.saturating_add(SCROLL_STEP);
                ChatKeyResult::Consumed
            }
            Some(Action::ScrollDown) => {
                self.scroll = self.scroll.saturating_sub(SCROLL_STEP);
                ChatKeyResult::Consumed
            }
            Some(Action::ClearInput) => {
                self.input.clear();
                ChatKeyResult::Consumed
            }
            _ => {
                if self.input.handle_edit_key(key) {
                    ChatKeyResult::Consumed
                } else {
                    ChatKeyResult::Ignored
                }
            }
        }
    }
}

impl HasCommands for ChatScreenState {
    fn get_commands(&self, registry: &CommandRegistry) -> Vec<Keybind> {
        registry.keybinds(&CHAT_ACTIONS)
    }
}

/// Chat view widget.
pub struct ChatScreen<'a> {
    messages: &'a [Message],
    profile: &'a UserProfile,
    theme: &'a Theme,
    awaiting_reply: bool,
    timestamp_format: Option<&'a str>,
}

impl<'a> ChatScreen<'a> {
    #[must_use]
    pub const fn new(messages: &'a [Message], profile: &'a UserProfile, theme: &'a Theme) -> Self {
        Self {
            messages,
            profile,
            theme,
            awaiting_reply: false,
            timestamp_format: None,
        }
    }

    #[must_use]
    pub const fn awaiting_reply(mut self, awaiting: bool) -> Self {
        self.awaiting_reply = awaiting;
        self
    }

    #[must_use]
    pub const fn timestamps(mut self, format: Option<&'a str>) -> Self {
        self.timestamp_format = format;
        self
    }
}

impl StatefulWidget for ChatScreen<'_> {
    type State = ChatScreenState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [header, _, transcript, input] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(area);

        Paragraph::new(Line::from(vec![
            Span::styled(" Luci", self.theme.title_style),
            Span::styled(
                format!(
                    "  ·  {} mode  ·  {} messages",
                    self.profile.personality_preference(),
                    self.messages.len()
                ),
                self.theme.dimmed_style,
            ),
        ]))
        .render(header, buf);

        let list = MessageList::new(self.messages, self.theme)
            .timestamps(self.timestamp_format)
            .awaiting_reply(self.awaiting_reply);
        state.scroll = state.scroll.min(list.max_scroll(transcript));
        list.scroll(state.scroll).render(transcript, buf);

        (&state.input).render(input, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn typed(text: &str) -> ChatScreenState {
        let registry = CommandRegistry::new();
        let mut state = ChatScreenState::new(&Theme::default());
        for c in text.chars() {
            state.handle_key(key(KeyCode::Char(c)), &registry, false);
        }
        state
    }

    #[test]
    fn test_enter_sends_trimmed_draft() {
        let registry = CommandRegistry::new();
        let mut state = typed(" hi Luci ");

        let result = state.handle_key(key(KeyCode::Enter), &registry, false);

        assert_eq!(result, ChatKeyResult::Send("hi Luci".to_string()));
        assert!(state.draft().is_empty());
    }

    #[test]
    fn test_blank_draft_not_sent() {
        let registry = CommandRegistry::new();
        let mut state = typed("   ");

        assert_eq!(
            state.handle_key(key(KeyCode::Enter), &registry, false),
            ChatKeyResult::Consumed
        );
    }

    #[test]
    fn test_send_blocked_while_awaiting_reply() {
        let registry = CommandRegistry::new();
        let mut state = typed("second");

        assert_eq!(
            state.handle_key(key(KeyCode::Enter), &registry, true),
            ChatKeyResult::Consumed
        );
        assert_eq!(state.draft(), "second");
    }

    #[test]
    fn test_navigation_letters_are_typed() {
        let state = typed("jk");
        assert_eq!(state.draft(), "jk");
    }

    #[test]
    fn test_scroll_and_clear() {
        let registry = CommandRegistry::new();
        let mut state = typed("draft");

        state.handle_key(key(KeyCode::PageUp), &registry, false);
        assert_eq!(state.scroll(), SCROLL_STEP);
        state.handle_key(key(KeyCode::PageDown), &registry, false);
        state.handle_key(key(KeyCode::PageDown), &registry, false);
        assert_eq!(state.scroll(), 0);

        state.handle_key(
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
            &registry,
            false,
        );
        assert!(state.draft().is_empty());
    }
}
