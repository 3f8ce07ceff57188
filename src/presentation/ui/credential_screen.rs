//! Credential entry screen.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::presentation::theme::Theme;
use crate::presentation::ui::utils::centered_area;
use crate::presentation::widgets::TextInput;

const KEY_HELP_URL: &str = "https://aistudio.google.com/app/apikey";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialState {
    Input,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialAction {
    None,
    Submit(String),
    Quit,
}

/// Shown whenever no credential is present.
pub struct CredentialScreen {
    key_input: TextInput,
    state: CredentialState,
    error_message: Option<String>,
    theme: Theme,
}

impl CredentialScreen {
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        let mut key_input = TextInput::new(" Gemini API key ")
            .password()
            .placeholder("Paste your API key here...")
            .accent(theme.accent);
        key_input.set_focused(true);

        Self {
            key_input,
            state: CredentialState::Input,
            error_message: None,
            theme,
        }
    }

    #[must_use]
    pub const fn state(&self) -> CredentialState {
        self.state
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Shows an error, e.g. after the endpoint rejected the previous key.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.state = CredentialState::Error;
        self.error_message = Some(message.into());
    }

    /// Clears input and error.
    pub fn reset(&mut self) {
        self.state = CredentialState::Input;
        self.error_message = None;
        self.key_input.clear();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> CredentialAction {
        match key.code {
            KeyCode::Esc => return CredentialAction::Quit,
            KeyCode::Enter => {
                if self.key_input.value().trim().is_empty() {
                    self.set_error("API key must not be empty");
                } else {
                    self.state = CredentialState::Input;
                    self.error_message = None;
                    return CredentialAction::Submit(self.key_input.take());
                }
            }
            KeyCode::Char('u')
                if key
                    .modifiers
                    .contains(crossterm::event::KeyModifiers::CONTROL) =>
            {
                self.key_input.clear();
            }
            _ => {
                if self.key_input.handle_edit_key(key) && self.state == CredentialState::Error {
                    self.state = CredentialState::Input;
                }
            }
        }

        CredentialAction::None
    }

    fn render_inner(&self, area: Rect, buf: &mut Buffer) {
        let content_area = centered_area(area, 64, 13);
        Clear.render(content_area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.accent))
            .title(Span::styled(" Welcome to Luci ", self.theme.title_style));

        let inner = block.inner(content_area);
        block.render(content_area, buf);

        let [intro, _, input, _, hint, _, status] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        Paragraph::new(
            "Luci needs a Gemini API key to talk with you. \
             It is stored locally and never leaves this machine except to reach Gemini.",
        )
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White))
        .render(intro, buf);

        (&self.key_input).render(input, buf);

        Paragraph::new(Line::from(vec![
            Span::styled("Get a key: ", self.theme.dimmed_style),
            Span::styled(KEY_HELP_URL, Style::default().add_modifier(Modifier::UNDERLINED)),
        ]))
        .render(hint, buf);

        let status_line = match self.state {
            CredentialState::Input => Line::from(vec![
                Span::styled("Enter: Continue", self.theme.dimmed_style),
                Span::raw(" | "),
                Span::styled("Esc: Quit", self.theme.dimmed_style),
            ]),
            CredentialState::Error => {
                let msg = self.error_message.as_deref().unwrap_or("Unknown error");
                Line::from(Span::styled(
                    format!("Error: {msg}"),
                    Style::default().fg(Color::Red),
                ))
            }
        };
        Paragraph::new(status_line).render(status, buf);
    }
}

impl Widget for &CredentialScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_inner(area, buf);
    }
}
