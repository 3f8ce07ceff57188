//! Profile view.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, StatefulWidget, Widget},
};

use crate::domain::entities::{INTEREST_CATALOG, UserProfile};
use crate::domain::keybinding::{Action, Keybind};
use crate::presentation::commands::{CommandRegistry, HasCommands};
use crate::presentation::theme::Theme;
use crate::presentation::widgets::TextInput;

const PROFILE_ACTIONS: [Action; 6] = [
    Action::NavigateUp,
    Action::NavigateDown,
    Action::Select,
    Action::EditName,
    Action::ClearHistory,
    Action::ResetAll,
];

/// Editable text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Personality,
    Avatar,
}

impl ProfileField {
    const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Personality => "Personality",
            Self::Avatar => "Avatar URL",
        }
    }
}

/// Selectable rows, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileRow {
    Field(ProfileField),
    Interest(&'static str),
    ClearHistory,
    ResetAll,
}

fn rows() -> Vec<ProfileRow> {
    let mut rows = vec![
        ProfileRow::Field(ProfileField::Name),
        ProfileRow::Field(ProfileField::Personality),
        ProfileRow::Field(ProfileField::Avatar),
    ];
    rows.extend(INTEREST_CATALOG.iter().map(|&tag| ProfileRow::Interest(tag)));
    rows.push(ProfileRow::ClearHistory);
    rows.push(ProfileRow::ResetAll);
    rows
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileKeyResult {
    Ignored,
    Consumed,
    Rename(String),
    SetPersonality(String),
    SetAvatar(String),
    ToggleInterest(&'static str),
    RequestClearHistory,
    RequestFullReset,
}

/// Cursor and inline editor of the profile view.
pub struct ProfileScreenState {
    rows: Vec<ProfileRow>,
    selected: usize,
    editing: Option<(ProfileField, TextInput)>,
    list_state: ListState,
    accent: ratatui::style::Color,
}

impl ProfileScreenState {
    #[must_use]
    pub fn new(theme: &Theme) -> Self {
        Self {
            rows: rows(),
            selected: 0,
            editing: None,
            list_state: ListState::default(),
            accent: theme.accent,
        }
    }

    #[must_use]
    pub fn selected_row(&self) -> ProfileRow {
        self.rows[self.selected]
    }

    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    fn begin_edit(&mut self, field: ProfileField, profile: &UserProfile) {
        let current = match field {
            ProfileField::Name => profile.name(),
            ProfileField::Personality => profile.personality_preference(),
            ProfileField::Avatar => profile.avatar_url(),
        };
        let mut input = TextInput::new(format!(" {} ", field.label())).accent(self.accent);
        input.set_value(current);
        input.set_focused(true);
        self.editing = Some((field, input));
    }

    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        registry: &CommandRegistry,
        profile: &UserProfile,
    ) -> ProfileKeyResult {
        if let Some((field, input)) = &mut self.editing {
            return match key.code {
                KeyCode::Enter => {
                    let value = input.take();
                    let field = *field;
                    self.editing = None;
                    match field {
                        ProfileField::Name => ProfileKeyResult::Rename(value),
                        ProfileField::Personality => ProfileKeyResult::SetPersonality(value),
                        ProfileField::Avatar => ProfileKeyResult::SetAvatar(value),
                    }
                }
                KeyCode::Esc => {
                    self.editing = None;
                    ProfileKeyResult::Consumed
                }
                _ => {
                    input.handle_edit_key(key);
                    ProfileKeyResult::Consumed
                }
            };
        }

        match registry.find_action_in(key, &PROFILE_ACTIONS) {
            Some(Action::NavigateUp) => {
                self.selected = self.selected.saturating_sub(1);
                ProfileKeyResult::Consumed
            }
            Some(Action::NavigateDown) => {
                self.selected = (self.selected + 1).min(self.rows.len() - 1);
                ProfileKeyResult::Consumed
            }
            Some(Action::Select) => match self.selected_row() {
                ProfileRow::Field(field) => {
                    self.begin_edit(field, profile);
                    ProfileKeyResult::Consumed
                }
                ProfileRow::Interest(tag) => ProfileKeyResult::ToggleInterest(tag),
                ProfileRow::ClearHistory => ProfileKeyResult::RequestClearHistory,
                ProfileRow::ResetAll => ProfileKeyResult::RequestFullReset,
            },
            Some(Action::EditName) => {
                self.selected = 0;
                self.begin_edit(ProfileField::Name, profile);
                ProfileKeyResult::Consumed
            }
            Some(Action::ClearHistory) => ProfileKeyResult::RequestClearHistory,
            Some(Action::ResetAll) => ProfileKeyResult::RequestFullReset,
            _ => ProfileKeyResult::Ignored,
        }
    }
}

impl HasCommands for ProfileScreenState {
    fn get_commands(&self, registry: &CommandRegistry) -> Vec<Keybind> {
        if self.is_editing() {
            return vec![
                Keybind::new(KeyEvent::from(KeyCode::Enter), Action::Select, "Save"),
                Keybind::new(KeyEvent::from(KeyCode::Esc), Action::Cancel, "Discard"),
            ];
        }
        registry.keybinds(&PROFILE_ACTIONS)
    }
}

/// Profile view widget.
pub struct ProfileScreen<'a> {
    profile: &'a UserProfile,
    theme: &'a Theme,
    message_count: usize,
}

impl<'a> ProfileScreen<'a> {
    #[must_use]
    pub const fn new(profile: &'a UserProfile, theme: &'a Theme, message_count: usize) -> Self {
        Self {
            profile,
            theme,
            message_count,
        }
    }

    fn section(&self, title: &'static str) -> ListItem<'a> {
        ListItem::new(Line::from(Span::styled(
            title,
            self.theme.title_style.add_modifier(Modifier::UNDERLINED),
        )))
    }

    fn row_item(&self, row: ProfileRow) -> ListItem<'a> {
        let line = match row {
            ProfileRow::Field(field) => {
                let value = match field {
                    ProfileField::Name => self.profile.name(),
                    ProfileField::Personality => self.profile.personality_preference(),
                    ProfileField::Avatar => self.profile.avatar_url(),
                };
                Line::from(vec![
                    Span::styled(format!("  {:<12}", field.label()), self.theme.dimmed_style),
                    Span::raw(value.to_string()),
                ])
            }
            ProfileRow::Interest(tag) => {
                let checked = self.profile.has_interest(tag);
                let (mark, style) = if checked {
                    ("[x]", self.theme.title_style)
                } else {
                    ("[ ]", self.theme.dimmed_style)
                };
                Line::from(vec![Span::styled(format!("  {mark} "), style), Span::raw(tag)])
            }
            ProfileRow::ClearHistory => Line::from(Span::styled(
                format!("  Clear chat history ({} messages)", self.message_count),
                self.theme.danger_style,
            )),
            ProfileRow::ResetAll => Line::from(Span::styled(
                "  Reset all data and log out",
                self.theme.danger_style,
            )),
        };
        ListItem::new(line)
    }
}

impl StatefulWidget for ProfileScreen<'_> {
    type State = ProfileScreenState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let editor_height = if state.is_editing() { 3 } else { 0 };
        let [list_area, editor_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(editor_height)]).areas(area);

        let mut items = vec![self.section(" Profile")];
        let mut selected_index = 0;
        for (i, &row) in state.rows.iter().enumerate() {
            match row {
                ProfileRow::Interest(tag) if tag == INTEREST_CATALOG[0] => {
                    items.push(ListItem::new(""));
                    items.push(self.section(" Interests"));
                }
                ProfileRow::ClearHistory => {
                    items.push(ListItem::new(""));
                    items.push(self.section(" Danger Zone"));
                }
                _ => {}
            }
            if i == state.selected {
                selected_index = items.len();
            }
            items.push(self.row_item(row));
        }

        state.list_state.select(Some(selected_index));
        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("›");
        StatefulWidget::render(list, list_area, buf, &mut state.list_state);

        if let Some((_, input)) = &state.editing {
            input.render(editor_area, buf);
        }
    }
}
