use crossterm::event::KeyEvent;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    ToggleHelp,
    ToggleDrawer,

    // Navigation
    NextView,
    PreviousView,
    GoToChat,
    GoToVoice,
    GoToProfile,
    NavigateUp,
    NavigateDown,
    Select,

    // Chat
    SendMessage,
    ScrollUp,
    ScrollDown,
    ClearInput,

    // Profile
    EditName,
    ClearHistory,
    ResetAll,

    // Dialogs
    Confirm,
    Cancel,
}

impl Action {
    /// Returns human-readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Quit => "Quit",
            Self::ToggleHelp => "Help",
            Self::ToggleDrawer => "Menu",
            Self::NextView => "Next view",
            Self::PreviousView => "Previous view",
            Self::GoToChat => "Chat",
            Self::GoToVoice => "Voice",
            Self::GoToProfile => "Profile",
            Self::NavigateUp => "Up",
            Self::NavigateDown => "Down",
            Self::Select => "Select",
            Self::SendMessage => "Send",
            Self::ScrollUp => "Scroll up",
            Self::ScrollDown => "Scroll down",
            Self::ClearInput => "Clear input",
            Self::EditName => "Edit name",
            Self::ClearHistory => "Clear history",
            Self::ResetAll => "Reset all data",
            Self::Confirm => "Confirm",
            Self::Cancel => "Cancel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybind {
    pub key: KeyEvent,
    pub action: Action,
    pub label: Cow<'static, str>,
}

impl Keybind {
    pub fn new(key: KeyEvent, action: Action, label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            key,
            action,
            label: label.into(),
        }
    }
}
