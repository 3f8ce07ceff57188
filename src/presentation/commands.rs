use crate::domain::keybinding::{Action, Keybind};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

pub struct CommandRegistry {
    display_bindings: HashMap<Action, KeyEvent>,
    input_bindings: Vec<(KeyEvent, Action)>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        let mut display_bindings = HashMap::new();
        let mut input_bindings = Vec::new();

        let mut register = |action: Action, code: KeyCode, modifiers: KeyModifiers, is_primary: bool| {
            let key = KeyEvent::new(code, modifiers);
            if is_primary {
                display_bindings.insert(action, key);
            }
            input_bindings.push((key, action));
        };

        register(Action::Quit, KeyCode::Char('c'), KeyModifiers::CONTROL, true);
        register(Action::Quit, KeyCode::Char('q'), KeyModifiers::CONTROL, false);
        register(Action::ToggleHelp, KeyCode::F(1), KeyModifiers::NONE, true);
        register(Action::ToggleDrawer, KeyCode::Char('b'), KeyModifiers::CONTROL, true);

        register(Action::NextView, KeyCode::Char('n'), KeyModifiers::CONTROL, true);
        register(Action::PreviousView, KeyCode::Char('p'), KeyModifiers::CONTROL, true);
        register(Action::GoToChat, KeyCode::Char('1'), KeyModifiers::ALT, true);
        register(Action::GoToVoice, KeyCode::Char('2'), KeyModifiers::ALT, true);
        register(Action::GoToProfile, KeyCode::Char('3'), KeyModifiers::ALT, true);

        register(Action::NavigateUp, KeyCode::Up, KeyModifiers::NONE, true);
        register(Action::NavigateUp, KeyCode::Char('k'), KeyModifiers::NONE, false);
        register(Action::NavigateDown, KeyCode::Down, KeyModifiers::NONE, true);
        register(Action::NavigateDown, KeyCode::Char('j'), KeyModifiers::NONE, false);
        register(Action::Select, KeyCode::Enter, KeyModifiers::NONE, true);
        register(Action::Select, KeyCode::Char(' '), KeyModifiers::NONE, false);

        register(Action::SendMessage, KeyCode::Enter, KeyModifiers::NONE, true);
        register(Action::ScrollUp, KeyCode::PageUp, KeyModifiers::NONE, true);
        register(Action::ScrollDown, KeyCode::PageDown, KeyModifiers::NONE, true);
        register(Action::ClearInput, KeyCode::Char('u'), KeyModifiers::CONTROL, true);

        register(Action::EditName, KeyCode::Char('e'), KeyModifiers::NONE, true);
        register(Action::ClearHistory, KeyCode::Char('x'), KeyModifiers::NONE, true);
        register(Action::ResetAll, KeyCode::Char('R'), KeyModifiers::SHIFT, true);

        register(Action::Confirm, KeyCode::Char('y'), KeyModifiers::NONE, true);
        register(Action::Confirm, KeyCode::Enter, KeyModifiers::NONE, false);
        register(Action::Cancel, KeyCode::Esc, KeyModifiers::NONE, true);
        register(Action::Cancel, KeyCode::Char('n'), KeyModifiers::NONE, false);

        Self {
            display_bindings,
            input_bindings,
        }
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, action: Action) -> Option<KeyEvent> {
        self.display_bindings.get(&action).copied()
    }

    pub fn find_action(&self, key: KeyEvent) -> Option<Action> {
        self.input_bindings
            .iter()
            .find(|(k, _)| Self::matches(k, &key))
            .map(|(_, a)| *a)
    }

    /// Finds the first action bound to `key` among those a context accepts.
    ///
    /// The same key can mean different things per screen (Enter sends in chat
    /// and selects in the drawer), so screens resolve against their own list.
    pub fn find_action_in(&self, key: KeyEvent, allowed: &[Action]) -> Option<Action> {
        self.input_bindings
            .iter()
            .filter(|(_, a)| allowed.contains(a))
            .find(|(k, _)| Self::matches(k, &key))
            .map(|(_, a)| *a)
    }

    /// Builds footer entries for the given actions, skipping unbound ones.
    pub fn keybinds(&self, actions: &[Action]) -> Vec<Keybind> {
        actions
            .iter()
            .filter_map(|&action| {
                self.get(action)
                    .map(|key| Keybind::new(key, action, action.description()))
            })
            .collect()
    }

    fn matches(bound: &KeyEvent, pressed: &KeyEvent) -> bool {
        if bound.code != pressed.code {
            return false;
        }
        // Terminals disagree on whether shifted characters carry SHIFT.
        if matches!(bound.code, KeyCode::Char(_)) {
            let relevant = KeyModifiers::CONTROL | KeyModifiers::ALT;
            return bound.modifiers & relevant == pressed.modifiers & relevant;
        }
        bound.modifiers == pressed.modifiers
    }
}

pub trait HasCommands {
    fn get_commands(&self, registry: &CommandRegistry) -> Vec<Keybind>;
}
