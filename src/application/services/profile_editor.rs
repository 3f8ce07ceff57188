//! Profile editing with confirmation-gated destructive actions.

use tracing::{debug, info};

use crate::application::controller::{AppController, Command, ControllerError};

/// Destructive action waiting for the user's confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DangerAction {
    /// Wipe the message history.
    ClearHistory,
    /// Purge every persisted record, including the credential.
    FullReset,
}

impl DangerAction {
    /// Returns the question shown before running the action.
    #[must_use]
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::ClearHistory => "Are you sure you want to clear your chat history with Luci?",
            Self::FullReset => "This will log you out and require a new API key. Continue?",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::ClearHistory => "Clear Chat History",
            Self::FullReset => "Reset All Data",
        }
    }
}

/// Edits the profile through the controller.
///
/// Field edits apply immediately. Clearing history and resetting everything
/// are only requested here and run on [`ProfileEditor::confirm`].
#[derive(Debug, Default)]
pub struct ProfileEditor {
    pending: Option<DangerAction>,
}

impl ProfileEditor {
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Returns the action awaiting confirmation.
    #[must_use]
    pub const fn pending(&self) -> Option<DangerAction> {
        self.pending
    }

    /// Overwrites the display name.
    ///
    /// # Errors
    /// Returns error if the profile could not be persisted.
    pub fn rename_user(
        &self,
        controller: &mut AppController,
        name: impl Into<String>,
    ) -> Result<(), ControllerError> {
        controller.dispatch(Command::RenameUser(name.into()))
    }

    /// Adds or removes an interest tag.
    ///
    /// # Errors
    /// Returns error if the profile could not be persisted.
    pub fn toggle_interest(
        &self,
        controller: &mut AppController,
        tag: impl Into<String>,
    ) -> Result<(), ControllerError> {
        controller.dispatch(Command::ToggleInterest(tag.into()))
    }

    /// Overwrites the personality preference.
    ///
    /// # Errors
    /// Returns error if the profile could not be persisted.
    pub fn set_personality(
        &self,
        controller: &mut AppController,
        personality: impl Into<String>,
    ) -> Result<(), ControllerError> {
        controller.dispatch(Command::SetPersonality(personality.into()))
    }

    /// Overwrites the avatar URL.
    ///
    /// # Errors
    /// Returns error if the profile could not be persisted.
    pub fn set_avatar(
        &self,
        controller: &mut AppController,
        url: impl Into<String>,
    ) -> Result<(), ControllerError> {
        controller.dispatch(Command::SetAvatar(url.into()))
    }

    /// Asks for confirmation before clearing history.
    pub fn request_clear_history(&mut self) -> DangerAction {
        self.request(DangerAction::ClearHistory)
    }

    /// Asks for confirmation before purging all data.
    pub fn request_full_reset(&mut self) -> DangerAction {
        self.request(DangerAction::FullReset)
    }

    fn request(&mut self, action: DangerAction) -> DangerAction {
        debug!(?action, replaced = ?self.pending, "Confirmation requested");
        self.pending = Some(action);
        action
    }

    /// Drops the pending action without running it.
    pub fn cancel(&mut self) {
        if let Some(action) = self.pending.take() {
            debug!(?action, "Confirmation declined");
        }
    }

    /// Runs the pending action, returning which one ran.
    ///
    /// # Errors
    /// Returns error if the controller fails to apply the action. The pending
    /// action is consumed either way.
    pub fn confirm(
        &mut self,
        controller: &mut AppController,
    ) -> Result<Option<DangerAction>, ControllerError> {
        let Some(action) = self.pending.take() else {
            return Ok(None);
        };

        info!(?action, "Confirmed destructive action");
        match action {
            DangerAction::ClearHistory => controller.dispatch(Command::ClearHistory)?,
            DangerAction::FullReset => controller.dispatch(Command::ResetAll)?,
        }

        Ok(Some(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::PersistentStore;
    use crate::domain::entities::{AppView, Message, UserProfile};
    use crate::domain::ports::{RecordKey, StorePort};
    use crate::infrastructure::store::MemoryStore;
    use std::sync::Arc;

    fn setup() -> (Arc<MemoryStore>, AppController) {
        let backend = Arc::new(MemoryStore::new());
        let controller = AppController::initialize(PersistentStore::new(backend.clone()));
        (backend, controller)
    }

    #[test]
    fn test_rename_applies_immediately() {
        let (_, mut controller) = setup();
        let editor = ProfileEditor::new();

        editor.rename_user(&mut controller, "Rin").unwrap();

        assert_eq!(controller.profile().name(), "Rin");
    }

    #[test]
    fn test_toggle_interest_twice() {
        let (_, mut controller) = setup();
        let editor = ProfileEditor::new();

        editor.toggle_interest(&mut controller, "Gaming").unwrap();
        editor.toggle_interest(&mut controller, "Gaming").unwrap();

        assert!(controller.profile().interests().is_empty());
    }

    #[test]
    fn test_clear_history_requires_confirmation() {
        let (_, mut controller) = setup();
        controller.append_message(Message::user("keep me")).unwrap();
        let mut editor = ProfileEditor::new();

        editor.request_clear_history();
        assert_eq!(controller.messages().len(), 1);

        let ran = editor.confirm(&mut controller).unwrap();

        assert_eq!(ran, Some(DangerAction::ClearHistory));
        assert!(controller.messages().is_empty());
        assert_eq!(editor.pending(), None);
    }

    #[test]
    fn test_cancel_keeps_history() {
        let (_, mut controller) = setup();
        controller.append_message(Message::user("keep me")).unwrap();
        let mut editor = ProfileEditor::new();

        editor.request_clear_history();
        editor.cancel();

        assert_eq!(editor.confirm(&mut controller).unwrap(), None);
        assert_eq!(controller.messages().len(), 1);
    }

    #[test]
    fn test_full_reset_with_confirmation() {
        let (backend, mut controller) = setup();
        controller.submit_credential("tok123").unwrap();
        controller.toggle_interest("Art").unwrap();
        controller.append_message(Message::user("hi")).unwrap();
        controller.set_active_view(AppView::Profile);
        let mut editor = ProfileEditor::new();

        assert_eq!(editor.request_full_reset(), DangerAction::FullReset);
        editor.confirm(&mut controller).unwrap();

        for key in RecordKey::ALL {
            assert!(!backend.contains(key).unwrap());
        }
        assert!(!controller.is_unlocked());
        assert_eq!(controller.active_view(), AppView::Chat);
        assert_eq!(controller.profile(), &UserProfile::default());
        assert!(controller.messages().is_empty());
    }

    #[test]
    fn test_later_request_replaces_pending() {
        let mut editor = ProfileEditor::new();

        editor.request_full_reset();
        editor.request_clear_history();

        assert_eq!(editor.pending(), Some(DangerAction::ClearHistory));
    }

    #[test]
    fn test_prompts_are_distinct() {
        assert_ne!(
            DangerAction::ClearHistory.prompt(),
            DangerAction::FullReset.prompt()
        );
    }
}
