//! Application controller owning the session state.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::services::PersistentStore;
use crate::domain::entities::{ApiKey, AppView, Message, UserProfile};
use crate::domain::errors::StorageError;
use crate::domain::ports::RecordKey;

/// Controller error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ControllerError {
    #[error("credential must not be blank")]
    InvalidCredential,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// State-changing requests issued by views.
#[derive(Clone)]
pub enum Command {
    /// Adopt a credential entered by the user.
    SubmitCredential(String),
    /// The AI endpoint rejected the current credential.
    AuthFailed,
    /// Wipe the message history.
    ClearHistory,
    /// Show another top-level view.
    SetActiveView(AppView),
    /// Append a message to the history.
    AppendMessage(Message),
    /// Overwrite the profile display name.
    RenameUser(String),
    /// Overwrite the personality preference.
    SetPersonality(String),
    /// Overwrite the avatar URL.
    SetAvatar(String),
    /// Add or remove an interest tag.
    ToggleInterest(String),
    /// Purge all persisted data and start over.
    ResetAll,
}

impl Command {
    /// Returns command name for logging. Payloads are never logged.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SubmitCredential(_) => "submit_credential",
            Self::AuthFailed => "auth_failed",
            Self::ClearHistory => "clear_history",
            Self::SetActiveView(_) => "set_active_view",
            Self::AppendMessage(_) => "append_message",
            Self::RenameUser(_) => "rename_user",
            Self::SetPersonality(_) => "set_personality",
            Self::SetAvatar(_) => "set_avatar",
            Self::ToggleInterest(_) => "toggle_interest",
            Self::ResetAll => "reset_all",
        }
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Single source of truth for session state.
///
/// Views read through the accessors and change state only through
/// [`AppController::dispatch`] or the matching methods. Every profile or
/// history mutation is written through to the store before returning. Memory
/// is updated first, so a failed write reports an error without losing the
/// change for the rest of the session.
pub struct AppController {
    store: PersistentStore,
    credential: Option<ApiKey>,
    active_view: AppView,
    messages: Vec<Message>,
    profile: UserProfile,
}

impl AppController {
    /// Loads persisted state once, falling back to defaults per record.
    #[must_use]
    pub fn initialize(store: PersistentStore) -> Self {
        let credential = recover(RecordKey::Credential, store.load_credential());
        let profile = recover(RecordKey::Profile, store.load_profile()).unwrap_or_default();
        let messages = recover(RecordKey::Messages, store.load_messages()).unwrap_or_default();

        info!(
            authenticated = credential.is_some(),
            messages = messages.len(),
            profile = %profile.name(),
            "Session state loaded"
        );

        Self {
            store,
            credential,
            active_view: AppView::default(),
            messages,
            profile,
        }
    }

    /// Returns the current credential.
    #[must_use]
    pub const fn credential(&self) -> Option<&ApiKey> {
        self.credential.as_ref()
    }

    /// Returns whether a credential is present.
    #[must_use]
    pub const fn is_unlocked(&self) -> bool {
        self.credential.is_some()
    }

    /// Returns the selected view. Reachability is not checked here.
    #[must_use]
    pub const fn active_view(&self) -> AppView {
        self.active_view
    }

    /// Returns the history, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub const fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Applies a command.
    ///
    /// # Errors
    /// Returns error if the credential is blank or the write-through fails.
    pub fn dispatch(&mut self, command: Command) -> Result<(), ControllerError> {
        debug!(command = command.name(), "Dispatching command");

        match command {
            Command::SubmitCredential(token) => self.submit_credential(&token),
            Command::AuthFailed => self.on_auth_failure(),
            Command::ClearHistory => self.clear_history(),
            Command::SetActiveView(view) => {
                self.set_active_view(view);
                Ok(())
            }
            Command::AppendMessage(message) => self.append_message(message),
            Command::RenameUser(name) => self.update_profile(|p| p.rename(name)),
            Command::SetPersonality(text) => {
                self.update_profile(|p| p.set_personality_preference(text))
            }
            Command::SetAvatar(url) => self.update_profile(|p| p.set_avatar_url(url)),
            Command::ToggleInterest(tag) => self.toggle_interest(&tag).map(|_| ()),
            Command::ResetAll => self.reset_all(),
        }
    }

    /// Adopts and persists a new credential.
    ///
    /// # Errors
    /// Returns `InvalidCredential` for blank input, or a storage error if the
    /// credential could not be persisted (it is still adopted for this session).
    pub fn submit_credential(&mut self, token: &str) -> Result<(), ControllerError> {
        let credential = ApiKey::new(token).ok_or(ControllerError::InvalidCredential)?;

        self.credential = Some(credential.clone());
        info!(credential = %credential, "Credential adopted");

        self.store.save_credential(&credential)?;
        Ok(())
    }

    /// Drops the credential after the endpoint rejected it.
    ///
    /// The in-memory credential is always cleared, even when the store fails.
    ///
    /// # Errors
    /// Returns error if the stored credential could not be removed.
    pub fn on_auth_failure(&mut self) -> Result<(), ControllerError> {
        warn!("Credential rejected, locking session");
        self.credential = None;
        self.store.clear_credential()?;
        Ok(())
    }

    /// Empties the history in memory and in the store.
    ///
    /// # Errors
    /// Returns error if the empty history could not be persisted.
    pub fn clear_history(&mut self) -> Result<(), ControllerError> {
        info!(cleared = self.messages.len(), "Clearing chat history");
        self.messages.clear();
        self.store.save_messages(&self.messages)?;
        Ok(())
    }

    /// Overwrites the active view.
    pub fn set_active_view(&mut self, view: AppView) {
        debug!(from = %self.active_view, to = %view, "Switching view");
        self.active_view = view;
    }

    /// Appends a message and persists the history.
    ///
    /// # Errors
    /// Returns error if the history could not be persisted.
    pub fn append_message(&mut self, message: Message) -> Result<(), ControllerError> {
        self.messages.push(message);
        self.store.save_messages(&self.messages)?;
        Ok(())
    }

    /// Toggles an interest tag, returning whether it is now selected.
    ///
    /// # Errors
    /// Returns error if the profile could not be persisted.
    pub fn toggle_interest(&mut self, tag: &str) -> Result<bool, ControllerError> {
        let selected = self.profile.toggle_interest(tag);
        debug!(tag, selected, "Interest toggled");
        self.store.save_profile(&self.profile)?;
        Ok(selected)
    }

    /// Mutates the profile and persists it.
    ///
    /// # Errors
    /// Returns error if the profile could not be persisted.
    pub fn update_profile(
        &mut self,
        mutate: impl FnOnce(&mut UserProfile),
    ) -> Result<(), ControllerError> {
        mutate(&mut self.profile);
        self.store.save_profile(&self.profile)?;
        Ok(())
    }

    /// Purges persisted data and reloads first-run state.
    ///
    /// # Errors
    /// Returns error if the store could not be cleared. Memory is reset to
    /// defaults regardless.
    pub fn reset_all(&mut self) -> Result<(), ControllerError> {
        match self.store.clear_all() {
            Ok(()) => {
                *self = Self::initialize(self.store.clone());
                info!("All data reset");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to clear persisted data, resetting memory only");
                self.credential = None;
                self.active_view = AppView::default();
                self.messages.clear();
                self.profile = UserProfile::default();
                Err(e.into())
            }
        }
    }
}

fn recover<T>(key: RecordKey, result: Result<Option<T>, StorageError>) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(e) if e.is_corrupt_record() => {
            warn!(key = %key, error = %e, "Discarding unreadable record, using defaults");
            None
        }
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to load record, using defaults");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::DEFAULT_AVATAR_URL;
    use crate::domain::ports::StorePort;
    use crate::domain::ports::mocks::FailingStore;
    use crate::infrastructure::store::MemoryStore;
    use std::sync::Arc;

    fn setup() -> (Arc<MemoryStore>, AppController) {
        let backend = Arc::new(MemoryStore::new());
        let controller = AppController::initialize(PersistentStore::new(backend.clone()));
        (backend, controller)
    }

    fn reload(backend: &Arc<MemoryStore>) -> AppController {
        AppController::initialize(PersistentStore::new(backend.clone()))
    }

    #[test]
    fn test_first_run_defaults() {
        let (_, controller) = setup();

        assert!(!controller.is_unlocked());
        assert_eq!(controller.active_view(), AppView::Chat);
        assert!(controller.messages().is_empty());
        assert_eq!(controller.profile().name(), "User");
        assert!(controller.profile().interests().is_empty());
        assert_eq!(controller.profile().avatar_url(), DEFAULT_AVATAR_URL);
    }

    #[test]
    fn test_submit_credential_persists_and_unlocks() {
        let (backend, mut controller) = setup();

        controller
            .dispatch(Command::SubmitCredential("tok123".into()))
            .unwrap();

        assert!(controller.is_unlocked());
        assert_eq!(
            backend.read(RecordKey::Credential).unwrap().as_deref(),
            Some("tok123")
        );
        assert!(reload(&backend).is_unlocked());
    }

    #[test]
    fn test_blank_credential_rejected() {
        let (backend, mut controller) = setup();

        let result = controller.submit_credential("   ");

        assert!(matches!(result, Err(ControllerError::InvalidCredential)));
        assert!(!controller.is_unlocked());
        assert!(!backend.contains(RecordKey::Credential).unwrap());
    }

    #[test]
    fn test_auth_failure_clears_credential_everywhere() {
        let (backend, mut controller) = setup();
        controller.submit_credential("tok123").unwrap();

        controller.dispatch(Command::AuthFailed).unwrap();

        assert!(controller.credential().is_none());
        assert!(!backend.contains(RecordKey::Credential).unwrap());
    }

    #[test]
    fn test_auth_failure_without_credential_is_harmless() {
        let (backend, mut controller) = setup();

        controller.on_auth_failure().unwrap();

        assert!(controller.credential().is_none());
        assert!(!backend.contains(RecordKey::Credential).unwrap());
    }

    #[test]
    fn test_auth_failure_clears_memory_even_if_store_fails() {
        let backend = Arc::new(MemoryStore::new());
        backend.write(RecordKey::Credential, "tok123").unwrap();
        let mut controller = AppController::initialize(PersistentStore::new(backend));
        assert!(controller.is_unlocked());

        controller.store = PersistentStore::new(Arc::new(FailingStore::new()));
        let result = controller.on_auth_failure();

        assert!(result.is_err());
        assert!(controller.credential().is_none());
    }

    #[test]
    fn test_messages_written_through_in_order() {
        let (backend, mut controller) = setup();

        controller.append_message(Message::user("hello")).unwrap();
        controller.append_message(Message::model("hi there")).unwrap();

        let reloaded = reload(&backend);
        let contents: Vec<_> = reloaded.messages().iter().map(Message::content).collect();
        assert_eq!(contents, ["hello", "hi there"]);
    }

    #[test]
    fn test_clear_history_empties_memory_and_store() {
        let (backend, mut controller) = setup();
        controller.append_message(Message::user("hello")).unwrap();

        controller.dispatch(Command::ClearHistory).unwrap();

        assert!(controller.messages().is_empty());
        let store = PersistentStore::new(backend);
        assert_eq!(store.load_messages().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_set_active_view_is_unconditional() {
        let (_, mut controller) = setup();
        assert!(!controller.is_unlocked());

        controller.dispatch(Command::SetActiveView(AppView::Profile)).unwrap();

        assert_eq!(controller.active_view(), AppView::Profile);
    }

    #[test]
    fn test_gaming_toggled_twice_is_empty() {
        let (backend, mut controller) = setup();

        controller
            .dispatch(Command::ToggleInterest("Gaming".into()))
            .unwrap();
        assert_eq!(controller.profile().interests(), ["Gaming"]);

        controller
            .dispatch(Command::ToggleInterest("Gaming".into()))
            .unwrap();
        assert!(controller.profile().interests().is_empty());
        assert!(reload(&backend).profile().interests().is_empty());
    }

    #[test]
    fn test_profile_edits_persist() {
        let (backend, mut controller) = setup();

        controller.dispatch(Command::RenameUser("Noa".into())).unwrap();
        controller
            .dispatch(Command::SetPersonality("Witty".into()))
            .unwrap();
        controller
            .dispatch(Command::SetAvatar("https://example.com/me.png".into()))
            .unwrap();

        let reloaded = reload(&backend);
        assert_eq!(reloaded.profile(), controller.profile());
        assert_eq!(reloaded.profile().name(), "Noa");
    }

    #[test]
    fn test_reset_all_returns_to_first_run() {
        let (backend, mut controller) = setup();
        controller.submit_credential("tok123").unwrap();
        controller.toggle_interest("Music").unwrap();
        controller.append_message(Message::user("hey")).unwrap();
        controller.set_active_view(AppView::Voice);

        controller.dispatch(Command::ResetAll).unwrap();

        for key in RecordKey::ALL {
            assert!(!backend.contains(key).unwrap());
        }
        assert!(!controller.is_unlocked());
        assert_eq!(controller.active_view(), AppView::Chat);
        assert!(controller.messages().is_empty());
        assert_eq!(controller.profile(), &UserProfile::default());
    }

    #[test]
    fn test_corrupt_records_fall_back_to_defaults() {
        let backend = Arc::new(MemoryStore::new());
        backend.write(RecordKey::Profile, "{oops").unwrap();
        backend
            .write(RecordKey::Messages, r#"{"schema":42,"data":[]}"#)
            .unwrap();
        backend.write(RecordKey::Credential, "tok").unwrap();

        let controller = reload(&backend);

        assert!(controller.is_unlocked());
        assert_eq!(controller.profile(), &UserProfile::default());
        assert!(controller.messages().is_empty());
    }

    #[test]
    fn test_unreadable_store_starts_locked_with_defaults() {
        let controller =
            AppController::initialize(PersistentStore::new(Arc::new(FailingStore::new())));

        assert!(!controller.is_unlocked());
        assert_eq!(controller.profile(), &UserProfile::default());
    }

    #[test]
    fn test_write_failure_keeps_memory_change() {
        let store = PersistentStore::new(Arc::new(FailingStore::write_only_failures()));
        let mut controller = AppController::initialize(store);

        let result = controller.append_message(Message::user("kept"));

        assert!(matches!(result, Err(ControllerError::Storage(_))));
        assert_eq!(controller.messages().len(), 1);
    }

    #[test]
    fn test_command_debug_hides_payload() {
        let command = Command::SubmitCredential("super-secret-key".into());
        assert_eq!(format!("{command:?}"), "submit_credential");
    }
}
