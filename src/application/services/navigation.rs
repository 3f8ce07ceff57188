//! Navigation shell: active view selection and drawer visibility.

use tracing::debug;

use crate::application::controller::{AppController, Command, ControllerError};
use crate::domain::entities::AppView;

/// Tracks the drawer and routes view selection to the controller.
///
/// Selecting a destination always closes the drawer.
#[derive(Debug, Default, Clone)]
pub struct NavigationShell {
    drawer_open: bool,
}

impl NavigationShell {
    /// Creates shell with the drawer closed.
    #[must_use]
    pub const fn new() -> Self {
        Self { drawer_open: false }
    }

    #[must_use]
    pub const fn is_drawer_open(&self) -> bool {
        self.drawer_open
    }

    pub fn open_drawer(&mut self) {
        self.drawer_open = true;
    }

    pub fn close_drawer(&mut self) {
        self.drawer_open = false;
    }

    pub fn toggle_drawer(&mut self) {
        self.drawer_open = !self.drawer_open;
    }

    /// Activates a view and closes the drawer.
    ///
    /// # Errors
    /// Propagates controller errors; view changes themselves cannot fail.
    pub fn select(
        &mut self,
        controller: &mut AppController,
        view: AppView,
    ) -> Result<(), ControllerError> {
        debug!(view = %view, drawer_open = self.drawer_open, "Navigation selected");
        self.drawer_open = false;
        controller.dispatch(Command::SetActiveView(view))
    }

    /// Activates the view after the current one.
    ///
    /// # Errors
    /// Propagates controller errors.
    pub fn select_next(&mut self, controller: &mut AppController) -> Result<(), ControllerError> {
        let view = controller.active_view().next();
        self.select(controller, view)
    }

    /// Activates the view before the current one.
    ///
    /// # Errors
    /// Propagates controller errors.
    pub fn select_previous(
        &mut self,
        controller: &mut AppController,
    ) -> Result<(), ControllerError> {
        let view = controller.active_view().previous();
        self.select(controller, view)
    }

    /// Returns the view to render, or `None` while no credential is present.
    #[must_use]
    pub const fn visible_view(controller: &AppController) -> Option<AppView> {
        if controller.is_unlocked() {
            Some(controller.active_view())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::PersistentStore;
    use crate::infrastructure::store::MemoryStore;
    use std::sync::Arc;
    use test_case::test_case;

    fn controller() -> AppController {
        AppController::initialize(PersistentStore::new(Arc::new(MemoryStore::new())))
    }

    #[test]
    fn test_initial_state() {
        let shell = NavigationShell::new();
        assert!(!shell.is_drawer_open());
        assert_eq!(controller().active_view(), AppView::Chat);
    }

    #[test_case(AppView::Chat ; "chat")]
    #[test_case(AppView::Voice ; "voice")]
    #[test_case(AppView::Profile ; "profile")]
    fn test_select_sets_view_and_closes_drawer(view: AppView) {
        let mut controller = controller();
        let mut shell = NavigationShell::new();
        shell.open_drawer();

        shell.select(&mut controller, view).unwrap();

        assert_eq!(controller.active_view(), view);
        assert!(!shell.is_drawer_open());
    }

    #[test]
    fn test_toggle_drawer() {
        let mut shell = NavigationShell::new();

        shell.toggle_drawer();
        assert!(shell.is_drawer_open());

        shell.toggle_drawer();
        assert!(!shell.is_drawer_open());
    }

    #[test]
    fn test_cycle_wraps_around() {
        let mut controller = controller();
        let mut shell = NavigationShell::new();

        shell.select_previous(&mut controller).unwrap();
        assert_eq!(controller.active_view(), AppView::Profile);

        shell.select_next(&mut controller).unwrap();
        assert_eq!(controller.active_view(), AppView::Chat);
    }

    #[test]
    fn test_visible_view_requires_credential() {
        let mut controller = controller();
        assert_eq!(NavigationShell::visible_view(&controller), None);

        controller.submit_credential("tok123").unwrap();

        for view in AppView::ALL {
            controller.set_active_view(view);
            assert_eq!(NavigationShell::visible_view(&controller), Some(view));
        }
    }
}
