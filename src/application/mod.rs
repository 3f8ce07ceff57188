//! Application layer with the session controller, services and use cases.

/// Session state controller.
pub mod controller;
/// Application services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use controller::{AppController, Command, ControllerError};
pub use services::{DangerAction, NavigationShell, PersistentStore, ProfileEditor};
pub use use_cases::{ChatTurnUseCase, TurnOutcome};
