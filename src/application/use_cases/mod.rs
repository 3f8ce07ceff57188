//! Use case implementations.

mod chat_turn_use_case;

pub use chat_turn_use_case::{ChatTurnUseCase, TurnOutcome};
