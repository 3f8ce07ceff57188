//! Chat turn use case implementation.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::application::controller::{AppController, ControllerError};
use crate::domain::entities::Message;
use crate::domain::errors::{AuthError, EngineError};
use crate::domain::ports::{ChatEnginePort, ChatTurnRequest};

/// How a finished turn changed the session.
#[derive(Debug)]
pub enum TurnOutcome {
    /// The reply was appended to the history.
    Replied,
    /// The credential was rejected and has been cleared.
    Locked,
    /// The turn failed without touching session state.
    Failed(EngineError),
}

/// Forwards conversation turns to the AI engine.
#[derive(Clone)]
pub struct ChatTurnUseCase {
    engine: Arc<dyn ChatEnginePort>,
}

impl ChatTurnUseCase {
    /// Creates new chat turn use case.
    #[must_use]
    pub const fn new(engine: Arc<dyn ChatEnginePort>) -> Self {
        Self { engine }
    }

    /// Snapshots the session for an engine call.
    ///
    /// # Errors
    /// Returns `MissingCredential` if the session is locked.
    pub fn prepare(controller: &AppController) -> Result<ChatTurnRequest, EngineError> {
        let credential = controller
            .credential()
            .cloned()
            .ok_or(AuthError::MissingCredential)?;

        Ok(ChatTurnRequest {
            credential,
            profile: controller.profile().clone(),
            history: controller.messages().to_vec(),
        })
    }

    /// Asks the engine for the assistant reply.
    ///
    /// # Errors
    /// Returns the engine error, unchanged.
    pub async fn execute(&self, request: ChatTurnRequest) -> Result<Message, EngineError> {
        debug!(history = request.history.len(), "Requesting reply");

        match self.engine.reply(&request).await {
            Ok(reply) => {
                info!(chars = reply.content().len(), "Reply received");
                Ok(reply)
            }
            Err(e) => {
                warn!(error = %e, "Reply failed");
                Err(e)
            }
        }
    }

    /// Applies an engine result to the session.
    ///
    /// Replies are appended; authentication failures drop the credential.
    ///
    /// # Errors
    /// Returns error if the resulting state change could not be persisted.
    pub fn apply(
        controller: &mut AppController,
        result: Result<Message, EngineError>,
    ) -> Result<TurnOutcome, ControllerError> {
        match result {
            Ok(reply) => {
                controller.append_message(reply)?;
                Ok(TurnOutcome::Replied)
            }
            Err(e) if e.is_auth_failure() => {
                error!(error = %e, "Authentication failed, credential discarded");
                controller.on_auth_failure()?;
                Ok(TurnOutcome::Locked)
            }
            Err(e) => Ok(TurnOutcome::Failed(e)),
        }
    }
}
