//! Conversational AI engine port definition.

use async_trait::async_trait;

use crate::domain::entities::{ApiKey, Message, UserProfile};
use crate::domain::errors::EngineError;

/// Snapshot of session state handed to the engine for one turn.
#[derive(Debug, Clone)]
pub struct ChatTurnRequest {
    /// Credential for the AI endpoint.
    pub credential: ApiKey,
    /// Profile shaping tone and topics.
    pub profile: UserProfile,
    /// Full conversation, oldest first, ending with the user's new message.
    pub history: Vec<Message>,
}

/// Port for the remote conversational AI endpoint.
#[async_trait]
pub trait ChatEnginePort: Send + Sync {
    /// Produces the assistant reply for the conversation.
    async fn reply(&self, request: &ChatTurnRequest) -> Result<Message, EngineError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;

    /// Mock engine replaying a scripted outcome.
    pub struct MockChatEngine {
        outcome: Mutex<Result<String, EngineError>>,
        requests: Mutex<Vec<ChatTurnRequest>>,
    }

    impl MockChatEngine {
        /// Creates engine that always replies with the text.
        pub fn replying(text: impl Into<String>) -> Self {
            Self {
                outcome: Mutex::new(Ok(text.into())),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Creates engine that always fails.
        pub fn failing(error: EngineError) -> Self {
            Self {
                outcome: Mutex::new(Err(error)),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Returns requests received so far.
        pub fn requests(&self) -> Vec<ChatTurnRequest> {
            self.requests.lock().clone()
        }
    }

    #[async_trait]
    impl ChatEnginePort for MockChatEngine {
        async fn reply(&self, request: &ChatTurnRequest) -> Result<Message, EngineError> {
            self.requests.lock().push(request.clone());
            self.outcome.lock().clone().map(Message::model)
        }
    }
}
