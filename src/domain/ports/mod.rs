mod chat_engine_port;
mod store_port;

pub use chat_engine_port::{ChatEnginePort, ChatTurnRequest};
pub use store_port::{RecordKey, StorePort};

#[cfg(test)]
pub mod mocks {
    pub use super::chat_engine_port::mock::MockChatEngine;
    pub use super::store_port::mock::FailingStore;
}
