//! Persistent store backends.

mod file_store;
mod keyring_store;
mod memory_store;

pub use file_store::FileStore;
pub use keyring_store::KeyringStore;
pub use memory_store::MemoryStore;
