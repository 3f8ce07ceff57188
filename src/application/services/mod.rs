//! Application services.

mod navigation;
mod persistent_store;
mod profile_editor;

pub use navigation::NavigationShell;
pub use persistent_store::{PersistentStore, SCHEMA_VERSION};
pub use profile_editor::{DangerAction, ProfileEditor};
