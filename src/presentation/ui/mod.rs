//! UI screens.

mod app;
mod chat_screen;
mod credential_screen;
mod profile_screen;
pub(crate) mod utils;
mod voice_screen;

pub use app::App;
pub use chat_screen::{ChatKeyResult, ChatScreen, ChatScreenState};
pub use credential_screen::{CredentialAction, CredentialScreen, CredentialState};
pub use profile_screen::{ProfileField, ProfileKeyResult, ProfileRow, ProfileScreen, ProfileScreenState};
pub use voice_screen::VoiceScreen;
