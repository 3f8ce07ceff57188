//! Domain entity definitions.

mod credential;
mod message;
mod profile;
mod view;

pub use credential::ApiKey;
pub use message::{Message, MessageRole};
pub use profile::{
    DEFAULT_AVATAR_URL, DEFAULT_NAME, DEFAULT_PERSONALITY, INTEREST_CATALOG, UserProfile,
};
pub use view::AppView;
