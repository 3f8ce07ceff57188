mod confirm_dialog;
mod footer_bar;
mod help_popup;
mod input;
mod message_list;
mod sidebar;
mod status_bar;

pub use confirm_dialog::ConfirmDialog;
pub use footer_bar::{FooterBar, FooterBarStyle, footer_width};
pub use help_popup::HelpPopup;
pub use input::TextInput;
pub use message_list::MessageList;
pub use sidebar::{SIDEBAR_WIDTH, Sidebar};
pub use status_bar::{StatusBar, StatusLevel};
