//! Top-level view selection.

/// One of the mutually exclusive top-level views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppView {
    /// Text conversation.
    #[default]
    Chat,
    /// Voice call.
    Voice,
    /// Profile settings.
    Profile,
}

impl AppView {
    /// All views in navigation order.
    pub const ALL: [Self; 3] = [Self::Chat, Self::Voice, Self::Profile];

    /// Returns the label shown in navigation.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Chat => "Chat",
            Self::Voice => "Voice Call",
            Self::Profile => "Profile",
        }
    }

    /// Returns the following view, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Chat => Self::Voice,
            Self::Voice => Self::Profile,
            Self::Profile => Self::Chat,
        }
    }

    /// Returns the preceding view, wrapping around.
    #[must_use]
    pub const fn previous(self) -> Self {
        match self {
            Self::Chat => Self::Profile,
            Self::Voice => Self::Chat,
            Self::Profile => Self::Voice,
        }
    }
}

impl std::fmt::Display for AppView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
