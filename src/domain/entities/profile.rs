//! User profile entity.

use serde::{Deserialize, Serialize};

/// Display name used when nothing has been configured.
pub const DEFAULT_NAME: &str = "User";
/// Personality preference used when nothing has been configured.
pub const DEFAULT_PERSONALITY: &str = "Friendly";
/// Placeholder avatar shown until the user picks one.
pub const DEFAULT_AVATAR_URL: &str = "https://picsum.photos/200/200?random=1";

/// Interest tags offered by the profile screen.
pub const INTEREST_CATALOG: [&str; 8] = [
    "Gaming",
    "Anime",
    "Programming",
    "Cooking",
    "Fitness",
    "Music",
    "Travel",
    "Art",
];

/// Preferences that shape the companion's tone and topics.
///
/// `interests` behaves as a set: it never holds the same tag twice, and keeps
/// the order in which tags were added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    name: String,
    #[serde(default = "default_personality")]
    personality_preference: String,
    #[serde(default)]
    interests: Vec<String>,
    #[serde(default = "default_avatar_url")]
    avatar_url: String,
}

fn default_personality() -> String {
    DEFAULT_PERSONALITY.to_string()
}

fn default_avatar_url() -> String {
    DEFAULT_AVATAR_URL.to_string()
}

impl UserProfile {
    /// Creates a profile with explicit fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        personality_preference: impl Into<String>,
        interests: Vec<String>,
        avatar_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            personality_preference: personality_preference.into(),
            interests,
            avatar_url: avatar_url.into(),
        }
        .normalized()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn personality_preference(&self) -> &str {
        &self.personality_preference
    }

    #[must_use]
    pub fn interests(&self) -> &[String] {
        &self.interests
    }

    #[must_use]
    pub fn avatar_url(&self) -> &str {
        &self.avatar_url
    }

    /// Returns whether the tag is currently selected.
    #[must_use]
    pub fn has_interest(&self, tag: &str) -> bool {
        self.interests.iter().any(|i| i == tag)
    }

    /// Overwrites the display name. No validation is applied.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_personality_preference(&mut self, personality: impl Into<String>) {
        self.personality_preference = personality.into();
    }

    pub fn set_avatar_url(&mut self, url: impl Into<String>) {
        self.avatar_url = url.into();
    }

    /// Adds the tag if absent, removes it otherwise.
    ///
    /// Returns `true` when the tag ended up selected.
    pub fn toggle_interest(&mut self, tag: &str) -> bool {
        if let Some(index) = self.interests.iter().position(|i| i == tag) {
            self.interests.remove(index);
            false
        } else {
            self.interests.push(tag.to_string());
            true
        }
    }

    /// Restores invariants on data that did not come through the setters.
    ///
    /// Drops duplicate interests (first occurrence wins) and falls back to the
    /// default name when the stored one is blank.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let mut seen = Vec::with_capacity(self.interests.len());
        self.interests.retain(|tag| {
            if seen.contains(tag) {
                false
            } else {
                seen.push(tag.clone());
                true
            }
        });

        if self.name.trim().is_empty() {
            self.name = DEFAULT_NAME.to_string();
        }

        self
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            personality_preference: default_personality(),
            interests: Vec::new(),
            avatar_url: default_avatar_url(),
        }
    }
}
