//! AI endpoint credential value object.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// API key granting access to the conversational AI endpoint.
///
/// The key is opaque: the only validation is that it is non-empty after
/// trimming. It never prints in full through `Debug` or `Display`, and its
/// memory is wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey {
    value: String,
}

impl ApiKey {
    /// Creates a key from user input, rejecting blank values.
    #[must_use]
    pub fn new(value: impl AsRef<str>) -> Option<Self> {
        let value = value.as_ref().trim();

        if value.is_empty() {
            return None;
        }

        Some(Self {
            value: value.to_string(),
        })
    }

    /// Returns key as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns masked key for display.
    #[must_use]
    pub fn masked(&self) -> String {
        let len = self.value.chars().count();
        if len <= 10 {
            return "*".repeat(len);
        }

        let prefix: String = self.value.chars().take(4).collect();
        let suffix: String = self.value.chars().skip(len - 4).collect();
        format!("{prefix}...{suffix}")
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("value", &self.masked())
            .finish()
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_KEY: &str = "AIzaSyD-EXAMPLE-KEY-0123456789abcdef";

    #[test]
    fn test_key_is_trimmed() {
        let key = ApiKey::new("  tok123\n").unwrap();
        assert_eq!(key.as_str(), "tok123");
    }

    #[test]
    fn test_blank_key_rejected() {
        assert!(ApiKey::new("").is_none());
        assert!(ApiKey::new("   \t").is_none());
    }

    #[test]
    fn test_short_key_fully_masked() {
        let key = ApiKey::new("tok123").unwrap();
        assert_eq!(key.masked(), "******");
    }

    #[test]
    fn test_long_key_masking() {
        let key = ApiKey::new(LONG_KEY).unwrap();
        let masked = key.masked();

        assert_eq!(masked, "AIza...cdef");
        assert!(!masked.contains(LONG_KEY));
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let key = ApiKey::new(LONG_KEY).unwrap();
        let debug_output = format!("{key:?}");

        assert!(!debug_output.contains(LONG_KEY));
    }
}
