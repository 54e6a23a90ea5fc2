//! Catalog identifiers for books.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Identifier of a book in the catalog (e.g. `/works/OL45804W`).
///
/// Catalog records without a key get a locally generated placeholder, which
/// is unique enough for a single browsing session but means nothing to the
/// catalog itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BookKey(String);

impl BookKey {
    /// Prefix carried by every generated placeholder key.
    pub const PLACEHOLDER_PREFIX: &'static str = "local:";

    /// Wrap a key supplied by the catalog.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Generate a placeholder key for a record the catalog did not key.
    #[must_use]
    pub fn placeholder() -> Self {
        Self(format!("{}{}", Self::PLACEHOLDER_PREFIX, Uuid::new_v4()))
    }

    /// Whether this key was generated locally rather than by the catalog.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.0.starts_with(Self::PLACEHOLDER_PREFIX)
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for BookKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

// Older stored carts used a random number as the placeholder key.
impl<'de> Deserialize<'de> for BookKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(key) => Self(key),
            Raw::Number(n) => Self(format!("{}{n}", Self::PLACEHOLDER_PREFIX)),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_distinct() {
        let a = BookKey::placeholder();
        let b = BookKey::placeholder();
        assert_ne!(a, b);
        assert!(a.is_placeholder());
    }

    #[test]
    fn test_catalog_key_is_not_placeholder() {
        assert!(!BookKey::new("/works/OL45804W").is_placeholder());
    }

    #[test]
    fn test_numeric_key_loads_as_placeholder() {
        let key: BookKey = serde_json::from_str("0.734").unwrap();
        assert!(key.is_placeholder());
        assert_eq!(key.as_str(), "local:0.734");
    }
}
