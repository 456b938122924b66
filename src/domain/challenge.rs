//! Standalone coding challenges.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A challenge, looked up by its own slug
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    /// Unique challenge identifier (URL-safe)
    pub slug: String,

    /// Opaque challenge fields (title, language, requirements, ...)
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Challenge {
    /// Create a challenge with no metadata
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            metadata: Map::new(),
        }
    }

    /// Set an opaque metadata field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Title, when the content provides one
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_keeps_unknown_fields() {
        let json = r#"{"slug": "counter", "title": "Counter", "language": "typescript"}"#;
        let challenge: Challenge = serde_json::from_str(json).unwrap();

        assert_eq!(challenge.slug, "counter");
        assert_eq!(challenge.title(), Some("Counter"));
        assert_eq!(challenge.metadata["language"], "typescript");

        let back = serde_json::to_value(&challenge).unwrap();
        assert_eq!(back["language"], "typescript");
        assert_eq!(back["slug"], "counter");
    }
}
