use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A named unit of generation capability a layer opts into.
///
/// Identity is the `id`. Display metadata travels with the value but takes
/// no part in equality or hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Feature {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            description: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The stable catalog key of this feature.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl PartialEq for Feature {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Feature {}

impl Hash for Feature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl From<&str> for Feature {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Feature {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_display_metadata() {
        let plain = Feature::new("metadata.git");
        let titled = Feature::new("metadata.git").with_title("Git");
        assert_eq!(plain, titled);
    }

    #[test]
    fn serializes_without_empty_metadata() {
        let json = serde_json::to_string(&Feature::new("a")).unwrap();
        assert_eq!(json, r#"{"id":"a"}"#);
    }
}
