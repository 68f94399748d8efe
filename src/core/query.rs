use serde::{Deserialize, Serialize};

use crate::matching::normalize_imprint;

/// A user's search input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PillQuery {
    /// Imprint as typed; required
    pub imprint: String,

    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub shape: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl PillQuery {
    pub fn new(imprint: impl Into<String>) -> Self {
        Self {
            imprint: imprint.into(),
            color: None,
            shape: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = non_blank(Some(color.into()));
        self
    }

    pub fn with_shape(mut self, shape: impl Into<String>) -> Self {
        self.shape = non_blank(Some(shape.into()));
        self
    }

    /// Trim every field and drop blank filters
    pub fn trimmed(self) -> Self {
        Self {
            imprint: self.imprint.trim().to_string(),
            color: non_blank(self.color),
            shape: non_blank(self.shape),
        }
    }

    /// Same imprint without color/shape filters
    pub fn imprint_only(&self) -> Self {
        Self::new(self.imprint.clone())
    }

    pub fn normalized_imprint(&self) -> String {
        normalize_imprint(&self.imprint)
    }

    /// The imprint normalizes to something searchable
    pub fn is_searchable(&self) -> bool {
        !self.normalized_imprint().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed_drops_blank_filters() {
        let query = PillQuery {
            imprint: "  L 484 ".to_string(),
            color: Some("  ".to_string()),
            shape: Some(" Round ".to_string()),
        }
        .trimmed();

        assert_eq!(query.imprint, "L 484");
        assert_eq!(query.color, None);
        assert_eq!(query.shape.as_deref(), Some("Round"));
        assert_eq!(query.normalized_imprint(), "L484");
    }

    #[test]
    fn test_is_searchable() {
        assert!(PillQuery::new("m367").is_searchable());
        assert!(!PillQuery::new("   ").is_searchable());
        assert!(!PillQuery::new("--").is_searchable());
    }

    #[test]
    fn test_imprint_only() {
        let query = PillQuery::new("L484").with_color("White").with_shape("");
        assert_eq!(query.shape, None);
        let bare = query.imprint_only();
        assert_eq!(bare.imprint, "L484");
        assert_eq!(bare.color, None);
    }
}
