use serde::{Deserialize, Serialize};

/// Placeholder for a string field whose element was not found on the page
pub const NOT_AVAILABLE: &str = "N/A";

/// One catalog item as extracted from its detail page
///
/// Every field is always present. Missing strings hold [`NOT_AVAILABLE`],
/// missing genres are an empty list. `rating` and `total_ratings` are
/// absent-capable values, serialized as `null` when the site provides none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub title: String,
    pub cover_url: String,
    pub description: String,
    pub genres: Vec<String>,
    pub rating: Option<f64>,
    pub total_ratings: Option<u64>,
    pub source_url: String,
}

impl DetailRecord {
    /// Creates a record with every field at its placeholder value
    pub fn empty(source_url: impl Into<String>) -> Self {
        Self {
            title: NOT_AVAILABLE.to_string(),
            cover_url: NOT_AVAILABLE.to_string(),
            description: NOT_AVAILABLE.to_string(),
            genres: Vec::new(),
            rating: None,
            total_ratings: None,
            source_url: source_url.into(),
        }
    }

    pub fn has_title(&self) -> bool {
        self.title != NOT_AVAILABLE
    }

    pub fn has_cover(&self) -> bool {
        self.cover_url != NOT_AVAILABLE
    }

    pub fn has_description(&self) -> bool {
        self.description != NOT_AVAILABLE
    }

    /// Returns true if any field fell back to its placeholder
    pub fn is_partial(&self) -> bool {
        !self.has_title() || !self.has_cover() || !self.has_description() || self.genres.is_empty()
    }
}

/// Returns `value`, or the placeholder when it is `None`
pub fn or_not_available(value: Option<String>) -> String {
    value.unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
