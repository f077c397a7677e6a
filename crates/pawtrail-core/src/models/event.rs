//! Normalized feed entry models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Display category of a feed entry.
///
/// The five record stores map directly to the first five variants;
/// generic activity-log rows land in `Document`, `Update`, or `Other`
/// depending on their `type` field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Vaccination,
    Medication,
    Visit,
    Weight,
    Document,
    Update,
    Other,
}

impl Category {
    /// Canonical lowercase name, as it appears in serialized feeds.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Vaccination => "vaccination",
            Category::Medication => "medication",
            Category::Visit => "visit",
            Category::Weight => "weight",
            Category::Document => "document",
            Category::Update => "update",
            Category::Other => "other",
        }
    }

    /// Parse a canonical category name (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "vaccination" => Some(Category::Vaccination),
            "medication" => Some(Category::Medication),
            "visit" => Some(Category::Visit),
            "weight" => Some(Category::Weight),
            "document" => Some(Category::Document),
            "update" => Some(Category::Update),
            "other" => Some(Category::Other),
            _ => None,
        }
    }
}

/// A single normalized entry in the health feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthEvent {
    /// Opaque ID, unique within the feed and stable across re-aggregation
    pub id: String,
    /// Display category
    pub category: Category,
    /// Human-readable name of the underlying record
    pub title: String,
    /// Optional free-text subtitle
    pub description: Option<String>,
    /// When the event happened or was recorded; drives sort order
    pub occurred_at: DateTime<Utc>,
    /// Future-dated obligation (e.g. next vaccination), never before `occurred_at`
    pub due_at: Option<DateTime<Utc>>,
    /// Owning pet, when the source row carries one
    pub pet_id: Option<String>,
    /// Category-specific source data, passed through untouched
    pub payload: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_round_trip() {
        for category in [
            Category::Vaccination,
            Category::Medication,
            Category::Visit,
            Category::Weight,
            Category::Document,
            Category::Update,
            Category::Other,
        ] {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_category_parse_case_insensitive() {
        assert_eq!(Category::parse("Vaccination"), Some(Category::Vaccination));
        assert_eq!(Category::parse(" WEIGHT "), Some(Category::Weight));
        assert_eq!(Category::parse("grooming"), None);
    }

    #[test]
    fn test_category_serde_lowercase() {
        let json = serde_json::to_string(&Category::Visit).unwrap();
        assert_eq!(json, "\"visit\"");

        let parsed: Category = serde_json::from_str("\"weight\"").unwrap();
        assert_eq!(parsed, Category::Weight);
    }
}
