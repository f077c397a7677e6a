//! Pet registry models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::metrics::{compute_age, Age};

/// A pet registry entry.
///
/// Health records reference pets by ID and live in their own stores; this
/// type is only used to resolve a display name and compute age.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pet {
    /// Registry ID
    pub id: String,
    /// Pet name
    pub name: String,
    /// Species (e.g., "dog", "cat")
    pub species: String,
    /// Breed
    #[serde(default)]
    pub breed: Option<String>,
    /// Date of birth
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// Owner/client name
    #[serde(default)]
    pub owner_name: Option<String>,
}

impl Pet {
    /// Create a new pet with required fields.
    pub fn new(name: String, species: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            species,
            breed: None,
            date_of_birth: None,
            owner_name: None,
        }
    }

    /// Display name, falling back when the registry entry has none.
    pub fn display_name(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            "Unnamed pet"
        } else {
            trimmed
        }
    }

    /// Whole-year/month age as of the given date, when a birth date is known.
    pub fn age(&self, as_of: NaiveDate) -> Option<Age> {
        self.date_of_birth.map(|birth| compute_age(birth, as_of))
    }
}
