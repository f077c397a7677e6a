//! Pet passport export.
//!
//! The shareable document behind the app's QR passport: pet identity
//! plus the normalized feed, with a content digest so a receiver can
//! check what it scanned against what was shared.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::{Category, HealthEvent, Pet};

use super::ExportResult;

/// Passport document metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PassportMetadata {
    pub pet_id: String,
    pub pet_name: String,
    pub species: String,
    pub breed: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    /// Export timestamp, supplied by the caller
    pub exported_at: String,
    pub entry_count: usize,
    /// SHA-256 over the canonical JSON of the entries
    pub content_digest: String,
}

/// One passport entry. Raw payloads are deliberately not shared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PassportEntry {
    pub id: String,
    pub category: Category,
    pub title: String,
    pub description: Option<String>,
    pub occurred_at: String,
    pub due_at: Option<String>,
}

impl PassportEntry {
    fn from_event(event: &HealthEvent) -> Self {
        Self {
            id: event.id.clone(),
            category: event.category,
            title: event.title.clone(),
            description: event.description.clone(),
            occurred_at: event.occurred_at.to_rfc3339(),
            due_at: event.due_at.map(|due| due.to_rfc3339()),
        }
    }
}

/// A shareable pet passport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PassportExport {
    pub metadata: PassportMetadata,
    pub entries: Vec<PassportEntry>,
}

impl PassportExport {
    /// Build a passport from an aggregated feed.
    ///
    /// `exported_at` is an explicit parameter so the same feed exported
    /// at the same stamp produces the same document, digest included.
    pub fn from_feed(
        pet: &Pet,
        feed: &[HealthEvent],
        exported_at: DateTime<Utc>,
    ) -> ExportResult<Self> {
        let entries: Vec<PassportEntry> = feed.iter().map(PassportEntry::from_event).collect();

        let canonical = serde_json::to_string(&entries)?;
        let content_digest = hex::encode(Sha256::digest(canonical.as_bytes()));

        Ok(Self {
            metadata: PassportMetadata {
                pet_id: pet.id.clone(),
                pet_name: pet.display_name().to_string(),
                species: pet.species.clone(),
                breed: pet.breed.clone(),
                date_of_birth: pet.date_of_birth,
                exported_at: exported_at.to_rfc3339(),
                entry_count: entries.len(),
                content_digest,
            },
            entries,
        })
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("pet_id,pet_name,entry_id,category,title,description,occurred_at,due_at\n");

        // Lines
        for entry in &self.entries {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                escape_csv(&self.metadata.pet_id),
                escape_csv(&self.metadata.pet_name),
                escape_csv(&entry.id),
                entry.category.as_str(),
                escape_csv(&entry.title),
                escape_csv(entry.description.as_deref().unwrap_or("")),
                escape_csv(&entry.occurred_at),
                escape_csv(entry.due_at.as_deref().unwrap_or("")),
            ));
        }

        csv
    }
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
