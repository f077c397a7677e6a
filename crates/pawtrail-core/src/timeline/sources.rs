//! Source-row normalization.
//!
//! Raw rows arrive as loosely-shaped JSON from the backend stores. Each
//! store declares its candidate date fields in priority order; one
//! generic probe takes the first present, non-null value and parses it.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::metrics::{WeightReading, WeightUnit};
use crate::models::{Category, HealthEvent};

use super::style::activity_category;

/// Namespace for deterministic feed-entry IDs.
const FEED_ID_NAMESPACE: Uuid = Uuid::from_u128(0x5f1d_b0aa_3c7e_4b2f_9d84_a2c6_e01b_7743);

/// A per-pet record store feeding the aggregator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Vaccination,
    Medication,
    Visit,
    Weight,
    Activity,
}

impl SourceKind {
    /// All stores, in the order they are merged.
    pub const ALL: [SourceKind; 5] = [
        SourceKind::Vaccination,
        SourceKind::Medication,
        SourceKind::Visit,
        SourceKind::Weight,
        SourceKind::Activity,
    ];

    /// Canonical lowercase name, matching the sources-mapping keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Vaccination => "vaccination",
            SourceKind::Medication => "medication",
            SourceKind::Visit => "visit",
            SourceKind::Weight => "weight",
            SourceKind::Activity => "activity",
        }
    }
}

/// Raw input collections, keyed by source store.
pub type FeedSources = BTreeMap<SourceKind, Vec<Value>>;

/// Why a row was dropped during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SkipReason {
    MissingDate,
    UnparseableDate,
    DueBeforeOccurred,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::MissingDate => "no candidate date field present",
            SkipReason::UnparseableDate => "unparseable date value",
            SkipReason::DueBeforeOccurred => "due date precedes record date",
        };
        f.write_str(text)
    }
}

/// Field-probing configuration for one store.
struct SourceSpec {
    /// Candidate fields for the record date, in priority order
    date_fields: &'static [&'static str],
    /// Candidate fields for a future-dated obligation
    due_fields: &'static [&'static str],
    /// Candidate fields for the display title
    title_fields: &'static [&'static str],
    /// Candidate fields for the subtitle
    description_fields: &'static [&'static str],
    /// Title when no candidate field is present
    fallback_title: &'static str,
}

static VACCINATION_SPEC: SourceSpec = SourceSpec {
    date_fields: &["date_given", "created_at"],
    due_fields: &["next_due_date"],
    title_fields: &["vaccine_name"],
    description_fields: &["notes"],
    fallback_title: "Vaccination",
};

static MEDICATION_SPEC: SourceSpec = SourceSpec {
    date_fields: &["start_date", "created_at"],
    due_fields: &[],
    title_fields: &["medication_name"],
    description_fields: &["dosage", "frequency"],
    fallback_title: "Medication",
};

static VISIT_SPEC: SourceSpec = SourceSpec {
    date_fields: &["visit_date", "created_at"],
    due_fields: &[],
    title_fields: &["visit_type"],
    description_fields: &["clinic_name", "notes"],
    fallback_title: "Vet visit",
};

static WEIGHT_SPEC: SourceSpec = SourceSpec {
    date_fields: &["recorded_at", "created_at"],
    due_fields: &[],
    title_fields: &[],
    description_fields: &[],
    fallback_title: "Weight recorded",
};

static ACTIVITY_SPEC: SourceSpec = SourceSpec {
    date_fields: &["timestamp", "created_at"],
    due_fields: &[],
    title_fields: &["title"],
    description_fields: &["description"],
    fallback_title: "Activity",
};

fn spec_for(kind: SourceKind) -> &'static SourceSpec {
    match kind {
        SourceKind::Vaccination => &VACCINATION_SPEC,
        SourceKind::Medication => &MEDICATION_SPEC,
        SourceKind::Visit => &VISIT_SPEC,
        SourceKind::Weight => &WEIGHT_SPEC,
        SourceKind::Activity => &ACTIVITY_SPEC,
    }
}

/// Normalize one raw row into a feed entry.
pub(crate) fn normalize_row(kind: SourceKind, row: &Value) -> Result<HealthEvent, SkipReason> {
    let spec = spec_for(kind);

    let occurred_at = match first_present(row, spec.date_fields) {
        Some(value) => parse_date_value(value).ok_or(SkipReason::UnparseableDate)?,
        None => return Err(SkipReason::MissingDate),
    };

    let due_at = match first_present(row, spec.due_fields) {
        Some(value) => Some(parse_date_value(value).ok_or(SkipReason::UnparseableDate)?),
        None => None,
    };
    if let Some(due) = due_at {
        if due < occurred_at {
            return Err(SkipReason::DueBeforeOccurred);
        }
    }

    let category = match kind {
        SourceKind::Vaccination => Category::Vaccination,
        SourceKind::Medication => Category::Medication,
        SourceKind::Visit => Category::Visit,
        SourceKind::Weight => Category::Weight,
        SourceKind::Activity => {
            activity_category(row.get("type").and_then(Value::as_str))
        }
    };

    let title = match kind {
        // Weight entries are titled by their reading when one is usable.
        SourceKind::Weight => weight_reading(row)
            .map(|r| format!("{} {}", r.value, r.unit.as_str()))
            .unwrap_or_else(|| spec.fallback_title.to_string()),
        _ => first_string(row, spec.title_fields)
            .unwrap_or_else(|| spec.fallback_title.to_string()),
    };

    Ok(HealthEvent {
        id: event_id(kind, row),
        category,
        title,
        description: first_string(row, spec.description_fields),
        occurred_at,
        due_at,
        pet_id: row
            .get("pet_id")
            .and_then(Value::as_str)
            .map(str::to_string),
        payload: row.clone(),
    })
}

/// First present, non-null candidate field.
fn first_present<'a>(row: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .filter_map(|field| row.get(field))
        .find(|value| !value.is_null())
}

/// First present, non-empty string candidate field.
fn first_string(row: &Value, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .filter_map(|field| row.get(field))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse a backend date value: RFC 3339, `YYYY-MM-DDTHH:MM:SS(.fff)`
/// without an offset, or a bare `YYYY-MM-DD` (midnight UTC).
pub(crate) fn parse_date_value(value: &Value) -> Option<DateTime<Utc>> {
    value.as_str().and_then(parse_date_str)
}

pub(crate) fn parse_date_str(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }
    None
}

/// Extract a weight reading from a weight-store row.
///
/// Non-numeric or non-positive values are treated as absent rather than
/// propagated; a missing or unrecognized unit defaults to kilograms.
pub fn weight_reading(row: &Value) -> Option<WeightReading> {
    let value = row.get("weight")?.as_f64()?;
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    let unit = row
        .get("unit")
        .and_then(Value::as_str)
        .and_then(WeightUnit::parse)
        .unwrap_or(WeightUnit::Kg);
    Some(WeightReading { value, unit })
}

/// Deterministic entry ID: UUIDv5 over the store name and the row's own
/// ID, so the same source record maps to the same entry on every pass.
/// Rows without a usable ID fall back to a content hash of the row.
fn event_id(kind: SourceKind, row: &Value) -> String {
    let source_ref = match row.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => hex::encode(Sha256::digest(row.to_string().as_bytes())),
    };
    let name = format!("{}:{}", kind.as_str(), source_ref);
    Uuid::new_v5(&FEED_ID_NAMESPACE, name.as_bytes()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_probe_uses_first_present_field() {
        let row = json!({
            "id": "v-1",
            "visit_type": "checkup",
            "visit_date": "2024-02-01",
            "created_at": "2024-02-03T09:00:00Z",
        });
        let event = normalize_row(SourceKind::Visit, &row).unwrap();
        assert_eq!(event.occurred_at.date_naive().to_string(), "2024-02-01");
    }

    #[test]
    fn test_probe_falls_through_null() {
        let row = json!({
            "id": "v-2",
            "visit_type": "surgery",
            "visit_date": null,
            "created_at": "2024-02-03T09:00:00Z",
        });
        let event = normalize_row(SourceKind::Visit, &row).unwrap();
        assert_eq!(event.occurred_at.date_naive().to_string(), "2024-02-03");
    }

    #[test]
    fn test_missing_all_date_fields() {
        let row = json!({"id": "v-3", "visit_type": "checkup"});
        assert_eq!(
            normalize_row(SourceKind::Visit, &row),
            Err(SkipReason::MissingDate)
        );
    }

    #[test]
    fn test_unparseable_date_skips_row() {
        let row = json!({"id": "v-4", "visit_type": "checkup", "visit_date": "soon"});
        assert_eq!(
            normalize_row(SourceKind::Visit, &row),
            Err(SkipReason::UnparseableDate)
        );
    }

    #[test]
    fn test_first_present_unparseable_does_not_fall_through() {
        // The probe commits to the first present value; a later valid
        // field does not rescue the row.
        let row = json!({
            "id": "v-5",
            "visit_type": "checkup",
            "visit_date": "not a date",
            "created_at": "2024-02-03T09:00:00Z",
        });
        assert_eq!(
            normalize_row(SourceKind::Visit, &row),
            Err(SkipReason::UnparseableDate)
        );
    }

    #[test]
    fn test_due_before_occurred_skips_row() {
        let row = json!({
            "id": "vax-1",
            "vaccine_name": "Rabies",
            "date_given": "2024-05-01",
            "next_due_date": "2024-01-01",
        });
        assert_eq!(
            normalize_row(SourceKind::Vaccination, &row),
            Err(SkipReason::DueBeforeOccurred)
        );
    }

    #[test]
    fn test_vaccination_row_carries_due_date() {
        let row = json!({
            "id": "vax-2",
            "vaccine_name": "Rabies",
            "date_given": "2024-01-10",
            "next_due_date": "2025-01-10",
            "notes": "booster",
        });
        let event = normalize_row(SourceKind::Vaccination, &row).unwrap();
        assert_eq!(event.category, Category::Vaccination);
        assert_eq!(event.title, "Rabies");
        assert_eq!(event.description.as_deref(), Some("booster"));
        assert!(event.due_at.is_some());
    }

    #[test]
    fn test_weight_row_title_from_reading() {
        let row = json!({
            "id": "w-1",
            "weight": 7.5,
            "unit": "kg",
            "recorded_at": "2024-03-01",
        });
        let event = normalize_row(SourceKind::Weight, &row).unwrap();
        assert_eq!(event.title, "7.5 kg");
        assert_eq!(event.category, Category::Weight);
    }

    #[test]
    fn test_weight_row_bad_value_falls_back() {
        let row = json!({
            "id": "w-2",
            "weight": "heavy",
            "unit": "kg",
            "recorded_at": "2024-03-01",
        });
        let event = normalize_row(SourceKind::Weight, &row).unwrap();
        assert_eq!(event.title, "Weight recorded");
        assert!(weight_reading(&row).is_none());
    }

    #[test]
    fn test_activity_type_steers_category() {
        let document = json!({
            "id": "a-1", "type": "document", "title": "Lab results",
            "timestamp": "2024-04-01T10:00:00Z",
        });
        let update = json!({
            "id": "a-2", "type": "update", "title": "Profile updated",
            "timestamp": "2024-04-02T10:00:00Z",
        });
        let walk = json!({
            "id": "a-3", "type": "walk", "title": "Morning walk",
            "timestamp": "2024-04-03T10:00:00Z",
        });
        assert_eq!(
            normalize_row(SourceKind::Activity, &document).unwrap().category,
            Category::Document
        );
        assert_eq!(
            normalize_row(SourceKind::Activity, &update).unwrap().category,
            Category::Update
        );
        assert_eq!(
            normalize_row(SourceKind::Activity, &walk).unwrap().category,
            Category::Other
        );
    }

    #[test]
    fn test_event_id_stable_across_calls() {
        let row = json!({"id": "vax-1", "vaccine_name": "Rabies", "date_given": "2024-01-10"});
        let a = normalize_row(SourceKind::Vaccination, &row).unwrap();
        let b = normalize_row(SourceKind::Vaccination, &row).unwrap();
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_event_id_distinct_across_stores() {
        // The same row ID in two stores must not collide in the feed.
        let row = json!({"id": "1", "title": "x", "timestamp": "2024-01-01"});
        let activity = event_id(SourceKind::Activity, &row);
        let visit = event_id(SourceKind::Visit, &row);
        assert_ne!(activity, visit);
    }

    #[test]
    fn test_event_id_without_row_id_uses_content() {
        let row_a = json!({"vaccine_name": "Rabies", "date_given": "2024-01-10"});
        let row_b = json!({"vaccine_name": "Lepto", "date_given": "2024-01-10"});
        let a1 = event_id(SourceKind::Vaccination, &row_a);
        let a2 = event_id(SourceKind::Vaccination, &row_a);
        let b = event_id(SourceKind::Vaccination, &row_b);
        assert_eq!(a1, a2);
        assert_ne!(a1, b);
    }

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date_str("2024-01-10").is_some());
        assert!(parse_date_str("2024-01-10T12:30:00Z").is_some());
        assert!(parse_date_str("2024-01-10T12:30:00+02:00").is_some());
        assert!(parse_date_str("2024-01-10T12:30:00.250").is_some());
        assert!(parse_date_str("10/01/2024").is_none());
        assert!(parse_date_str("").is_none());
    }

    #[test]
    fn test_numeric_row_id() {
        let row = json!({"id": 42, "visit_type": "checkup", "visit_date": "2024-02-01"});
        let event = normalize_row(SourceKind::Visit, &row).unwrap();
        assert_eq!(event.id, event_id(SourceKind::Visit, &row));
    }
}
