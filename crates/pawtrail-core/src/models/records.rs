//! Typed row contracts for the external record stores.
//!
//! The aggregator consumes loosely-shaped JSON rows, which is what the
//! hosted backend hands the app. These structs are the typed contracts
//! for Rust callers; `into_row` converts each into the raw row shape.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Row shape of the vaccination store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VaccinationRecord {
    pub id: String,
    pub vaccine_name: String,
    /// Date administered (RFC 3339 or `YYYY-MM-DD`)
    pub date_given: String,
    /// Next due date for boosters, if scheduled
    pub next_due_date: Option<String>,
    pub notes: Option<String>,
}

impl VaccinationRecord {
    /// Convert into the raw row shape the aggregator consumes.
    pub fn into_row(self) -> Value {
        json!({
            "id": self.id,
            "vaccine_name": self.vaccine_name,
            "date_given": self.date_given,
            "next_due_date": self.next_due_date,
            "notes": self.notes,
        })
    }
}

/// Row shape of the medication store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationRecord {
    pub id: String,
    pub medication_name: String,
    /// First administration date
    pub start_date: String,
    /// Dose description (e.g., "5 mg")
    pub dosage: Option<String>,
    /// Administration frequency (e.g., "twice daily")
    pub frequency: Option<String>,
}

impl MedicationRecord {
    /// Convert into the raw row shape the aggregator consumes.
    pub fn into_row(self) -> Value {
        json!({
            "id": self.id,
            "medication_name": self.medication_name,
            "start_date": self.start_date,
            "dosage": self.dosage,
            "frequency": self.frequency,
        })
    }
}

/// Row shape of the visit store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisitRecord {
    pub id: String,
    /// Visit kind (e.g., "checkup", "surgery")
    pub visit_type: String,
    pub visit_date: String,
    pub clinic_name: Option<String>,
    pub notes: Option<String>,
}

impl VisitRecord {
    /// Convert into the raw row shape the aggregator consumes.
    pub fn into_row(self) -> Value {
        json!({
            "id": self.id,
            "visit_type": self.visit_type,
            "visit_date": self.visit_date,
            "clinic_name": self.clinic_name,
            "notes": self.notes,
        })
    }
}

/// Row shape of the weight store. Rows arrive chronologically unordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightRecord {
    pub id: String,
    pub weight: f64,
    /// Measurement unit ("kg" or "lb")
    pub unit: String,
    pub recorded_at: String,
}

impl WeightRecord {
    /// Convert into the raw row shape the aggregator consumes.
    ///
    /// A non-finite weight becomes JSON null, so the reading is treated
    /// as absent downstream rather than leaking NaN into the feed.
    pub fn into_row(self) -> Value {
        json!({
            "id": self.id,
            "weight": self.weight,
            "unit": self.unit,
            "recorded_at": self.recorded_at,
        })
    }
}

/// Row shape of the generic activity log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityRecord {
    pub id: String,
    /// Sub-type steering display category ("document", "update", ...)
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: Option<String>,
    pub timestamp: String,
}

impl ActivityRecord {
    /// Convert into the raw row shape the aggregator consumes.
    pub fn into_row(self) -> Value {
        json!({
            "id": self.id,
            "type": self.kind,
            "title": self.title,
            "description": self.description,
            "timestamp": self.timestamp,
        })
    }
}
