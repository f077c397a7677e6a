//! Pawtrail Core Library
//!
//! Pure business-logic core for a pet health app: merges the per-category
//! record collections the app fetches from its backend into one normalized
//! feed, and computes the calendar/display metrics the UI shows.
//!
//! # Architecture
//!
//! ```text
//! backend stores (vaccinations, medications, visits, weights, activity)
//!                          │
//!              already-fetched JSON rows, one Vec per store
//!                          │
//!                          ▼
//!              ┌───────────────────────────┐
//!              │    timeline::aggregate    │  date-field probing, stable IDs,
//!              │  dedup / filter / sort    │  skips counted, never thrown
//!              └─────────────┬─────────────┘
//!                            │
//!            ┌───────────────┼───────────────┐
//!            ▼               ▼               ▼
//!        dashboard       upcoming        passport
//!        summary           view           export
//!
//!        + derived metrics (age, due status, weight trend, body condition)
//! ```
//!
//! # Core Principle
//!
//! **Every operation is a pure function over explicit inputs.** No ambient
//! clock, no I/O, no shared state; "as of" is always a parameter.
//!
//! # Modules
//!
//! - [`models`]: Domain types (HealthEvent, Pet, store-row contracts)
//! - [`timeline`]: Feed aggregation, styling, dashboard, memoization
//! - [`metrics`]: Age, due-status, weight-trend, body-condition helpers
//! - [`export`]: Passport export for QR sharing

pub mod export;
pub mod metrics;
pub mod models;
pub mod timeline;

// Re-export commonly used types
pub use export::{ExportError, PassportEntry, PassportExport, PassportMetadata};
pub use metrics::{Age, DueStatus, TrendDirection, WeightReading, WeightTrend, WeightUnit};
pub use models::{
    ActivityRecord, Category, HealthEvent, MedicationRecord, Pet, VaccinationRecord, VisitRecord,
    WeightRecord,
};
pub use timeline::{
    aggregate, classify, AggregatedFeed, EventStyle, FeedError, FeedMemo, FeedOptions,
    FeedSources, SkipLog, SortDirection, SourceKind,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use chrono::{DateTime, NaiveDate, Utc};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PawtrailError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<FeedError> for PawtrailError {
    fn from(e: FeedError) -> Self {
        match e {
            FeedError::Json(err) => PawtrailError::SerializationError(err.to_string()),
            FeedError::InvalidDate(text) => PawtrailError::InvalidDate(text),
            FeedError::UnknownCategory(name) => {
                PawtrailError::InvalidInput(format!("unknown category: {}", name))
            }
        }
    }
}

impl From<ExportError> for PawtrailError {
    fn from(e: ExportError) -> Self {
        PawtrailError::SerializationError(e.to_string())
    }
}

impl From<serde_json::Error> for PawtrailError {
    fn from(e: serde_json::Error) -> Self {
        PawtrailError::SerializationError(e.to_string())
    }
}

// =========================================================================
// FFI Functions
// =========================================================================

/// Merge per-store JSON rows into one normalized feed.
///
/// `sources_json` is the object the app assembled from its store
/// responses, e.g. `{"vaccination": [...], "weight": [...]}`.
#[uniffi::export]
pub fn aggregate_feed(
    sources_json: String,
    options: FfiFeedOptions,
) -> Result<FfiAggregatedFeed, PawtrailError> {
    let sources: FeedSources = serde_json::from_str(&sources_json)?;
    let options = feed_options_from_ffi(options)?;
    Ok(aggregate(&sources, &options).into())
}

/// Future-dated obligations, soonest first.
#[uniffi::export]
pub fn upcoming_feed(
    sources_json: String,
    as_of: String,
    horizon_days: Option<u32>,
) -> Result<Vec<FfiHealthEvent>, PawtrailError> {
    let sources: FeedSources = serde_json::from_str(&sources_json)?;
    let as_of = parse_datetime_param(&as_of)?;
    Ok(timeline::upcoming(&sources, as_of, horizon_days)
        .into_iter()
        .map(|event| event.into())
        .collect())
}

/// Display style for a category name.
///
/// Unknown names fall back to the neutral style; `"activity"` resolves
/// through the optional activity sub-type.
#[uniffi::export]
pub fn classify_event(category: String, activity_type: Option<String>) -> FfiEventStyle {
    let category = match Category::parse(&category) {
        Some(found) => found,
        None if category.trim().eq_ignore_ascii_case("activity") => {
            timeline::activity_category(activity_type.as_deref())
        }
        None => Category::Other,
    };
    classify(category).into()
}

/// Whole-year/month age from a birth date.
#[uniffi::export]
pub fn compute_age(birth_date: String, as_of: String) -> Result<FfiAge, PawtrailError> {
    let birth = parse_date_param(&birth_date)?;
    let as_of = parse_date_param(&as_of)?;
    Ok(metrics::compute_age(birth, as_of).into())
}

/// Day-granular due status for an obligation.
#[uniffi::export]
pub fn compute_due_status(due_at: String, as_of: String) -> Result<FfiDueStatus, PawtrailError> {
    let due = parse_date_param(&due_at)?;
    let as_of = parse_date_param(&as_of)?;
    Ok(metrics::compute_due_status(due, as_of).into())
}

/// Weight trend between two readings, normalizing units.
///
/// An unrecognized unit yields the unknown trend rather than an error.
#[uniffi::export]
pub fn compute_weight_trend(
    previous: FfiWeightReading,
    current: FfiWeightReading,
) -> FfiWeightTrend {
    match (previous.into_reading(), current.into_reading()) {
        (Some(previous), Some(current)) => {
            metrics::compute_weight_trend(&previous, &current).into()
        }
        _ => WeightTrend {
            percent_change: None,
            direction: TrendDirection::Unknown,
        }
        .into(),
    }
}

/// Label for a 1-9 body condition score (out-of-range scores clamp).
#[uniffi::export]
pub fn body_condition_label(score: i32) -> String {
    metrics::body_condition_label(score).to_string()
}

/// Dashboard summary for one pet.
#[uniffi::export]
pub fn dashboard_summary(
    pet_json: String,
    sources_json: String,
    as_of: String,
) -> Result<FfiDashboardSummary, PawtrailError> {
    let pet: Pet = serde_json::from_str(&pet_json)?;
    let sources: FeedSources = serde_json::from_str(&sources_json)?;
    let as_of = parse_datetime_param(&as_of)?;
    Ok(timeline::dashboard_summary(&pet, &sources, as_of).into())
}

/// Passport document as pretty JSON.
#[uniffi::export]
pub fn export_passport_json(
    pet_json: String,
    sources_json: String,
    exported_at: String,
) -> Result<String, PawtrailError> {
    let passport = build_passport(&pet_json, &sources_json, &exported_at)?;
    Ok(passport.to_json()?)
}

/// Passport document as CSV.
#[uniffi::export]
pub fn export_passport_csv(
    pet_json: String,
    sources_json: String,
    exported_at: String,
) -> Result<String, PawtrailError> {
    let passport = build_passport(&pet_json, &sources_json, &exported_at)?;
    Ok(passport.to_csv())
}

fn build_passport(
    pet_json: &str,
    sources_json: &str,
    exported_at: &str,
) -> Result<PassportExport, PawtrailError> {
    let pet: Pet = serde_json::from_str(pet_json)?;
    let sources: FeedSources = serde_json::from_str(sources_json)?;
    let exported_at = parse_datetime_param(exported_at)?;
    let feed = aggregate(&sources, &FeedOptions::default());
    Ok(PassportExport::from_feed(&pet, &feed.events, exported_at)?)
}

// =========================================================================
// FFI Parameter Parsing
// =========================================================================

fn parse_date_param(text: &str) -> Result<NaiveDate, PawtrailError> {
    if let Ok(date) = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d") {
        return Ok(date);
    }
    timeline::parse_date_str(text)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| PawtrailError::InvalidDate(text.to_string()))
}

fn parse_datetime_param(text: &str) -> Result<DateTime<Utc>, PawtrailError> {
    timeline::parse_date_str(text).ok_or_else(|| PawtrailError::InvalidDate(text.to_string()))
}

fn feed_options_from_ffi(options: FfiFeedOptions) -> Result<FeedOptions, PawtrailError> {
    let mut exclude_categories = Vec::with_capacity(options.exclude_categories.len());
    for name in options.exclude_categories {
        let category = Category::parse(&name)
            .ok_or_else(|| FeedError::UnknownCategory(name.clone()))?;
        exclude_categories.push(category);
    }

    let since = options
        .since
        .as_deref()
        .map(parse_datetime_param)
        .transpose()?;
    let until = options
        .until
        .as_deref()
        .map(parse_datetime_param)
        .transpose()?;

    Ok(FeedOptions {
        exclude_categories,
        since,
        until,
        sort: if options.ascending {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        },
    })
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe feed entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHealthEvent {
    pub id: String,
    pub category: String,
    pub title: String,
    pub description: Option<String>,
    pub occurred_at: String,
    pub due_at: Option<String>,
    pub pet_id: Option<String>,
    pub payload_json: String,
}

impl From<HealthEvent> for FfiHealthEvent {
    fn from(event: HealthEvent) -> Self {
        Self {
            id: event.id,
            category: event.category.as_str().to_string(),
            title: event.title,
            description: event.description,
            occurred_at: event.occurred_at.to_rfc3339(),
            due_at: event.due_at.map(|due| due.to_rfc3339()),
            pet_id: event.pet_id,
            payload_json: event.payload.to_string(),
        }
    }
}

/// FFI-safe aggregation options.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFeedOptions {
    pub exclude_categories: Vec<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub ascending: bool,
}

/// FFI-safe skip count for one store.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSkipCount {
    pub source: String,
    pub count: u32,
}

/// FFI-safe aggregated feed.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAggregatedFeed {
    pub events: Vec<FfiHealthEvent>,
    pub skipped: Vec<FfiSkipCount>,
    pub skipped_total: u32,
}

impl From<AggregatedFeed> for FfiAggregatedFeed {
    fn from(feed: AggregatedFeed) -> Self {
        Self {
            skipped: feed
                .skipped
                .by_source()
                .map(|(kind, count)| FfiSkipCount {
                    source: kind.as_str().to_string(),
                    count,
                })
                .collect(),
            skipped_total: feed.skipped.total(),
            events: feed.events.into_iter().map(|event| event.into()).collect(),
        }
    }
}

/// FFI-safe style descriptor.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiEventStyle {
    pub icon: String,
    pub color: String,
    pub label: String,
}

impl From<EventStyle> for FfiEventStyle {
    fn from(style: EventStyle) -> Self {
        Self {
            icon: style.icon.to_string(),
            color: style.color.to_string(),
            label: style.label.to_string(),
        }
    }
}

/// FFI-safe age.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAge {
    pub years: u32,
    pub months: u32,
}

impl From<Age> for FfiAge {
    fn from(age: Age) -> Self {
        Self {
            years: age.years,
            months: age.months,
        }
    }
}

/// FFI-safe due status.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDueStatus {
    pub is_overdue: bool,
    pub days_until_due: Option<u32>,
    pub days_overdue: Option<u32>,
}

impl From<DueStatus> for FfiDueStatus {
    fn from(status: DueStatus) -> Self {
        Self {
            is_overdue: status.is_overdue,
            days_until_due: status.days_until_due,
            days_overdue: status.days_overdue,
        }
    }
}

/// FFI-safe weight reading.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiWeightReading {
    pub value: f64,
    pub unit: String,
}

impl FfiWeightReading {
    fn into_reading(self) -> Option<WeightReading> {
        let unit = WeightUnit::parse(&self.unit)?;
        Some(WeightReading {
            value: self.value,
            unit,
        })
    }
}

impl From<WeightReading> for FfiWeightReading {
    fn from(reading: WeightReading) -> Self {
        Self {
            value: reading.value,
            unit: reading.unit.as_str().to_string(),
        }
    }
}

/// FFI-safe weight trend.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiWeightTrend {
    pub percent_change: Option<f64>,
    pub direction: String,
}

impl From<WeightTrend> for FfiWeightTrend {
    fn from(trend: WeightTrend) -> Self {
        Self {
            percent_change: trend.percent_change,
            direction: trend.direction.as_str().to_string(),
        }
    }
}

/// FFI-safe per-category count.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCategoryCount {
    pub category: String,
    pub count: u32,
}

/// FFI-safe next-due obligation.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNextDue {
    pub event_id: String,
    pub category: String,
    pub title: String,
    pub due_at: String,
    pub status: FfiDueStatus,
}

impl From<timeline::NextDue> for FfiNextDue {
    fn from(next: timeline::NextDue) -> Self {
        Self {
            event_id: next.event_id,
            category: next.category.as_str().to_string(),
            title: next.title,
            due_at: next.due_at.to_rfc3339(),
            status: next.status.into(),
        }
    }
}

/// FFI-safe dashboard summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDashboardSummary {
    pub pet_name: String,
    pub age: Option<FfiAge>,
    pub counts: Vec<FfiCategoryCount>,
    pub latest_weight: Option<FfiWeightReading>,
    pub weight_trend: Option<FfiWeightTrend>,
    pub next_due: Option<FfiNextDue>,
    pub skipped_total: u32,
}

impl From<timeline::DashboardSummary> for FfiDashboardSummary {
    fn from(summary: timeline::DashboardSummary) -> Self {
        Self {
            pet_name: summary.pet_name,
            age: summary.age.map(|age| age.into()),
            counts: summary
                .counts
                .into_iter()
                .map(|(category, count)| FfiCategoryCount {
                    category: category.as_str().to_string(),
                    count,
                })
                .collect(),
            latest_weight: summary.latest_weight.map(|reading| reading.into()),
            weight_trend: summary.weight_trend.map(|trend| trend.into()),
            next_due: summary.next_due.map(|next| next.into()),
            skipped_total: summary.skipped.total(),
        }
    }
}
