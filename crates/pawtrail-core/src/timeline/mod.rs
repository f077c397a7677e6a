//! Health-feed aggregation.
//!
//! Merges the per-category record collections the app has already
//! fetched into one normalized, sorted feed, plus the projections built
//! on top of it: upcoming obligations, the dashboard summary, display
//! styling, and a memo cache for identical inputs.

mod dashboard;
mod memo;
mod sources;
mod style;

pub use dashboard::*;
pub use memo::*;
pub use sources::*;
pub use style::*;

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Category, HealthEvent};

/// Feed errors.
///
/// Aggregation never fails on bad rows (those are skipped and counted);
/// these arise only at real boundaries, such as unparseable input JSON
/// or date parameters.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

pub type FeedResult<T> = Result<T, FeedError>;

/// Sort order of the merged feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Options for one aggregation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedOptions {
    /// Categories to leave out of the feed
    #[serde(default)]
    pub exclude_categories: Vec<Category>,
    /// Inclusive lower bound on `occurred_at`
    #[serde(default)]
    pub since: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `occurred_at`
    #[serde(default)]
    pub until: Option<DateTime<Utc>>,
    /// Sort order (descending for history views)
    #[serde(default)]
    pub sort: SortDirection,
}

/// Per-store counts of rows dropped during normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipLog {
    counts: BTreeMap<SourceKind, u32>,
}

impl SkipLog {
    fn record(&mut self, kind: SourceKind) {
        *self.counts.entry(kind).or_insert(0) += 1;
    }

    /// Rows dropped from one store.
    pub fn count(&self, kind: SourceKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Rows dropped across all stores.
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Per-store counts, in stable store order.
    pub fn by_source(&self) -> impl Iterator<Item = (SourceKind, u32)> + '_ {
        self.counts.iter().map(|(kind, count)| (*kind, *count))
    }
}

/// One aggregated feed plus its skip diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedFeed {
    pub events: Vec<HealthEvent>,
    pub skipped: SkipLog,
}

/// Merge the per-category collections into one normalized feed.
///
/// Pure over its inputs: nothing is mutated, nothing is read from the
/// environment, and identical inputs yield an identical ordered feed.
/// Entries are deduplicated by ID (first occurrence wins), filtered by
/// the excluded categories and the inclusive `[since, until]` window,
/// then sorted by `occurred_at` with an ID-ascending tie-break.
/// Malformed rows are dropped and counted, never an error; empty input
/// yields an empty feed.
pub fn aggregate(sources: &FeedSources, options: &FeedOptions) -> AggregatedFeed {
    let mut skipped = SkipLog::default();
    let mut seen = HashSet::new();
    let mut events = Vec::new();

    for (kind, rows) in sources {
        for row in rows {
            match normalize_row(*kind, row) {
                Ok(event) => {
                    if seen.insert(event.id.clone()) {
                        events.push(event);
                    }
                }
                Err(reason) => {
                    tracing::warn!(source = kind.as_str(), %reason, "skipping record");
                    skipped.record(*kind);
                }
            }
        }
    }

    events.retain(|e| !options.exclude_categories.contains(&e.category));
    if let Some(since) = options.since {
        events.retain(|e| e.occurred_at >= since);
    }
    if let Some(until) = options.until {
        events.retain(|e| e.occurred_at <= until);
    }

    sort_events(&mut events, options.sort);

    AggregatedFeed { events, skipped }
}

fn sort_events(events: &mut [HealthEvent], direction: SortDirection) {
    events.sort_by(|a, b| {
        let by_time = match direction {
            SortDirection::Asc => a.occurred_at.cmp(&b.occurred_at),
            SortDirection::Desc => b.occurred_at.cmp(&a.occurred_at),
        };
        by_time.then_with(|| a.id.cmp(&b.id))
    });
}

/// Future-dated obligations, soonest first.
///
/// Keeps entries whose due date falls on or after `as_of` (and within
/// `horizon_days` of it, when given), sorted ascending by due date with
/// the same ID tie-break as the main feed.
pub fn upcoming(
    sources: &FeedSources,
    as_of: DateTime<Utc>,
    horizon_days: Option<u32>,
) -> Vec<HealthEvent> {
    let today = as_of.date_naive();
    let mut events: Vec<HealthEvent> = aggregate(sources, &FeedOptions::default())
        .events
        .into_iter()
        .filter(|event| match event.due_at {
            Some(due) => {
                let days = due.date_naive().signed_duration_since(today).num_days();
                days >= 0 && horizon_days.map_or(true, |h| days <= i64::from(h))
            }
            None => false,
        })
        .collect();

    events.sort_by(|a, b| a.due_at.cmp(&b.due_at).then_with(|| a.id.cmp(&b.id)));
    events
}
