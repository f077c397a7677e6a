//! Dashboard summary projection.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::{compute_due_status, compute_weight_trend, Age, DueStatus, WeightReading, WeightTrend};
use crate::models::{Category, HealthEvent, Pet};

use super::{aggregate, weight_reading, FeedOptions, FeedSources, SkipLog, SortDirection};

/// The next future-dated obligation on the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextDue {
    pub event_id: String,
    pub category: Category,
    pub title: String,
    pub due_at: DateTime<Utc>,
    pub status: DueStatus,
}

/// Everything the dashboard header shows, built in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub pet_name: String,
    pub age: Option<Age>,
    /// Event counts per display category
    pub counts: BTreeMap<Category, u32>,
    pub latest_weight: Option<WeightReading>,
    /// Trend from the previous reading to the latest one
    pub weight_trend: Option<WeightTrend>,
    pub next_due: Option<NextDue>,
    pub skipped: SkipLog,
}

/// Build the dashboard summary for one pet from its raw collections.
///
/// `as_of` fixes both the age computation and which obligation counts
/// as "next"; it is never read from the system clock.
pub fn dashboard_summary(
    pet: &Pet,
    sources: &FeedSources,
    as_of: DateTime<Utc>,
) -> DashboardSummary {
    let feed = aggregate(
        sources,
        &FeedOptions {
            sort: SortDirection::Asc,
            ..FeedOptions::default()
        },
    );

    let mut counts = BTreeMap::new();
    for event in &feed.events {
        *counts.entry(event.category).or_insert(0) += 1;
    }

    // Feed is ascending, so the last two usable readings are
    // previous/latest regardless of input order.
    let readings: Vec<WeightReading> = feed
        .events
        .iter()
        .filter(|event| event.category == Category::Weight)
        .filter_map(|event| weight_reading(&event.payload))
        .collect();
    let latest_weight = readings.last().copied();
    let weight_trend = match readings.len() {
        n if n >= 2 => Some(compute_weight_trend(&readings[n - 2], &readings[n - 1])),
        _ => None,
    };

    let today = as_of.date_naive();
    let next_due = feed
        .events
        .iter()
        .filter_map(|event| event.due_at.map(|due| (event, due)))
        .filter(|(_, due)| due.date_naive() >= today)
        .min_by(|(a, due_a), (b, due_b)| due_a.cmp(due_b).then_with(|| a.id.cmp(&b.id)))
        .map(|(event, due)| NextDue {
            event_id: event.id.clone(),
            category: event.category,
            title: event.title.clone(),
            due_at: due,
            status: compute_due_status(due.date_naive(), today),
        });

    DashboardSummary {
        pet_name: pet.display_name().to_string(),
        age: pet.age(today),
        counts,
        latest_weight,
        weight_trend,
        next_due,
        skipped: feed.skipped,
    }
}
