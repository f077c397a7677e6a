//! Property tests for the feed invariants.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use serde_json::{json, Value};

use pawtrail_core::metrics::{
    body_condition_label, compute_weight_trend, WeightReading, WeightUnit,
};
use pawtrail_core::models::Category;
use pawtrail_core::timeline::{aggregate, FeedOptions, FeedSources, SortDirection, SourceKind};

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
}

fn visit_row(id: u32, day_offset: i64) -> Value {
    let date = epoch() + Duration::days(day_offset);
    json!({
        "id": format!("v-{id}"),
        "visit_type": "checkup",
        "visit_date": date.to_string(),
    })
}

fn weight_row(id: u32, day_offset: i64, value: f64) -> Value {
    let date = epoch() + Duration::days(day_offset);
    json!({
        "id": format!("w-{id}"),
        "weight": value,
        "unit": "kg",
        "recorded_at": date.to_string(),
    })
}

prop_compose! {
    fn arb_sources()(
        visits in prop::collection::vec((0u32..500, 0i64..730), 0..40),
        weights in prop::collection::vec((0u32..500, 0i64..730, 0.5f64..80.0), 0..20),
    ) -> FeedSources {
        let mut sources = FeedSources::new();
        sources.insert(
            SourceKind::Visit,
            visits.into_iter().map(|(id, day)| visit_row(id, day)).collect(),
        );
        sources.insert(
            SourceKind::Weight,
            weights.into_iter().map(|(id, day, value)| weight_row(id, day, value)).collect(),
        );
        sources
    }
}

proptest! {
    #[test]
    fn aggregation_is_idempotent(sources in arb_sources()) {
        let options = FeedOptions::default();
        prop_assert_eq!(aggregate(&sources, &options), aggregate(&sources, &options));
    }

    #[test]
    fn descending_feed_is_sorted(sources in arb_sources()) {
        let feed = aggregate(&sources, &FeedOptions::default());
        for pair in feed.events.windows(2) {
            prop_assert!(pair[0].occurred_at >= pair[1].occurred_at);
            if pair[0].occurred_at == pair[1].occurred_at {
                prop_assert!(pair[0].id < pair[1].id);
            }
        }
    }

    #[test]
    fn ascending_feed_is_sorted(sources in arb_sources()) {
        let options = FeedOptions { sort: SortDirection::Asc, ..FeedOptions::default() };
        let feed = aggregate(&sources, &options);
        for pair in feed.events.windows(2) {
            prop_assert!(pair[0].occurred_at <= pair[1].occurred_at);
        }
    }

    #[test]
    fn excluded_category_never_appears(sources in arb_sources()) {
        let options = FeedOptions {
            exclude_categories: vec![Category::Weight],
            ..FeedOptions::default()
        };
        let feed = aggregate(&sources, &options);
        prop_assert!(feed.events.iter().all(|e| e.category != Category::Weight));
    }

    #[test]
    fn window_bounds_are_respected(
        sources in arb_sources(),
        a in 0i64..730,
        b in 0i64..730,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let since = Utc.from_utc_datetime(&(epoch() + Duration::days(lo)).and_hms_opt(0, 0, 0).unwrap());
        let until = Utc.from_utc_datetime(&(epoch() + Duration::days(hi)).and_hms_opt(0, 0, 0).unwrap());
        let options = FeedOptions {
            since: Some(since),
            until: Some(until),
            ..FeedOptions::default()
        };
        let feed = aggregate(&sources, &options);
        for event in &feed.events {
            prop_assert!(event.occurred_at >= since && event.occurred_at <= until);
        }
    }

    #[test]
    fn feed_ids_are_unique(sources in arb_sources()) {
        let feed = aggregate(&sources, &FeedOptions::default());
        let mut ids: Vec<&String> = feed.events.iter().map(|e| &e.id).collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), before);
    }

    #[test]
    fn body_condition_label_is_total(score in any::<i32>()) {
        const LABELS: [&str; 6] = [
            "Emaciated", "Thin", "Underweight", "Ideal", "Overweight", "Obese",
        ];
        let label = body_condition_label(score);
        prop_assert!(LABELS.contains(&label) || label == "Severely Obese");
    }

    #[test]
    fn weight_trend_is_never_nan(
        previous in -10.0f64..200.0,
        current in -10.0f64..200.0,
        prev_is_kg in any::<bool>(),
        cur_is_kg in any::<bool>(),
    ) {
        let unit = |is_kg: bool| if is_kg { WeightUnit::Kg } else { WeightUnit::Lb };
        let trend = compute_weight_trend(
            &WeightReading { value: previous, unit: unit(prev_is_kg) },
            &WeightReading { value: current, unit: unit(cur_is_kg) },
        );
        if let Some(change) = trend.percent_change {
            prop_assert!(change.is_finite());
        }
    }
}
