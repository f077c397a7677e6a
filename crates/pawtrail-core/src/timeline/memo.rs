//! Memoized aggregation for identical inputs.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use super::{aggregate, AggregatedFeed, FeedOptions, FeedSources};

/// Feeds kept before the cache resets.
const DEFAULT_CAPACITY: usize = 16;

/// Caller-owned memo cache over [`aggregate`].
///
/// Keys are SHA-256 over the canonical JSON of the sources and options,
/// so a hit is only possible for byte-identical inputs; correctness then
/// follows from `aggregate` being pure. The cache holds a handful of
/// per-screen feeds and resets wholesale when full.
pub struct FeedMemo {
    capacity: usize,
    entries: HashMap<String, AggregatedFeed>,
}

impl Default for FeedMemo {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl FeedMemo {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
        }
    }

    /// Aggregate through the cache.
    pub fn aggregate(&mut self, sources: &FeedSources, options: &FeedOptions) -> AggregatedFeed {
        let key = cache_key(sources, options);
        if let Some(feed) = self.entries.get(&key) {
            return feed.clone();
        }

        let feed = aggregate(sources, options);
        if self.entries.len() >= self.capacity {
            self.entries.clear();
        }
        self.entries.insert(key, feed.clone());
        feed
    }

    /// Number of cached feeds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all cached feeds.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn cache_key(sources: &FeedSources, options: &FeedOptions) -> String {
    // serde_json maps keep sorted keys and BTreeMap iterates in key
    // order, so equal inputs always serialize to the same bytes.
    let encoded = serde_json::to_string(&(sources, options)).unwrap_or_default();
    hex::encode(Sha256::digest(encoded.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::SourceKind;
    use serde_json::json;

    fn sample_sources() -> FeedSources {
        let mut sources = FeedSources::new();
        sources.insert(
            SourceKind::Visit,
            vec![json!({"id": "v-1", "visit_type": "checkup", "visit_date": "2024-02-01"})],
        );
        sources
    }

    #[test]
    fn test_hit_matches_fresh_computation() {
        let sources = sample_sources();
        let options = FeedOptions::default();
        let mut memo = FeedMemo::default();

        let first = memo.aggregate(&sources, &options);
        let second = memo.aggregate(&sources, &options);
        assert_eq!(first, second);
        assert_eq!(second, aggregate(&sources, &options));
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn test_different_options_miss() {
        let sources = sample_sources();
        let mut memo = FeedMemo::default();

        memo.aggregate(&sources, &FeedOptions::default());
        memo.aggregate(
            &sources,
            &FeedOptions {
                sort: crate::timeline::SortDirection::Asc,
                ..FeedOptions::default()
            },
        );
        assert_eq!(memo.len(), 2);
    }

    #[test]
    fn test_cache_resets_at_capacity() {
        let mut memo = FeedMemo::new(2);
        let options = FeedOptions::default();

        for i in 0..3 {
            let mut sources = FeedSources::new();
            sources.insert(
                SourceKind::Visit,
                vec![json!({
                    "id": format!("v-{i}"),
                    "visit_type": "checkup",
                    "visit_date": "2024-02-01",
                })],
            );
            memo.aggregate(&sources, &options);
        }

        // Third insert lands in a freshly cleared cache.
        assert_eq!(memo.len(), 1);
    }
}
