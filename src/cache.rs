//! In-memory response cache keyed by normalized topic.

use dashmap::DashMap;

/// Normalize user input for use as a cache key: trim and case-fold.
pub fn normalize_topic(topic: &str) -> String {
    topic.trim().to_lowercase()
}

/// Unbounded in-memory cache of computed explanations.
///
/// No eviction and no TTL; entries live for the process lifetime. Concurrent
/// writes to the same key are last-write-wins, there is no per-key lock and
/// two concurrent misses for the same topic may both compute.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: DashMap<String, String>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Look up a topic. The key is normalized here, callers pass raw input.
    pub fn get(&self, topic: &str) -> Option<String> {
        self.entries
            .get(&normalize_topic(topic))
            .map(|entry| entry.value().clone())
    }

    pub fn put(&self, topic: &str, text: String) {
        self.entries.insert(normalize_topic(topic), text);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
