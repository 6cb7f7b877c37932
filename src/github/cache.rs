use super::SearchItem;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

type CacheKey = (String, i64);

/// What one search produced, including the alert of a failed call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CachedSearch {
    pub items: Vec<SearchItem>,
    pub error: Option<String>,
}

struct CacheEntry {
    search: CachedSearch,
    stored_at: Instant,
}

/// Search results keyed by query shape, expired lazily on read.
pub struct ResponseCache {
    ttl: Duration,
    entries: HashMap<CacheKey, CacheEntry>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<CachedSearch> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&mut self, key: &CacheKey, now: Instant) -> Option<CachedSearch> {
        let entry = self.entries.get(key)?;
        if now.saturating_duration_since(entry.stored_at) < self.ttl {
            return Some(entry.search.clone());
        }

        debug!("Cache entry for {:?} expired", key);
        self.entries.remove(key);
        None
    }

    pub fn insert(&mut self, key: CacheKey, search: CachedSearch) {
        self.insert_at(key, search, Instant::now());
    }

    pub fn insert_at(&mut self, key: CacheKey, search: CachedSearch, now: Instant) {
        self.entries.insert(
            key,
            CacheEntry {
                search,
                stored_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(query: &str) -> CacheKey {
        (query.to_string(), 30)
    }

    fn found(logins: &[&str]) -> CachedSearch {
        CachedSearch {
            items: logins.iter().map(|l| SearchItem::by(l)).collect(),
            error: None,
        }
    }

    #[test]
    fn serves_entries_within_ttl() {
        let mut cache = ResponseCache::new(Duration::from_secs(3600));
        let start = Instant::now();
        cache.insert_at(key("is:pr"), found(&["alice"]), start);

        let hit = cache.get_at(&key("is:pr"), start + Duration::from_secs(3599));
        assert_eq!(hit, Some(found(&["alice"])));
    }

    #[test]
    fn drops_entries_at_ttl() {
        let mut cache = ResponseCache::new(Duration::from_secs(3600));
        let start = Instant::now();
        cache.insert_at(key("is:pr"), found(&["alice"]), start);

        assert!(cache
            .get_at(&key("is:pr"), start + Duration::from_secs(3600))
            .is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn window_is_part_of_the_key() {
        let mut cache = ResponseCache::new(Duration::from_secs(60));
        cache.insert(key("is:pr"), found(&[]));

        assert!(cache.get(&("is:pr".to_string(), 7)).is_none());
        assert_eq!(cache.get(&key("is:pr")), Some(found(&[])));
    }

    #[test]
    fn keeps_the_alert_of_a_failed_search() {
        let mut cache = ResponseCache::new(Duration::from_secs(3600));
        let failed = CachedSearch {
            items: Vec::new(),
            error: Some("API Error: 403. You may need a GitHub Token.".to_string()),
        };
        cache.insert(key("is:pr"), failed.clone());

        assert_eq!(cache.get(&key("is:pr")), Some(failed));
    }
}
