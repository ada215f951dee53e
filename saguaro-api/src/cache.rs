use std::time::{Duration, Instant};

use crate::models::StatusMap;

/// How long a full status refresh stays valid.
pub const STATUS_CACHE_TTL: Duration = Duration::from_secs(300);

/// In-memory cache of the last full server-status refresh.
///
/// The cache is all-or-nothing: a refresh replaces every entry together with
/// the timestamp, and a stale or empty cache is ignored rather than
/// invalidated entry by entry.
#[derive(Default)]
pub struct StatusCache {
    entries: StatusMap,
    refreshed_at: Option<Instant>,
}

impl StatusCache {
    /// True when the cache holds a complete refresh younger than `ttl`.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        !self.entries.is_empty()
            && self
                .refreshed_at
                .is_some_and(|stamp| stamp.elapsed() < ttl)
    }

    /// Copy of the cached map.
    pub fn snapshot(&self) -> StatusMap {
        self.entries.clone()
    }

    /// Publish a new refresh generation and stamp it.
    pub fn replace(&mut self, entries: StatusMap) {
        self.entries = entries;
        self.refreshed_at = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ServerStatusEntry;

    fn sample_map() -> StatusMap {
        let mut map = StatusMap::new();
        map.insert(
            1,
            ServerStatusEntry {
                name: "Phoenix".to_string(),
                online: 700,
                is_online: true,
                error: None,
            },
        );
        map
    }

    #[test]
    fn test_empty_cache_is_never_fresh() {
        let cache = StatusCache::default();
        assert!(!cache.is_fresh(STATUS_CACHE_TTL));
    }

    #[test]
    fn test_replace_makes_cache_fresh() {
        let mut cache = StatusCache::default();
        cache.replace(sample_map());
        assert!(cache.is_fresh(STATUS_CACHE_TTL));
        assert_eq!(cache.snapshot().len(), 1);
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let mut cache = StatusCache::default();
        cache.replace(sample_map());
        assert!(!cache.is_fresh(Duration::ZERO));
    }

    #[test]
    fn test_replacing_with_empty_map_is_not_fresh() {
        let mut cache = StatusCache::default();
        cache.replace(sample_map());
        cache.replace(StatusMap::new());
        assert!(!cache.is_fresh(STATUS_CACHE_TTL));
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut cache = StatusCache::default();
        cache.replace(sample_map());
        let mut snap = cache.snapshot();
        snap.clear();
        assert_eq!(cache.snapshot().len(), 1);
    }
}
