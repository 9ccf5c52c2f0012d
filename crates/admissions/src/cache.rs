//! Content-addressed cache of classified record sets.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::trace;

use crate::error::Result;
use crate::record::RecordSet;

/// Hit and miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Classified record sets keyed by the content hash of their raw input.
///
/// Identical raw input always has the same key, so a cached entry is
/// byte-identical to a fresh classification. Entries live until
/// [`invalidate`](Self::invalidate) or [`clear`](Self::clear); the cache is
/// owned by its caller rather than shared process-wide.
#[derive(Debug, Default)]
pub struct ClassifiedCache {
    entries: HashMap<String, Arc<RecordSet>>,
    stats: CacheStats,
}

impl ClassifiedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the entry for `key`, building it with `classify` on a miss.
    pub fn get_or_classify<F>(&mut self, key: &str, classify: F) -> Result<Arc<RecordSet>>
    where
        F: FnOnce() -> Result<RecordSet>,
    {
        if let Some(records) = self.entries.get(key) {
            self.stats.hits += 1;
            trace!(key, "classified cache hit");
            return Ok(Arc::clone(records));
        }

        self.stats.misses += 1;
        trace!(key, "classified cache miss");
        let records = Arc::new(classify()?);
        self.entries.insert(key.to_string(), Arc::clone(&records));
        Ok(records)
    }

    /// Look up an entry without counting a hit or miss.
    pub fn get(&self, key: &str) -> Option<Arc<RecordSet>> {
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: impl Into<String>, records: RecordSet) -> Arc<RecordSet> {
        let records = Arc::new(records);
        self.entries.insert(key.into(), Arc::clone(&records));
        records
    }

    /// Drop one entry; returns whether it was present.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdmissionsError;

    fn records() -> RecordSet {
        RecordSet::from_records(vec![vec![("race", Some("WHITE"))]])
    }

    #[test]
    fn test_hit_after_miss() {
        let mut cache = ClassifiedCache::new();
        let mut calls = 0;

        let first = cache
            .get_or_classify("k", || {
                calls += 1;
                Ok(records())
            })
            .unwrap();
        let second = cache
            .get_or_classify("k", || {
                calls += 1;
                Ok(records())
            })
            .unwrap();

        assert_eq!(calls, 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn test_error_is_not_cached() {
        let mut cache = ClassifiedCache::new();
        let result = cache.get_or_classify("k", || Err(AdmissionsError::EmptyData("x".into())));
        assert!(result.is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let mut cache = ClassifiedCache::new();
        cache.insert("a", records());
        cache.insert("b", records());
        assert_eq!(cache.len(), 2);

        assert!(cache.invalidate("a"));
        assert!(!cache.invalidate("a"));
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());

        cache.clear();
        assert!(cache.is_empty());
    }
}
