//! Identifier-keyed record caching

use std::sync::Arc;
use ahash::AHashMap;
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::trace;
use dex_core::{
    Cursor, DescriptionRecord, DetailRecord, DexSource, FetchError, Identifier, Page,
};

/// Bounded cache of shared records
pub struct DataCache<T> {
    inner: Arc<RwLock<CacheInner<T>>>,
}

struct CacheInner<T> {
    records: AHashMap<Identifier, Arc<T>>,
    max_records: usize,
    /// LRU tracking for cache eviction
    access_order: Vec<Identifier>,
}

impl<T> DataCache<T> {
    /// Create a new data cache
    pub fn new(max_records: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheInner {
                records: AHashMap::new(),
                max_records: max_records.max(1),
                access_order: Vec::new(),
            })),
        }
    }

    /// Get a record from cache
    pub fn get(&self, id: Identifier) -> Option<Arc<T>> {
        let mut cache = self.inner.write();
        let record = cache.records.get(&id).cloned()?;

        // Update LRU
        cache.access_order.retain(|&cached| cached != id);
        cache.access_order.push(id);
        Some(record)
    }

    /// Put a record in cache, evicting the least recently used one when full
    pub fn put(&self, id: Identifier, record: Arc<T>) {
        let mut cache = self.inner.write();

        if cache.records.len() >= cache.max_records && !cache.records.contains_key(&id) {
            if !cache.access_order.is_empty() {
                let evicted = cache.access_order.remove(0);
                cache.records.remove(&evicted);
                trace!("Evicted entry {} from cache", evicted);
            }
        }

        cache.access_order.retain(|&cached| cached != id);
        cache.access_order.push(id);
        cache.records.insert(id, record);
    }

    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear the cache
    pub fn clear(&self) {
        let mut cache = self.inner.write();
        cache.records.clear();
        cache.access_order.clear();
    }
}

/// Source wrapper that remembers successful detail and description lookups
///
/// Failures are never cached so a retry always reaches the inner source.
pub struct CachedSource<S> {
    inner: S,
    details: DataCache<DetailRecord>,
    descriptions: DataCache<DescriptionRecord>,
}

impl<S: DexSource> CachedSource<S> {
    pub fn new(inner: S, capacity: usize) -> Self {
        Self {
            inner,
            details: DataCache::new(capacity),
            descriptions: DataCache::new(capacity),
        }
    }

    pub fn details(&self) -> &DataCache<DetailRecord> {
        &self.details
    }

    pub fn descriptions(&self) -> &DataCache<DescriptionRecord> {
        &self.descriptions
    }
}

#[async_trait]
impl<S: DexSource> DexSource for CachedSource<S> {
    async fn detail(&self, id: Identifier) -> Result<Arc<DetailRecord>, FetchError> {
        if let Some(record) = self.details.get(id) {
            return Ok(record);
        }
        let record = self.inner.detail(id).await?;
        self.details.put(id, record.clone());
        Ok(record)
    }

    async fn description(&self, id: Identifier) -> Result<Arc<DescriptionRecord>, FetchError> {
        if let Some(record) = self.descriptions.get(id) {
            return Ok(record);
        }
        let record = self.inner.description(id).await?;
        self.descriptions.put(id, record.clone());
        Ok(record)
    }

    async fn page(&self, cursor: Option<Cursor>, limit: usize) -> Result<Page, FetchError> {
        self.inner.page(cursor, limit).await
    }

    fn source_name(&self) -> &str {
        self.inner.source_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn id(raw: i64) -> Identifier {
        Identifier::new(raw)
    }

    #[test]
    fn test_lru_eviction() {
        let cache = DataCache::new(2);
        cache.put(id(1), Arc::new("one"));
        cache.put(id(2), Arc::new("two"));

        // Touch 1 so that 2 becomes the eviction candidate
        assert!(cache.get(id(1)).is_some());
        cache.put(id(3), Arc::new("three"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(id(2)).is_none());
        assert_eq!(cache.get(id(1)).as_deref(), Some(&"one"));
        assert_eq!(cache.get(id(3)).as_deref(), Some(&"three"));
    }

    #[test]
    fn test_reinsert_does_not_evict() {
        let cache = DataCache::new(2);
        cache.put(id(1), Arc::new(1));
        cache.put(id(2), Arc::new(2));
        cache.put(id(2), Arc::new(20));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(id(2)).as_deref(), Some(&20));
        cache.clear();
        assert!(cache.is_empty());
    }

    /// Counts calls and fails every odd-numbered detail request
    struct FlakySource {
        detail_calls: AtomicUsize,
    }

    #[async_trait]
    impl DexSource for FlakySource {
        async fn detail(&self, id: Identifier) -> Result<Arc<DetailRecord>, FetchError> {
            let call = self.detail_calls.fetch_add(1, Ordering::SeqCst);
            if call % 2 == 0 {
                return Err(FetchError::Unavailable("flaky".to_string()));
            }
            Ok(Arc::new(DetailRecord {
                id,
                name: format!("entry-{}", id),
                ..DetailRecord::default()
            }))
        }

        async fn description(&self, id: Identifier) -> Result<Arc<DescriptionRecord>, FetchError> {
            Err(FetchError::NotFound(id))
        }

        async fn page(&self, _cursor: Option<Cursor>, _limit: usize) -> Result<Page, FetchError> {
            Ok(Page::default())
        }

        fn source_name(&self) -> &str {
            "flaky"
        }
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let source = CachedSource::new(
            FlakySource {
                detail_calls: AtomicUsize::new(0),
            },
            8,
        );

        assert!(source.detail(id(4)).await.is_err());
        assert!(source.details().is_empty());

        let first = source.detail(id(4)).await.unwrap();
        let second = source.detail(id(4)).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.inner.detail_calls.load(Ordering::SeqCst), 2);
        assert_eq!(source.source_name(), "flaky");
    }
}
