/// Handle resolution - orchestrates the cache and the directory store
use crate::{
    cache::HandleCache,
    db,
    error::ApiResult,
    extension::Extension,
    metrics,
};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Resolves an extension to its handle list, cache first.
///
/// Concurrent misses for the same extension are coalesced: one caller
/// queries the store, the rest pick the result up from the cache.
pub struct HandleResolver {
    db: SqlitePool,
    cache: Arc<HandleCache>,
    inflight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl HandleResolver {
    pub fn new(db: SqlitePool, cache: Arc<HandleCache>) -> Self {
        Self {
            db,
            cache,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve an extension to its validated handle list.
    ///
    /// Resolution order:
    /// 1. Check cache (fast path)
    /// 2. Acquire the per-extension in-flight guard
    /// 3. Re-check cache, then query the store
    /// 4. Cache the result, including empty lists
    ///
    /// Store failures propagate without writing a cache entry, so the
    /// next request retries the store.
    pub async fn resolve(&self, extension: &Extension) -> ApiResult<Vec<String>> {
        let key = extension.as_str();

        if let Some(handles) = self.cache.get(key) {
            metrics::CACHE_HITS_TOTAL.inc();
            return Ok(handles);
        }
        metrics::CACHE_MISSES_TOTAL.inc();

        let guard = self.inflight_guard(key).await;
        let _held = guard.lock().await;

        // Another caller may have finished the query while we waited
        if let Some(handles) = self.cache.get(key) {
            return Ok(handles);
        }

        let result = self.query_store(extension).await;
        self.release_inflight(key).await;

        let handles = result?;
        self.cache.set(key, handles.clone());

        Ok(handles)
    }

    async fn query_store(&self, extension: &Extension) -> ApiResult<Vec<String>> {
        let lookup_key = extension.lookup_key();

        metrics::STORE_QUERIES_TOTAL.inc();
        tracing::debug!("Cache miss for {}, querying directory store", extension);

        db::users::find_valid_handles(&self.db, &lookup_key)
            .await
            .inspect_err(|_| metrics::STORE_QUERY_FAILURES_TOTAL.inc())
    }

    async fn inflight_guard(&self, key: &str) -> Arc<Mutex<()>> {
        let mut inflight = self.inflight.lock().await;
        inflight
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn release_inflight(&self, key: &str) {
        let mut inflight = self.inflight.lock().await;
        inflight.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::users::tests::{create_test_db, insert_user};
    use crate::extension::ExtensionRegistry;
    use std::time::Duration;

    fn extension(raw: &str) -> Extension {
        ExtensionRegistry::new([".gov", ".gov.uk"])
            .unwrap()
            .match_segment(raw)
            .unwrap()
            .clone()
    }

    fn resolver(db: SqlitePool, ttl: Duration) -> (HandleResolver, Arc<HandleCache>) {
        let cache = Arc::new(HandleCache::new(ttl));
        (HandleResolver::new(db, Arc::clone(&cache)), cache)
    }

    #[tokio::test]
    async fn resolves_and_caches_handles() {
        let db = create_test_db().await;
        insert_user(&db, "did:plc:a", "nasa.gov", ("gov", None, None), true).await;

        let (resolver, cache) = resolver(db, Duration::from_secs(300));
        let ext = extension(".gov");

        let handles = resolver.resolve(&ext).await.unwrap();
        assert_eq!(handles, vec!["nasa.gov".to_string()]);
        assert_eq!(cache.get(".gov"), Some(vec!["nasa.gov".to_string()]));
    }

    #[tokio::test]
    async fn cached_result_is_served_without_a_new_query() {
        let db = create_test_db().await;
        insert_user(&db, "did:plc:a", "nasa.gov", ("gov", None, None), true).await;

        let (resolver, _cache) = resolver(db.clone(), Duration::from_secs(300));
        let ext = extension(".gov");

        let first = resolver.resolve(&ext).await.unwrap();

        // A row added after caching must not appear within the TTL window
        insert_user(&db, "did:plc:b", "usda.gov", ("gov", None, None), true).await;

        let second = resolver.resolve(&ext).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn expired_entry_triggers_a_new_query() {
        let db = create_test_db().await;
        insert_user(&db, "did:plc:a", "nasa.gov", ("gov", None, None), true).await;

        let (resolver, _cache) = resolver(db.clone(), Duration::ZERO);
        let ext = extension(".gov");

        resolver.resolve(&ext).await.unwrap();
        insert_user(&db, "did:plc:b", "usda.gov", ("gov", None, None), true).await;

        let refreshed = resolver.resolve(&ext).await.unwrap();
        assert_eq!(
            refreshed,
            vec!["nasa.gov".to_string(), "usda.gov".to_string()]
        );
    }

    #[tokio::test]
    async fn empty_results_are_cached() {
        let db = create_test_db().await;

        let (resolver, cache) = resolver(db, Duration::from_secs(300));
        let ext = extension(".gov.uk");

        let handles = resolver.resolve(&ext).await.unwrap();
        assert!(handles.is_empty());
        assert_eq!(cache.get(".gov.uk"), Some(Vec::new()));
    }

    #[tokio::test]
    async fn store_failure_propagates_and_writes_no_cache_entry() {
        let db = create_test_db().await;
        db.close().await;

        let (resolver, cache) = resolver(db, Duration::from_secs(300));
        let ext = extension(".gov");

        assert!(resolver.resolve(&ext).await.is_err());
        assert_eq!(cache.get(".gov"), None);
    }

    #[tokio::test]
    async fn concurrent_resolves_agree() {
        let db = create_test_db().await;
        insert_user(&db, "did:plc:a", "nasa.gov", ("gov", None, None), true).await;

        let (resolver, _cache) = resolver(db, Duration::from_secs(300));
        let resolver = Arc::new(resolver);
        let ext = extension(".gov");

        let (a, b) = tokio::join!(resolver.resolve(&ext), resolver.resolve(&ext));
        assert_eq!(a.unwrap(), b.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_misses_share_a_single_store_query() {
        let db = create_test_db().await;
        insert_user(&db, "did:plc:a", "nasa.gov", ("gov", None, None), true).await;

        let (resolver, _cache) = resolver(db, Duration::from_secs(300));
        let resolver = Arc::new(resolver);
        let ext = extension(".gov");

        let before = metrics::STORE_QUERIES_TOTAL.get();

        // Release every caller at once so they all see the cold cache
        let barrier = Arc::new(tokio::sync::Barrier::new(8));
        let mut tasks = Vec::new();
        for _ in 0..8 {
            let resolver = Arc::clone(&resolver);
            let barrier = Arc::clone(&barrier);
            let ext = ext.clone();
            tasks.push(tokio::spawn(async move {
                barrier.wait().await;
                resolver.resolve(&ext).await.unwrap()
            }));
        }

        for task in tasks {
            assert_eq!(task.await.unwrap(), vec!["nasa.gov".to_string()]);
        }

        let queries = metrics::STORE_QUERIES_TOTAL.get() - before;
        assert!(
            queries <= 1,
            "expected at most one shared store query, saw {}",
            queries
        );
    }
}
