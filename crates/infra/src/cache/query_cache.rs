//! Query caching with moka
//!
//! Caches successful reads as JSON values keyed by a caller-chosen string
//! (`cases:list:...`, `statistics:overview`). Errors are never cached.
//!
//! # Architecture
//!
//! - **Coalescing**: concurrent misses on one key share a single load
//! - **Retry**: a load failing with a retryable error (network, timeout,
//!   5xx) is attempted once more before the error is returned
//! - **Invalidation**: by key, by key prefix, or everything
//! - **Session scope**: a cache bound to a [`Session`] keys entries by the
//!   session generation and drops everything once it changes, so nothing
//!   read under one sign-in is served after sign-out, expiry or another
//!   sign-in

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use visadesk_core::Session;
use visadesk_domain::{CacheConfig, Result, VisadeskError};

#[derive(Clone)]
struct SessionScope {
    session: Arc<Session>,
    /// Generation the cached entries were read under
    seen: Arc<AtomicU64>,
}

/// Shared TTL cache in front of read endpoints
#[derive(Clone)]
pub struct QueryCache {
    entries: Cache<String, Value>,
    ttl: Duration,
    scope: Option<SessionScope>,
}

impl QueryCache {
    pub fn new(config: &CacheConfig) -> Self {
        let ttl = Duration::from_secs(config.ttl_secs);
        tracing::info!(
            ttl_seconds = config.ttl_secs,
            max_capacity = config.max_entries,
            "query cache configuration loaded"
        );
        let entries = Cache::builder().time_to_live(ttl).max_capacity(config.max_entries).build();
        Self { entries, ttl, scope: None }
    }

    /// Bind entries to the credentials `session` holds
    #[must_use]
    pub fn scoped_to(mut self, session: Arc<Session>) -> Self {
        let seen = Arc::new(AtomicU64::new(session.generation()));
        self.scope = Some(SessionScope { session, seen });
        self
    }

    /// Full cache key for `key`, dropping entries of a previous generation
    fn key(&self, key: &str) -> String {
        let Some(scope) = &self.scope else {
            return key.to_string();
        };
        let generation = scope.session.generation();
        if scope.seen.swap(generation, Ordering::SeqCst) != generation {
            debug!(generation, "session changed, dropping cached queries");
            self.entries.invalidate_all();
        }
        format!("{generation}#{key}")
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached value for `key`, loading it on a miss
    ///
    /// # Errors
    /// Returns the loader's error after at most two attempts, or `Decode` if
    /// the cached value does not deserialize into `T`
    pub async fn get_or_fetch<T, F, Fut>(&self, key: &str, loader: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let load = async {
            let loaded = match loader().await {
                Err(err) if err.is_retryable() => {
                    debug!(key, error = %err, "query failed, retrying once");
                    loader().await?
                }
                other => other?,
            };
            serde_json::to_value(loaded).map_err(VisadeskError::from)
        };

        let value = self
            .entries
            .try_get_with(self.key(key), load)
            .await
            .map_err(|err: Arc<VisadeskError>| (*err).clone())?;
        Ok(serde_json::from_value(value)?)
    }

    /// Cached value for `key`, without loading
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.entries.get(&self.key(key)).await?;
        serde_json::from_value(value).ok()
    }

    pub async fn invalidate(&self, key: &str) {
        debug!(key, "invalidating cache entry");
        self.entries.invalidate(&self.key(key)).await;
    }

    /// Drop every entry whose key starts with `prefix`
    pub async fn invalidate_prefix(&self, prefix: &str) {
        let prefix = self.key(prefix);
        let stale: Vec<Arc<String>> = self
            .entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix.as_str()))
            .map(|(k, _)| k)
            .collect();
        debug!(prefix = %prefix, count = stale.len(), "invalidating cache entries by prefix");
        for key in stale {
            self.entries.invalidate(key.as_str()).await;
        }
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.entries.entry_count())
            .field("scoped", &self.scope.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use visadesk_core::{InMemoryCredentialStore, TokenRefresher};
    use visadesk_domain::{AuthTokens, CredentialPair, StoredSession};

    use super::*;

    struct NoRefresh;

    #[async_trait]
    impl TokenRefresher for NoRefresh {
        async fn refresh(&self, _refresh_token: &str) -> Result<AuthTokens> {
            Err(VisadeskError::api(401, "refresh disabled"))
        }
    }

    fn signed_in(access: &str) -> StoredSession {
        StoredSession {
            credentials: CredentialPair::new(access, None),
            user: None,
            remember_me: false,
        }
    }

    fn cache() -> QueryCache {
        QueryCache::new(&CacheConfig { ttl_secs: 60, max_entries: 100 })
    }

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let load = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1u32, 2, 3])
        };

        assert_eq!(cache.get_or_fetch("numbers", load).await.unwrap(), vec![1, 2, 3]);
        assert_eq!(cache.get_or_fetch("numbers", load).await.unwrap(), vec![1, 2, 3]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retryable_error_is_retried_once() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let value: u32 = cache
            .get_or_fetch("flaky", || async {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(VisadeskError::Network("connection reset".into()))
                } else {
                    Ok(7)
                }
            })
            .await
            .unwrap();

        assert_eq!(value, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached_or_retried_when_permanent() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let load = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<u32, _>(VisadeskError::api(404, "Case not found"))
        };

        assert_eq!(cache.get_or_fetch("missing", load).await.unwrap_err().status(), Some(404));
        assert!(cache.get_or_fetch("missing", load).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_prefix_only_drops_matching_keys() {
        let cache = cache();
        cache.get_or_fetch("cases:list:all", || async { Ok(1u32) }).await.unwrap();
        cache.get_or_fetch("cases:get:c1", || async { Ok(2u32) }).await.unwrap();
        cache.get_or_fetch("statistics:overview", || async { Ok(3u32) }).await.unwrap();

        cache.invalidate_prefix("cases:").await;

        assert_eq!(cache.get::<u32>("cases:list:all").await, None);
        assert_eq!(cache.get::<u32>("cases:get:c1").await, None);
        assert_eq!(cache.get::<u32>("statistics:overview").await, Some(3));
    }

    #[tokio::test]
    async fn test_scoped_entries_do_not_outlive_the_session() {
        let session = Arc::new(Session::new(
            Arc::new(InMemoryCredentialStore::new()),
            Arc::new(NoRefresh),
        ));
        session.sign_in(signed_in("tok-a")).await.unwrap();
        let cache = cache().scoped_to(session.clone());
        let calls = AtomicUsize::new(0);
        let load = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(1u32)
        };

        cache.get_or_fetch("cases:list:all", load).await.unwrap();
        cache.get_or_fetch("cases:list:all", load).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get::<u32>("cases:list:all").await, Some(1));

        session.sign_out().await.unwrap();
        assert_eq!(cache.get::<u32>("cases:list:all").await, None);

        session.sign_in(signed_in("tok-b")).await.unwrap();
        cache.get_or_fetch("cases:list:all", load).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_scoped_prefix_invalidation() {
        let session = Arc::new(Session::new(
            Arc::new(InMemoryCredentialStore::new()),
            Arc::new(NoRefresh),
        ));
        let cache = cache().scoped_to(session);
        cache.get_or_fetch("cases:get:c1", || async { Ok(2u32) }).await.unwrap();
        cache.get_or_fetch("statistics:overview", || async { Ok(3u32) }).await.unwrap();

        cache.invalidate_prefix("cases:").await;

        assert_eq!(cache.get::<u32>("cases:get:c1").await, None);
        assert_eq!(cache.get::<u32>("statistics:overview").await, Some(3));
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_load() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));

        let loads = (0..8).map(|_| {
            let cache = cache.clone();
            let calls = calls.clone();
            async move {
                cache
                    .get_or_fetch("overview", || {
                        let calls = calls.clone();
                        async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(20)).await;
                            Ok(42u32)
                        }
                    })
                    .await
            }
        });

        for result in futures::future::join_all(loads).await {
            assert_eq!(result.unwrap(), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
