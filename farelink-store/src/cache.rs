use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Cache TTLs in seconds, per concern.
pub mod ttl {
    pub const SEARCH_RESULTS: u64 = 300;
    pub const SEAT_LAYOUT: u64 = 900;
    pub const SSR: u64 = 900;
    pub const PRICING: u64 = 300;
}

/// Key namespaces. Each concern writes under its own prefix so it can be
/// bulk-invalidated without touching the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheNamespace {
    Search,
    SeatLayout,
    Ssr,
    Pricing,
}

impl CacheNamespace {
    pub fn prefix(self) -> &'static str {
        match self {
            CacheNamespace::Search => "search:",
            CacheNamespace::SeatLayout => "seat:",
            CacheNamespace::Ssr => "ssr:",
            CacheNamespace::Pricing => "pricing:",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("cache backend error: {0}")]
pub struct CacheError(pub String);

/// Raw key/value backend with TTL enforcement and prefix deletion.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_raw(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    async fn delete_prefix(&self, prefix: &str) -> Result<u64, CacheError>;
}

#[derive(Clone)]
pub struct RedisStore {
    client: redis::Client,
}

impl RedisStore {
    pub fn new(connection_string: &str) -> Result<Self, CacheError> {
        let client =
            redis::Client::open(connection_string).map_err(|e| CacheError(e.to_string()))?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, CacheError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError(e.to_string()))
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection().await?;
        conn.get(key).await.map_err(|e| CacheError(e.to_string()))
    }

    async fn set_raw(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds)
            .await
            .map_err(|e| CacheError(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(key)
            .await
            .map_err(|e| CacheError(e.to_string()))
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let mut conn = self.connection().await?;
        let keys: Vec<String> = conn
            .keys(format!("{prefix}*"))
            .await
            .map_err(|e| CacheError(e.to_string()))?;
        if keys.is_empty() {
            return Ok(0);
        }
        let removed = keys.len() as u64;
        conn.del::<_, ()>(keys)
            .await
            .map_err(|e| CacheError(e.to_string()))?;
        Ok(removed)
    }
}

/// In-process store with the same contract, for tests and local development.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, MemoryEntry>>,
}

struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock().expect("memory cache lock");
        match entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_raw(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().expect("memory cache lock");
        entries.insert(
            key.to_string(),
            MemoryEntry {
                value: value.to_string(),
                expires_at: Instant::now() + Duration::from_secs(ttl_seconds),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.lock().expect("memory cache lock").remove(key);
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let mut entries = self.entries.lock().expect("memory cache lock");
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok((before - entries.len()) as u64)
    }
}

/// Short-TTL memoization of supplier-derived values. Values are JSON
/// serialized; a backend failure or undecodable entry reads as a miss so
/// caching never breaks the main flow.
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn CacheStore>,
}

impl ResultCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    fn full_key(namespace: CacheNamespace, key: &str) -> String {
        format!("{}{}", namespace.prefix(), key)
    }

    pub async fn get<T: DeserializeOwned>(&self, namespace: CacheNamespace, key: &str) -> Option<T> {
        let full_key = Self::full_key(namespace, key);
        match self.store.get_raw(&full_key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    debug!(key = %full_key, "cache hit");
                    Some(value)
                }
                Err(e) => {
                    warn!(key = %full_key, error = %e, "undecodable cache entry, treating as miss");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key = %full_key, error = %e, "cache read failed");
                None
            }
        }
    }

    pub async fn set<T: Serialize>(
        &self,
        namespace: CacheNamespace,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) {
        let full_key = Self::full_key(namespace, key);
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = %full_key, error = %e, "cache serialization failed");
                return;
            }
        };
        if let Err(e) = self.store.set_raw(&full_key, &raw, ttl_seconds).await {
            warn!(key = %full_key, error = %e, "cache write failed");
        }
    }

    /// Probe the cache, running `producer` once on a miss and populating the
    /// entry with its value. Concurrent same-key misses in one process may
    /// both produce; entries are idempotent derivations so last writer wins.
    pub async fn get_or_set<T, E, F, Fut>(
        &self,
        namespace: CacheNamespace,
        key: &str,
        ttl_seconds: u64,
        producer: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.get(namespace, key).await {
            return Ok(cached);
        }

        let value = producer().await?;
        self.set(namespace, key, &value, ttl_seconds).await;
        Ok(value)
    }

    pub async fn invalidate_namespace(&self, namespace: CacheNamespace) -> u64 {
        match self.store.delete_prefix(namespace.prefix()).await {
            Ok(removed) => removed,
            Err(e) => {
                warn!(prefix = namespace.prefix(), error = %e, "cache invalidation failed");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Entry {
        id: u32,
        label: String,
    }

    fn cache() -> ResultCache {
        ResultCache::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let cache = cache();
        let entry = Entry {
            id: 7,
            label: "DEL-BOM".to_string(),
        };

        cache
            .set(CacheNamespace::Search, "fingerprint", &entry, 60)
            .await;
        let fetched: Option<Entry> = cache.get(CacheNamespace::Search, "fingerprint").await;

        assert_eq!(fetched, Some(entry));
    }

    #[tokio::test]
    async fn expired_entry_is_a_miss() {
        let store = Arc::new(MemoryStore::new());
        let cache = ResultCache::new(store);

        cache
            .set(CacheNamespace::Search, "gone", &Entry { id: 1, label: String::new() }, 0)
            .await;

        let fetched: Option<Entry> = cache.get(CacheNamespace::Search, "gone").await;
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn undecodable_entry_is_a_miss_not_an_error() {
        let store = Arc::new(MemoryStore::new());
        store
            .set_raw("search:bad", "{not json", 60)
            .await
            .unwrap();
        let cache = ResultCache::new(store);

        let fetched: Option<Entry> = cache.get(CacheNamespace::Search, "bad").await;
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn get_or_set_runs_producer_once_per_miss() {
        let cache = cache();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value: Result<Entry, CacheError> = cache
                .get_or_set(CacheNamespace::Ssr, "tui:6E-204", 60, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Entry {
                        id: 9,
                        label: "meals".to_string(),
                    })
                })
                .await;
            assert_eq!(value.unwrap().id, 9);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn producer_error_propagates_and_caches_nothing() {
        let cache = cache();

        let result: Result<Entry, CacheError> = cache
            .get_or_set(CacheNamespace::Pricing, "tui", 60, || async {
                Err(CacheError("upstream down".to_string()))
            })
            .await;
        assert!(result.is_err());

        let fetched: Option<Entry> = cache.get(CacheNamespace::Pricing, "tui").await;
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn namespace_invalidation_only_touches_its_prefix() {
        let cache = cache();
        let entry = Entry {
            id: 1,
            label: String::new(),
        };

        cache.set(CacheNamespace::Search, "a", &entry, 60).await;
        cache.set(CacheNamespace::Search, "b", &entry, 60).await;
        cache.set(CacheNamespace::SeatLayout, "a", &entry, 60).await;

        let removed = cache.invalidate_namespace(CacheNamespace::Search).await;
        assert_eq!(removed, 2);

        let search: Option<Entry> = cache.get(CacheNamespace::Search, "a").await;
        let seat: Option<Entry> = cache.get(CacheNamespace::SeatLayout, "a").await;
        assert!(search.is_none());
        assert!(seat.is_some());
    }
}
