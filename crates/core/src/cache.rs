//! TTL-based caching of fetched view data.
//!
//! Values are kept as JSON strings behind a [`CacheStore`], so the same cache
//! works over an in-process map or any other string key/value backend. An
//! entry that has expired or no longer decodes as the requested type is a
//! miss and gets evicted.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::errors::{CatalystError, CatalystResult};

/// A string key/value backend.
pub trait CacheStore: Send + Sync {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, payload: String);
    fn remove(&self, key: &str);
    fn clear(&self);
}

/// Concurrent in-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn save(&self, key: &str, payload: String) {
        self.entries.insert(key.to_string(), payload);
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    fn clear(&self) {
        self.entries.clear();
    }
}

/// A cache hit together with the time it was stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub value: T,
    pub inserted_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    inserted_at: DateTime<Utc>,
    value: T,
}

pub struct TtlCache<S: CacheStore> {
    store: S,
    default_ttl: Duration,
}

impl<S: CacheStore> TtlCache<S> {
    pub fn new(store: S, default_ttl: Duration) -> Self {
        Self { store, default_ttl }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Looks `key` up with the cache's default TTL.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<Cached<T>> {
        self.get_with_ttl(key, self.default_ttl)
    }

    pub fn get_with_ttl<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<Cached<T>> {
        self.get_at(key, ttl, Utc::now())
    }

    /// Same as [`get_with_ttl`](Self::get_with_ttl) with an explicit clock reading.
    pub fn get_at<T: DeserializeOwned>(
        &self,
        key: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Option<Cached<T>> {
        let payload = self.store.load(key)?;

        let envelope: Envelope<T> = match serde_json::from_str(&payload) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(key, error = %e, "discarding undecodable cache entry");
                self.store.remove(key);
                return None;
            }
        };

        if now - envelope.inserted_at >= ttl {
            debug!(key, "cache entry expired");
            self.store.remove(key);
            return None;
        }

        Some(Cached {
            value: envelope.value,
            inserted_at: envelope.inserted_at,
        })
    }

    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> CatalystResult<()> {
        self.put_at(key, value, Utc::now())
    }

    pub fn put_at<T: Serialize>(&self, key: &str, value: &T, now: DateTime<Utc>) -> CatalystResult<()> {
        let payload = serde_json::to_string(&Envelope {
            inserted_at: now,
            value,
        })
        .map_err(|e| CatalystError::Internal(Box::new(e)))?;

        self.store.save(key, payload);
        Ok(())
    }

    pub fn invalidate(&self, key: &str) {
        self.store.remove(key);
    }

    pub fn clear(&self) {
        self.store.clear();
    }
}

impl TtlCache<MemoryStore> {
    /// In-memory cache with a five minute TTL.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new(), Duration::minutes(5))
    }
}
