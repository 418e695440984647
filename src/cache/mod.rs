//! Result caching.
//!
//! [`ResultCache`] maps a [`Fingerprint`] to a previously computed
//! [`GeoResult`] with a per-entry expiry. Storage sits behind the small
//! [`CacheStore`] capability trait so the in-process [`MemoryStore`] can be
//! swapped for a shared or capacity-bounded backend without touching the
//! gateway.
//!
//! Expiry is lazy: [`ResultCache::get`] compares the entry's deadline with
//! the tokio clock at read time, so a paused test clock controls it. A
//! store may also drop entries on its own schedule (capacity eviction, its
//! own TTL sweep); that only ever turns a hit into a miss.

mod memory;

pub use memory::{CacheConfig, MemoryStore};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::Result;
use crate::fingerprint::Fingerprint;
use crate::telemetry;
use crate::types::GeoResult;

/// A stored result plus its expiry deadline.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: GeoResult,
    /// Window this entry was stored for. Stores use it as a sweep hint.
    pub ttl: Duration,
    pub expires_at: Instant,
}

impl CacheEntry {
    /// Whether the entry has expired as of `now`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Backing store for [`ResultCache`].
///
/// Implementations must be safe to call from concurrent requests. A store
/// that cannot be reached returns
/// [`GeoGateError::CacheUnavailable`](crate::GeoGateError::CacheUnavailable).
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Store name for logs.
    fn name(&self) -> &str;

    /// Fetch the entry for `key`, expired or not.
    async fn get(&self, key: &Fingerprint) -> Result<Option<CacheEntry>>;

    /// Insert or overwrite the entry for `key`.
    async fn put(&self, key: Fingerprint, entry: CacheEntry) -> Result<()>;

    /// Remove the entry for `key`. Returns whether something was removed.
    async fn delete(&self, _key: &Fingerprint) -> Result<bool> {
        Ok(false)
    }
}

/// Fingerprint → result mapping with per-entry TTL.
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn CacheStore>,
}

impl ResultCache {
    /// Wrap an existing store.
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Cache backed by a fresh [`MemoryStore`].
    pub fn in_memory(config: &CacheConfig) -> Self {
        Self::new(Arc::new(MemoryStore::new(config)))
    }

    /// Name of the backing store.
    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Look up a live result.
    ///
    /// Returns `Ok(None)` on a miss, including when the stored entry has
    /// expired. Emits cache hit/miss metrics.
    pub async fn get(&self, key: &Fingerprint) -> Result<Option<GeoResult>> {
        let entry = self.store.get(key).await?;
        match entry {
            Some(entry) if !entry.is_expired_at(Instant::now()) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                Ok(Some(entry.value))
            }
            // Stale entries are left for the store's own sweep; a delete here
            // could race with a concurrent put of a fresh result.
            Some(_) | None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                Ok(None)
            }
        }
    }

    /// Store `value` under `key` for `ttl` from now, replacing any existing
    /// entry and restarting its window.
    pub async fn put(&self, key: Fingerprint, value: GeoResult, ttl: Duration) -> Result<()> {
        let entry = CacheEntry {
            value,
            ttl,
            expires_at: Instant::now() + ttl,
        };
        self.store.put(key, entry).await
    }

    /// Explicitly evict `key`.
    pub async fn delete(&self, key: &Fingerprint) -> Result<bool> {
        self.store.delete(key).await
    }
}
