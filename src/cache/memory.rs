//! In-process cache store backed by moka.

use std::time::Duration;

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;

use super::{CacheEntry, CacheStore};
use crate::Result;
use crate::fingerprint::Fingerprint;

/// Configuration for the result cache.
///
/// ```rust
/// # use geogate::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(1_000)
///     .ttl(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 10,000.
    pub max_entries: u64,
    /// Time-to-live for cached results. Default: 60 seconds.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(60),
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached results.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Bounded in-memory store.
///
/// Uses moka's concurrent cache with a per-entry expiry policy taken from
/// each entry's TTL, so the store sweeps expired results on its own in
/// addition to the read-time check in [`ResultCache`](super::ResultCache).
/// Past `max_entries`, moka evicts by its TinyLFU policy.
pub struct MemoryStore {
    cache: Cache<Fingerprint, CacheEntry>,
}

impl MemoryStore {
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .expire_after(EntryTtl)
            .build();
        Self { cache }
    }

    /// Approximate number of entries currently held.
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evict all entries.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &Fingerprint) -> Result<Option<CacheEntry>> {
        Ok(self.cache.get(key).await)
    }

    async fn put(&self, key: Fingerprint, entry: CacheEntry) -> Result<()> {
        self.cache.insert(key, entry).await;
        Ok(())
    }

    async fn delete(&self, key: &Fingerprint) -> Result<bool> {
        Ok(self.cache.remove(key).await.is_some())
    }
}

/// Expire each entry after its own TTL; an overwrite restarts the window.
struct EntryTtl;

impl Expiry<Fingerprint, CacheEntry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &Fingerprint,
        value: &CacheEntry,
        _created_at: std::time::Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &Fingerprint,
        value: &CacheEntry,
        _updated_at: std::time::Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}
