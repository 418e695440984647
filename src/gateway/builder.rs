//! Builder for configuring gateway instances

use std::sync::Arc;
use std::time::Duration;

use super::GeoGateway;
use crate::cache::{CacheConfig, CacheStore, ResultCache};
use crate::config::GatewayConfig;
use crate::upstream::{
    DEFAULT_BASE_URL, DEFAULT_PATH, DEFAULT_TIMEOUT, HttpUpstreamClient, UpstreamClient,
};
use crate::{GeoGateError, Result};

/// Builder for configuring gateway instances.
///
/// With no options set, the gateway calls `http://localhost:8000/process`
/// with a 5 second deadline and caches results in memory for 60 seconds.
pub struct GeoGatewayBuilder {
    upstream_url: Option<String>,
    upstream_path: Option<String>,
    timeout: Option<Duration>,
    upstream: Option<Arc<dyn UpstreamClient>>,
    cache_config: CacheConfig,
    cache_store: Option<Arc<dyn CacheStore>>,
}

impl GeoGatewayBuilder {
    pub fn new() -> Self {
        Self {
            upstream_url: None,
            upstream_path: None,
            timeout: None,
            upstream: None,
            cache_config: CacheConfig::default(),
            cache_store: None,
        }
    }

    /// Start from a loaded [`GatewayConfig`].
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new()
            .upstream_url(&config.upstream.base_url)
            .upstream_path(&config.upstream.path)
            .timeout(config.timeout())
            .ttl(config.ttl())
            .max_entries(config.cache.max_entries)
    }

    /// Base URL of the compute service.
    pub fn upstream_url(mut self, url: impl Into<String>) -> Self {
        self.upstream_url = Some(url.into());
        self
    }

    /// Path appended to the base URL.
    pub fn upstream_path(mut self, path: impl Into<String>) -> Self {
        self.upstream_path = Some(path.into());
        self
    }

    /// Deadline for each upstream call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a custom upstream client instead of the HTTP one. URL, path and
    /// timeout settings are ignored when this is set.
    pub fn upstream(mut self, client: Arc<dyn UpstreamClient>) -> Self {
        self.upstream = Some(client);
        self
    }

    /// Time-to-live for cached results.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.cache_config.ttl = ttl;
        self
    }

    /// Capacity of the default in-memory store.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.cache_config.max_entries = n;
        self
    }

    /// Replace TTL and capacity in one go.
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Use a custom backing store instead of the in-memory one.
    pub fn cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache_store = Some(store);
        self
    }

    /// Build the gateway.
    pub fn build(self) -> Result<GeoGateway> {
        if self.cache_config.ttl.is_zero() {
            return Err(GeoGateError::Configuration(
                "cache TTL must be greater than zero".to_string(),
            ));
        }

        let upstream: Arc<dyn UpstreamClient> = match self.upstream {
            Some(client) => client,
            None => {
                let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
                if timeout.is_zero() {
                    return Err(GeoGateError::Configuration(
                        "upstream timeout must be greater than zero".to_string(),
                    ));
                }
                Arc::new(HttpUpstreamClient::with_options(
                    self.upstream_url
                        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                    self.upstream_path.as_deref().unwrap_or(DEFAULT_PATH),
                    timeout,
                )?)
            }
        };

        let cache = match self.cache_store {
            Some(store) => ResultCache::new(store),
            None => ResultCache::in_memory(&self.cache_config),
        };

        Ok(GeoGateway::new(cache, upstream, self.cache_config.ttl))
    }
}

impl Default for GeoGatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build() {
        let gateway = GeoGatewayBuilder::new().build().unwrap();
        assert_eq!(gateway.ttl(), Duration::from_secs(60));
        assert_eq!(gateway.cache().store_name(), "memory");
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let result = GeoGatewayBuilder::new().ttl(Duration::ZERO).build();
        assert!(matches!(result, Err(GeoGateError::Configuration(_))));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = GeoGatewayBuilder::new().timeout(Duration::ZERO).build();
        assert!(matches!(result, Err(GeoGateError::Configuration(_))));
    }

    #[test]
    fn from_config_carries_ttl() {
        let mut config = GatewayConfig::default();
        config.cache.ttl_secs = 30;
        let gateway = GeoGatewayBuilder::from_config(&config).build().unwrap();
        assert_eq!(gateway.ttl(), Duration::from_secs(30));
    }
}
