//! GeoGateway - fingerprint, cache, forward.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, instrument, warn};

use super::GeoGatewayBuilder;
use crate::cache::ResultCache;
use crate::fingerprint::Fingerprint;
use crate::telemetry;
use crate::types::{GeoResult, PointSet};
use crate::upstream::{UpstreamClient, UpstreamOutcome};
use crate::{GeoGateError, Result};

/// Caching gateway in front of the compute service.
///
/// Each [`process`](Self::process) call is independent; the only state
/// shared between concurrent calls is the [`ResultCache`]. Concurrent
/// misses on the same fingerprint each call upstream and the last write
/// wins.
pub struct GeoGateway {
    cache: ResultCache,
    upstream: Arc<dyn UpstreamClient>,
    ttl: Duration,
}

impl GeoGateway {
    /// Create a new builder for configuring the gateway.
    pub fn builder() -> GeoGatewayBuilder {
        GeoGatewayBuilder::new()
    }

    pub(crate) fn new(
        cache: ResultCache,
        upstream: Arc<dyn UpstreamClient>,
        ttl: Duration,
    ) -> Self {
        Self {
            cache,
            upstream,
            ttl,
        }
    }

    /// The result cache this gateway reads and populates.
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// TTL applied to newly cached results.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Resolve a point batch to its result.
    ///
    /// A live cache entry is returned without calling upstream. On a miss
    /// the upstream is called once; only a success is cached. Cache
    /// failures are logged and never fail the request.
    ///
    /// # Errors
    ///
    /// - [`GeoGateError::BadRequest`] when the upstream rejected the points
    ///   (HTTP 400), carrying its body verbatim.
    /// - [`GeoGateError::BadGateway`] for any other upstream failure.
    #[instrument(name = "gateway.process", skip_all, fields(points = points.len()))]
    pub async fn process(&self, points: &PointSet) -> Result<GeoResult> {
        let key = Fingerprint::of(points);

        match self.cache.get(&key).await {
            Ok(Some(hit)) => {
                debug!(%key, "cache hit");
                return Ok(hit);
            }
            Ok(None) => debug!(%key, "cache miss"),
            Err(e) => {
                metrics::counter!(telemetry::CACHE_ERRORS_TOTAL, "op" => "get").increment(1);
                warn!(
                    %key,
                    store = self.cache.store_name(),
                    error = %e,
                    "cache read failed, bypassing cache"
                );
            }
        }

        match self.call_upstream(points).await {
            UpstreamOutcome::Success(result) => {
                if let Err(e) = self.cache.put(key.clone(), result, self.ttl).await {
                    metrics::counter!(telemetry::CACHE_ERRORS_TOTAL, "op" => "put").increment(1);
                    warn!(
                        %key,
                        store = self.cache.store_name(),
                        error = %e,
                        "cache write failed"
                    );
                }
                Ok(result)
            }
            UpstreamOutcome::ClientError(payload) => Err(GeoGateError::BadRequest(payload)),
            UpstreamOutcome::ServerError { payload, .. } => Err(GeoGateError::BadGateway(payload)),
            UpstreamOutcome::Unreachable(cause) => {
                warn!(
                    %key,
                    upstream = self.upstream.name(),
                    cause = %cause,
                    "upstream unreachable"
                );
                Err(GeoGateError::unreachable())
            }
        }
    }

    /// Call upstream once, recording outcome metrics.
    async fn call_upstream(&self, points: &PointSet) -> UpstreamOutcome {
        let start = Instant::now();
        let outcome = self.upstream.call(points).await;
        let label = outcome.label();
        metrics::counter!(telemetry::UPSTREAM_REQUESTS_TOTAL, "outcome" => label).increment(1);
        metrics::histogram!(telemetry::UPSTREAM_DURATION_SECONDS, "outcome" => label)
            .record(start.elapsed().as_secs_f64());
        outcome
    }
}
