//! Telemetry metric name constants.
//!
//! Centralised metric names for geogate operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `geogate_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `outcome` — upstream classification: "success", "client_error",
//!   "server_error" or "unreachable"
//! - `op` — cache operation that failed: "get" or "put"

/// Total cache lookups that returned a live result.
pub const CACHE_HITS_TOTAL: &str = "geogate_cache_hits_total";

/// Total cache lookups that found nothing or an expired entry.
pub const CACHE_MISSES_TOTAL: &str = "geogate_cache_misses_total";

/// Total cache store failures, swallowed by the gateway.
///
/// Labels: `op` ("get" | "put").
pub const CACHE_ERRORS_TOTAL: &str = "geogate_cache_errors_total";

/// Total upstream calls.
///
/// Labels: `outcome`.
pub const UPSTREAM_REQUESTS_TOTAL: &str = "geogate_upstream_requests_total";

/// Upstream call duration in seconds.
///
/// Labels: `outcome`.
pub const UPSTREAM_DURATION_SECONDS: &str = "geogate_upstream_duration_seconds";
