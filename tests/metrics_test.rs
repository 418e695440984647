//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use geogate::telemetry;
use geogate::{
    Bounds, CacheEntry, CacheStore, Centroid, Fingerprint, GeoGateError, GeoGateway, GeoResult,
    Point, PointSet, Result, UpstreamClient, UpstreamOutcome,
};

// ============================================================================
// Mocks
// ============================================================================

struct FixedUpstream(UpstreamOutcome);

#[async_trait]
impl UpstreamClient for FixedUpstream {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn call(&self, _points: &PointSet) -> UpstreamOutcome {
        self.0.clone()
    }
}

struct DeadStore;

#[async_trait]
impl CacheStore for DeadStore {
    fn name(&self) -> &str {
        "dead"
    }

    async fn get(&self, _key: &Fingerprint) -> Result<Option<CacheEntry>> {
        Err(GeoGateError::CacheUnavailable("down".into()))
    }

    async fn put(&self, _key: Fingerprint, _entry: CacheEntry) -> Result<()> {
        Err(GeoGateError::CacheUnavailable("down".into()))
    }
}

fn result() -> GeoResult {
    GeoResult {
        centroid: Centroid { lat: 1.0, lng: 2.0 },
        bounds: Bounds {
            north: 1.0,
            south: 1.0,
            east: 2.0,
            west: 2.0,
        },
    }
}

fn points() -> PointSet {
    PointSet::new(vec![Point::new(1.0, 2.0)]).unwrap()
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Sum counter values for `name` carrying label `label=value`.
fn labelled_counter(snapshot: &SnapshotVec, name: &str, label: &str, value: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.kind() == MetricKind::Counter
                && key.key().name() == name
                && key
                    .key()
                    .labels()
                    .any(|l| l.key() == label && l.value() == value)
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

// ============================================================================
// Tests
// ============================================================================

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn miss_then_hit_records_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let gateway = GeoGateway::builder()
                    .upstream(Arc::new(FixedUpstream(UpstreamOutcome::Success(result()))))
                    .build()
                    .unwrap();
                gateway.process(&points()).await.unwrap();
                gateway.process(&points()).await.unwrap();
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 1);
    assert_eq!(
        labelled_counter(
            &snapshot,
            telemetry::UPSTREAM_REQUESTS_TOTAL,
            "outcome",
            "success"
        ),
        1
    );
    assert!(
        has_histogram(&snapshot, telemetry::UPSTREAM_DURATION_SECONDS),
        "expected a duration histogram entry"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn unreachable_records_outcome_label() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let outcome = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let gateway = GeoGateway::builder()
                    .upstream(Arc::new(FixedUpstream(UpstreamOutcome::Unreachable(
                        "refused".into(),
                    ))))
                    .build()
                    .unwrap();
                gateway.process(&points()).await
            })
        })
    });
    assert!(outcome.is_err());

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(
        labelled_counter(
            &snapshot,
            telemetry::UPSTREAM_REQUESTS_TOTAL,
            "outcome",
            "unreachable"
        ),
        1
    );
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn cache_failures_are_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let outcome = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let gateway = GeoGateway::builder()
                    .upstream(Arc::new(FixedUpstream(UpstreamOutcome::Success(result()))))
                    .cache_store(Arc::new(DeadStore))
                    .build()
                    .unwrap();
                gateway.process(&points()).await
            })
        })
    });
    assert!(outcome.is_ok());

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(
        labelled_counter(&snapshot, telemetry::CACHE_ERRORS_TOTAL, "op", "get"),
        1
    );
    assert_eq!(
        labelled_counter(&snapshot, telemetry::CACHE_ERRORS_TOTAL, "op", "put"),
        1
    );
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let gateway = GeoGateway::builder()
        .upstream(Arc::new(FixedUpstream(UpstreamOutcome::Success(result()))))
        .build()
        .unwrap();
    gateway.process(&points()).await.unwrap();
}
