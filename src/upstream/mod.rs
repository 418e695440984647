//! Calls to the downstream compute service.
//!
//! [`UpstreamClient`] is the transport seam: the gateway only sees an
//! [`UpstreamOutcome`], never a transport error. [`HttpUpstreamClient`] is
//! the reqwest-backed implementation; tests substitute their own.

mod http;

pub use http::{DEFAULT_BASE_URL, DEFAULT_PATH, DEFAULT_TIMEOUT, HttpUpstreamClient};

use async_trait::async_trait;
use serde_json::Value;

use crate::types::{GeoResult, PointSet};

/// Classified result of one upstream call.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamOutcome {
    /// 2xx with a well-formed result body.
    Success(GeoResult),
    /// 400: the upstream rejected the points. Body passed through unchanged.
    ClientError(Value),
    /// Any other error status, or a 2xx whose body did not parse.
    ServerError { status: u16, payload: Value },
    /// No HTTP response at all: refused, reset, DNS failure, or timeout.
    Unreachable(String),
}

impl UpstreamOutcome {
    /// Short label used for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            UpstreamOutcome::Success(_) => "success",
            UpstreamOutcome::ClientError(_) => "client_error",
            UpstreamOutcome::ServerError { .. } => "server_error",
            UpstreamOutcome::Unreachable(_) => "unreachable",
        }
    }
}

/// A downstream service that turns a point batch into a [`GeoResult`].
///
/// Implementations make exactly one attempt per call and must bound it by a
/// deadline, reporting an overrun as [`UpstreamOutcome::Unreachable`].
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Client name for logs.
    fn name(&self) -> &str;

    async fn call(&self, points: &PointSet) -> UpstreamOutcome;
}
