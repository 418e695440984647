//! HTTP client for the compute service.
//!
//! Sends `POST {base_url}{path}` with body `{"points": [...]}` and expects
//! `{"centroid": {..}, "bounds": {..}}` back.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{error, instrument, warn};

use super::{UpstreamClient, UpstreamOutcome};
use crate::error::UPSTREAM_ERROR_MESSAGE;
use crate::types::{GeoResult, PointSet, PointsRequest};
use crate::{GeoGateError, Result, USER_AGENT};

/// Default base URL of the compute service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Path appended to the base URL.
pub const DEFAULT_PATH: &str = "/process";

/// Deadline for a whole upstream call, including reading the body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// reqwest-backed [`UpstreamClient`].
#[derive(Clone)]
pub struct HttpUpstreamClient {
    http: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpUpstreamClient {
    /// Create a client for the given base URL with the default path and
    /// timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_options(base_url, DEFAULT_PATH, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit path and timeout.
    pub fn with_options(
        base_url: impl Into<String>,
        path: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                GeoGateError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            endpoint: join_url(&base_url.into(), path),
            timeout,
        })
    }

    /// Full URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Map a non-2xx response to an outcome.
    fn classify_error(&self, status: u16, body: Option<Value>) -> UpstreamOutcome {
        if status == 400 {
            return UpstreamOutcome::ClientError(body.unwrap_or(Value::Null));
        }
        warn!(status, endpoint = %self.endpoint, "upstream returned error status");
        UpstreamOutcome::ServerError {
            status,
            payload: body.unwrap_or_else(|| Value::String(UPSTREAM_ERROR_MESSAGE.to_string())),
        }
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(
        name = "upstream.call",
        skip_all,
        fields(endpoint = %self.endpoint, points = points.len())
    )]
    async fn call(&self, points: &PointSet) -> UpstreamOutcome {
        let response = match self
            .http
            .post(&self.endpoint)
            .json(&PointsRequest::from(points))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return unreachable_outcome(&e, self.timeout),
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return unreachable_outcome(&e, self.timeout),
        };

        if status.is_success() {
            return match serde_json::from_slice::<GeoResult>(&bytes) {
                Ok(result) => UpstreamOutcome::Success(result),
                Err(e) => {
                    warn!(error = %e, "malformed upstream response body");
                    UpstreamOutcome::ServerError {
                        status: 502,
                        payload: Value::String(format!("Malformed upstream response: {e}")),
                    }
                }
            };
        }

        self.classify_error(status.as_u16(), parse_body(&bytes))
    }
}

fn unreachable_outcome(e: &reqwest::Error, timeout: Duration) -> UpstreamOutcome {
    let cause = if e.is_timeout() {
        format!("timed out after {timeout:?}")
    } else {
        e.to_string()
    };
    error!(cause = %cause, "could not reach upstream");
    UpstreamOutcome::Unreachable(cause)
}

/// Error bodies are passed through as JSON when they parse, as a string
/// otherwise, and dropped when empty.
fn parse_body(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(String::from_utf8_lossy(bytes).into_owned())),
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    format!("{base}/{}", path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_handles_slashes() {
        assert_eq!(join_url("http://h:8000", "/process"), "http://h:8000/process");
        assert_eq!(join_url("http://h:8000/", "/process"), "http://h:8000/process");
        assert_eq!(join_url("http://h:8000/", "process"), "http://h:8000/process");
        assert_eq!(join_url("http://h:8000/api", ""), "http://h:8000/api");
    }

    #[test]
    fn parse_body_variants() {
        assert_eq!(parse_body(b""), None);
        assert_eq!(parse_body(b"  \n"), None);
        assert_eq!(
            parse_body(br#"{"detail":"bad"}"#),
            Some(serde_json::json!({"detail": "bad"}))
        );
        assert_eq!(
            parse_body(b"oops"),
            Some(Value::String("oops".to_string()))
        );
    }

    #[test]
    fn default_endpoint() {
        let client = HttpUpstreamClient::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8000/process");
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn classify_400_keeps_body() {
        let client = HttpUpstreamClient::new(DEFAULT_BASE_URL).unwrap();
        let body = serde_json::json!({"detail": "bad"});
        assert_eq!(
            client.classify_error(400, Some(body.clone())),
            UpstreamOutcome::ClientError(body)
        );
    }

    #[test]
    fn classify_other_status_defaults_message() {
        let client = HttpUpstreamClient::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(
            client.classify_error(503, None),
            UpstreamOutcome::ServerError {
                status: 503,
                payload: Value::String(UPSTREAM_ERROR_MESSAGE.to_string()),
            }
        );
    }
}
