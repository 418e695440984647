//! Geogate error types

use serde_json::Value;

/// Message used when no response came back from the upstream service.
pub const UNREACHABLE_MESSAGE: &str = "Could not reach upstream service";

/// Message used when the upstream returned an error status without a body.
pub const UPSTREAM_ERROR_MESSAGE: &str = "Upstream error";

/// Geogate error types
#[derive(Debug, thiserror::Error)]
pub enum GeoGateError {
    // Caller-facing errors
    /// The upstream service rejected the points as malformed. The payload is
    /// the upstream's own validation message, passed through unchanged.
    #[error("bad request: {0}")]
    BadRequest(Value),

    /// The upstream failed, answered with something unparseable, or could
    /// not be reached at all.
    #[error("bad gateway: {0}")]
    BadGateway(Value),

    // Internal errors
    /// Backing cache store is unavailable. Never surfaced by
    /// [`GeoGateway::process`](crate::GeoGateway::process).
    #[error("cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GeoGateError {
    /// Build a `BadGateway` carrying the generic "could not reach" message.
    pub fn unreachable() -> Self {
        GeoGateError::BadGateway(Value::String(UNREACHABLE_MESSAGE.to_string()))
    }

    /// HTTP status an inbound controller should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            GeoGateError::BadRequest(_) => 400,
            GeoGateError::BadGateway(_) => 502,
            _ => 500,
        }
    }

    /// Payload carried by caller-facing errors; other variants render their
    /// display string.
    pub fn payload(&self) -> Value {
        match self {
            GeoGateError::BadRequest(v) | GeoGateError::BadGateway(v) => v.clone(),
            other => Value::String(other.to_string()),
        }
    }

    /// Whether the error is the caller's fault (their input was rejected).
    pub fn is_caller_error(&self) -> bool {
        matches!(self, GeoGateError::BadRequest(_))
    }
}

/// Result type alias for Geogate operations
pub type Result<T> = std::result::Result<T, GeoGateError>;
