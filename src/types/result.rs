//! Upstream computation result

use serde::{Deserialize, Serialize};

/// Mean position of a point batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub lat: f64,
    pub lng: f64,
}

/// Bounding box of a point batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// Result produced by the upstream service. Stored and forwarded as-is;
/// the gateway never interprets the numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoResult {
    pub centroid: Centroid,
    pub bounds: Bounds,
}
