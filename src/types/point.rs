//! Input point types

use serde::{Deserialize, Serialize};

use crate::{GeoGateError, Result};

/// Message returned when a point batch is empty.
pub const POINTS_ERROR: &str = "points must be a non-empty array of {lat,lng}.";

/// Message returned when a coordinate is NaN or infinite.
pub const NON_FINITE_ERROR: &str = "lat and lng must be finite numbers.";

/// A single latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Ordered, non-empty batch of points forming one request's input.
///
/// Serializes as a plain JSON array. Deserializing an empty array fails,
/// so a `PointSet` in hand always has at least one point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct PointSet(Vec<Point>);

impl PointSet {
    /// Create a point set, rejecting an empty batch or any NaN/infinite
    /// coordinate.
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if points.is_empty() {
            return Err(GeoGateError::BadRequest(serde_json::json!({
                "detail": POINTS_ERROR
            })));
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(GeoGateError::BadRequest(serde_json::json!({
                "detail": NON_FINITE_ERROR,
                "index": index
            })));
        }
        Ok(Self(points))
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<Point>> for PointSet {
    type Error = GeoGateError;

    fn try_from(points: Vec<Point>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<PointSet> for Vec<Point> {
    fn from(set: PointSet) -> Self {
        set.0
    }
}

/// Wire body sent to the upstream compute service: `{"points": [...]}`.
#[derive(Debug, Serialize)]
pub struct PointsRequest<'a> {
    pub points: &'a [Point],
}

impl<'a> From<&'a PointSet> for PointsRequest<'a> {
    fn from(set: &'a PointSet) -> Self {
        Self {
            points: set.points(),
        }
    }
}
