//! Public types for the Geogate API.

mod point;
mod result;

pub use point::{NON_FINITE_ERROR, POINTS_ERROR, Point, PointSet, PointsRequest};
pub use result::{Bounds, Centroid, GeoResult};
