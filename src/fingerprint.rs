//! Deterministic cache keys for point batches.
//!
//! A [`Fingerprint`] is `geo:` followed by the lowercase hex SHA-256 of the
//! point batch's canonical JSON text (`[{"lat":..,"lng":..},..]`). Field
//! order is always `lat` then `lng` and numbers go through serde_json's
//! shortest round-trip formatting, so equal `f64` values give equal bytes.
//! Signed zero is folded to `0.0` first. Non-finite coordinates never get
//! here: [`PointSet::new`] rejects them, since JSON has no spelling for
//! them and they would all render as `null`.
//!
//! Collisions are not detected: two batches with the same fingerprint are
//! treated as the same request.

use std::fmt;

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::types::{Point, PointSet};

/// Namespace prefix separating geogate keys from others in a shared store.
pub const KEY_PREFIX: &str = "geo:";

/// Content-derived cache key for a [`PointSet`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of a point batch. Pure and total.
    pub fn of(points: &PointSet) -> Self {
        let canonical = canonical_text(points.points());
        let digest = Sha256::digest(canonical.as_bytes());
        Self(format!("{KEY_PREFIX}{}", hex::encode(digest)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// `[{"lat":..,"lng":..},..]` with no whitespace.
fn canonical_text(points: &[Point]) -> String {
    let items = points
        .iter()
        .map(|p| {
            let mut obj = Map::with_capacity(2);
            obj.insert("lat".to_string(), Value::from(fold_zero(p.lat)));
            obj.insert("lng".to_string(), Value::from(fold_zero(p.lng)));
            Value::Object(obj)
        })
        .collect();
    Value::Array(items).to_string()
}

fn fold_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}
