//! Geogate - caching gateway for geographic point batches
//!
//! This crate sits in front of a compute service that turns a batch of
//! latitude/longitude points into a centroid and bounding box. Each batch
//! is fingerprinted, results are served from a TTL cache when possible,
//! and upstream failures are classified into caller errors
//! ([`GeoGateError::BadRequest`]) and gateway errors
//! ([`GeoGateError::BadGateway`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use geogate::{GeoGateway, Point, PointSet};
//!
//! #[tokio::main]
//! async fn main() -> geogate::Result<()> {
//!     let gateway = GeoGateway::builder()
//!         .upstream_url("http://localhost:8000")
//!         .ttl(Duration::from_secs(60))
//!         .build()?;
//!
//!     let points = PointSet::new(vec![
//!         Point::new(19.4326, -99.1332),
//!         Point::new(40.7128, -74.006),
//!     ])?;
//!
//!     let result = gateway.process(&points).await?;
//!     println!("centroid: {:?}", result.centroid);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod gateway;
pub mod telemetry;
pub mod types;
pub mod upstream;
mod version;

// Re-export main types at crate root
pub use cache::{CacheConfig, CacheEntry, CacheStore, MemoryStore, ResultCache};
pub use config::GatewayConfig;
pub use error::{GeoGateError, Result};
pub use fingerprint::Fingerprint;
pub use gateway::{GeoGateway, GeoGatewayBuilder};
pub use types::{Bounds, Centroid, GeoResult, Point, PointSet};
pub use upstream::{HttpUpstreamClient, UpstreamClient, UpstreamOutcome};
pub use version::{PKG_VERSION, USER_AGENT, version_string};
