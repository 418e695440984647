//! Gateway orchestration

mod builder;
mod geo;

pub use builder::GeoGatewayBuilder;
pub use geo::GeoGateway;
