//! TransLoc client.
//!
//! HTTP client for the TransLoc JSONP relay that publishes the campus
//! shuttle feed, plus a fixture-backed mock for development.
//!
//! Key characteristics of TransLoc:
//! - Responses are bare JSON arrays; `null` means "no data"
//! - Key casing differs between endpoints, so every read goes through
//!   the accepted-spellings table in `fields`
//! - Ids arrive as numbers or strings depending on the endpoint

mod backend;
mod client;
mod convert;
mod error;
pub mod fields;
mod mock;
mod types;

pub use backend::TransitBackend;
pub use client::{DEFAULT_BASE_URL, TranslocClient, TranslocConfig};
pub use convert::{
    active_routes, convert_map_routes, convert_map_stops, convert_routes, convert_stops,
    convert_vehicle_points,
};
pub use error::TranslocError;
pub use mock::MockTranslocClient;
pub use types::{MapRouteRecord, MapStopRecord, RouteRecord, StopRecord, VehiclePoint};
