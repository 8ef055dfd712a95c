//! Domain types for the campus bus route planner.
//!
//! Plain values built fresh for every search from live upstream data.
//! Validating constructors guard anything that arrives from a request.

mod arrival;
mod error;
mod geo;
mod ids;
mod stop;
mod time;

pub use arrival::{ArrivalEstimate, derive_minutes, sort_by_seconds};
pub use error::DomainError;
pub use geo::{EARTH_RADIUS_M, GeoPoint, haversine_distance, round_to_tenth};
pub use ids::{RouteId, RouteStopId};
pub use stop::Stop;
pub use time::{format_clock_time, parse_transloc_timestamp};
