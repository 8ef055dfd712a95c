//! Records read from TransLoc responses.
//!
//! TransLoc returns loosely-typed JSON, so these are built field by field
//! in `convert` rather than derived with serde.

use crate::domain::{GeoPoint, RouteId, RouteStopId};

/// A route from `GetRoutes`.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRecord {
    pub route_id: RouteId,
    /// Human-readable route name (e.g. "Red Route").
    pub description: String,
}

/// A stop from `GetStops`, not yet tagged with its route.
#[derive(Debug, Clone, PartialEq)]
pub struct StopRecord {
    pub point: GeoPoint,
    pub description: String,
    pub route_stop_id: Option<RouteStopId>,
}

/// A route from `GetRoutesForMapWithScheduleWithEncodedLine`, with what
/// the map needs to draw it.
///
/// Absent display fields take TransLoc's own defaults: black line, zero
/// centre and zoom, hidden.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRouteRecord {
    pub route_id: RouteId,
    pub description: String,
    /// `#rrggbb`
    pub line_color: String,
    pub map_latitude: f64,
    pub map_longitude: f64,
    pub map_zoom: i64,
    pub is_visible_on_map: bool,
    pub is_checked_on_map: bool,
    pub hide_route_line: bool,
    /// Google encoded polyline of the route path; empty when not drawn.
    pub encoded_polyline: String,
}

/// A stop from `GetStops` with its map display flags.
#[derive(Debug, Clone, PartialEq)]
pub struct MapStopRecord {
    pub route_stop_id: Option<RouteStopId>,
    pub route_id: RouteId,
    pub description: String,
    pub point: GeoPoint,
    /// Position along the route.
    pub order: i64,
    pub show_estimates_on_map: bool,
    pub show_defaulted_on_map: bool,
}

/// A vehicle position from `GetMapVehiclePoints`.
#[derive(Debug, Clone, PartialEq)]
pub struct VehiclePoint {
    pub vehicle_id: Option<String>,
    pub route_id: Option<RouteId>,
    pub name: String,
    pub point: GeoPoint,
    pub ground_speed: f64,
    /// Degrees clockwise from north.
    pub heading: f64,
    /// Age of the position fix.
    pub seconds: i64,
    pub is_on_route: bool,
    pub is_delayed: bool,
}
