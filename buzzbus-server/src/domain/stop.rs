//! Stops tagged with their owning route.

use super::geo::GeoPoint;
use super::ids::{RouteId, RouteStopId};

/// A physical stop as served by one route.
///
/// `route_stop_id` may be absent when upstream omits it. Such a stop can
/// still be ranked by distance but its arrival times cannot be looked up.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub point: GeoPoint,
    pub description: String,
    pub route_id: RouteId,
    pub route_stop_id: Option<RouteStopId>,
}

impl Stop {
    pub fn new(
        point: GeoPoint,
        description: impl Into<String>,
        route_id: RouteId,
        route_stop_id: Option<RouteStopId>,
    ) -> Self {
        Self {
            point,
            description: description.into(),
            route_id,
            route_stop_id,
        }
    }

    /// Walking distance from this stop to a point, in meters.
    pub fn distance_to(&self, point: &GeoPoint) -> f64 {
        self.point.distance_to(point)
    }

    /// Whether two stops are the same physical place.
    ///
    /// Compared by description, so two route-stops sharing a kerb but
    /// carrying different route-stop ids still match.
    pub fn same_place_as(&self, other: &Stop) -> bool {
        self.description == other.description
    }
}
