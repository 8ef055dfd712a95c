use std::future::Future;

use crate::domain::RouteId;
use crate::planner::{FetchError, TransitDataSource};
use crate::transloc::{MapRouteRecord, MapStopRecord, VehiclePoint};

/// Upstream data for the map, on top of what the planner reads.
///
/// Arrival records come from [`TransitDataSource::get_stop_arrival_times`].
pub trait MapDataSource: TransitDataSource {
    /// Every route with its display settings, running or not.
    fn get_map_routes(
        &self,
    ) -> impl Future<Output = Result<Vec<MapRouteRecord>, FetchError>> + Send;

    /// Stops served by a route, with display flags.
    fn get_map_stops(
        &self,
        route_id: &RouteId,
    ) -> impl Future<Output = Result<Vec<MapStopRecord>, FetchError>> + Send;

    /// Current vehicle positions.
    fn get_vehicle_points(
        &self,
    ) -> impl Future<Output = Result<Vec<VehiclePoint>, FetchError>> + Send;
}
