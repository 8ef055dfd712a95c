use std::collections::HashMap;

use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{GeoPoint, RouteId, RouteStopId};
use crate::planner::FetchError;
use crate::transloc::fields::{self, lookup_array, lookup_i64, lookup_id, lookup_str};
use crate::transloc::{MapRouteRecord, MapStopRecord, VehiclePoint};

use super::source::MapDataSource;

/// Upcoming arrivals requested per stop when building the vehicle view.
pub const MAP_TIMES_PER_STOP: u32 = 10;

/// A route and the stops drawn along it.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRoute {
    pub route: MapRouteRecord,
    pub stops: Vec<MapStopRecord>,
}

/// A stop a vehicle is due at.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleStop {
    pub route_stop_id: Option<RouteStopId>,
    pub stop_name: String,
    /// Where the stop is, if the route's stop list has it.
    pub point: Option<GeoPoint>,
    pub arrival_seconds: Option<i64>,
}

/// A vehicle and the stops it will reach, in feed order.
#[derive(Debug, Clone, PartialEq)]
pub struct MapVehicle {
    pub vehicle: VehiclePoint,
    pub stops: Vec<VehicleStop>,
}

fn or_empty<T>(result: Result<Vec<T>, FetchError>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!(error = %e, "{what} unavailable");
        Vec::new()
    })
}

/// All routes with their stops.
///
/// Stop lists are fetched concurrently, one per route. A route whose stop
/// list fails is still drawn, with no stops.
pub async fn map_routes<S: MapDataSource>(source: &S) -> Vec<MapRoute> {
    let routes = or_empty(source.get_map_routes().await, "map routes");

    let stops = join_all(routes.iter().map(|r| source.get_map_stops(&r.route_id))).await;

    routes
        .into_iter()
        .zip(stops)
        .map(|(route, stops)| MapRoute {
            stops: or_empty(stops, "map stops"),
            route,
        })
        .collect()
}

/// All reporting vehicles with the stops each is due at.
///
/// For every route that has a vehicle, its arrival feed and stop list are
/// fetched concurrently with the other routes'. Vehicles keep the order
/// the position feed listed them in.
pub async fn map_vehicles<S: MapDataSource>(source: &S) -> Vec<MapVehicle> {
    let vehicles = or_empty(source.get_vehicle_points().await, "vehicle positions");

    let mut route_ids: Vec<&RouteId> = Vec::new();
    for id in vehicles.iter().filter_map(|v| v.route_id.as_ref()) {
        if !route_ids.contains(&id) {
            route_ids.push(id);
        }
    }

    let per_route = join_all(route_ids.iter().map(|id| route_visits(source, id))).await;

    let mut by_vehicle: HashMap<String, Vec<VehicleStop>> = HashMap::new();
    for (vehicle, stop) in per_route.into_iter().flatten() {
        by_vehicle.entry(vehicle).or_default().push(stop);
    }

    vehicles
        .iter()
        .map(|vehicle| MapVehicle {
            stops: vehicle
                .vehicle_id
                .as_ref()
                .and_then(|id| by_vehicle.get(id))
                .cloned()
                .unwrap_or_default(),
            vehicle: vehicle.clone(),
        })
        .collect()
}

async fn route_visits<S: MapDataSource>(source: &S, route_id: &RouteId) -> Vec<(String, VehicleStop)> {
    let (arrivals, stops) = futures::join!(
        source.get_stop_arrival_times(route_id, None, MAP_TIMES_PER_STOP),
        source.get_map_stops(route_id),
    );
    let arrivals = or_empty(arrivals, "map arrivals");
    let stops = or_empty(stops, "map stops");

    let visits = vehicle_visits(&arrivals, &stops);
    debug!(route = %route_id, visits = visits.len(), "vehicle stops");
    visits
}

/// Flatten arrival records into `(vehicle id, stop)` visits.
///
/// Each timing entry with a vehicle id becomes one visit. The stop name
/// comes from the arrival record, else from the matching entry in
/// `stops`; the position only ever comes from `stops`.
pub fn vehicle_visits(records: &[Value], stops: &[MapStopRecord]) -> Vec<(String, VehicleStop)> {
    let stops_by_id: HashMap<&RouteStopId, &MapStopRecord> = stops
        .iter()
        .filter_map(|s| Some((s.route_stop_id.as_ref()?, s)))
        .collect();

    let mut visits = Vec::new();
    for record in records.iter().filter_map(Value::as_object) {
        let route_stop_id = lookup_id(record, fields::ROUTE_STOP_ID).map(RouteStopId::new);
        let stop = route_stop_id.as_ref().and_then(|id| stops_by_id.get(id));
        let stop_name = lookup_str(record, fields::STOP_DESCRIPTION)
            .map(str::to_string)
            .or_else(|| stop.map(|s| s.description.clone()))
            .unwrap_or_default();

        let times = lookup_array(record, fields::TIMES).map(Vec::as_slice).unwrap_or_default();
        for time in times.iter().filter_map(Value::as_object) {
            let Some(vehicle) = lookup_id(time, fields::VEHICLE_ID) else {
                continue;
            };
            visits.push((
                vehicle,
                VehicleStop {
                    route_stop_id: route_stop_id.clone(),
                    stop_name: stop_name.clone(),
                    point: stop.map(|s| s.point),
                    arrival_seconds: lookup_i64(time, fields::SECONDS),
                },
            ));
        }
    }
    visits
}
