//! Mock TransLoc client for development without API access.
//!
//! Loads captured responses from JSON files and serves them as if they
//! were live API responses.

use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::domain::{RouteId, RouteStopId};
use crate::map::MapDataSource;
use crate::planner::{FetchError, TransitDataSource};

use super::convert::{
    active_routes, convert_map_routes, convert_map_stops, convert_routes, convert_stops,
    convert_vehicle_points, parse_array,
};
use super::error::TranslocError;
use super::fields::{self, lookup_id};
use super::types::{MapRouteRecord, MapStopRecord, RouteRecord, StopRecord, VehiclePoint};

/// Captured responses, one array per endpoint.
#[derive(Debug, Clone, Default)]
struct Fixtures {
    routes: Vec<Value>,
    map_routes: Vec<Value>,
    vehicles: Vec<Value>,
    stops: Vec<Value>,
    arrivals: Vec<Value>,
}

/// Mock TransLoc client that serves data from JSON files.
///
/// Expects a directory containing any of `GetRoutes.json`,
/// `GetRoutesForMapWithScheduleWithEncodedLine.json`,
/// `GetMapVehiclePoints.json`, `GetStops.json` and
/// `GetStopArrivalTimes.json`. Missing files serve empty lists. Stops and
/// arrival records must carry a `RouteID` so they can be filtered per
/// route the way the live API does.
#[derive(Clone)]
pub struct MockTranslocClient {
    fixtures: Arc<Fixtures>,
}

impl MockTranslocClient {
    /// Create a new mock client by loading JSON files from a directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, TranslocError> {
        let fixtures = load_fixtures(data_dir.as_ref())?;

        Ok(Self {
            fixtures: Arc::new(fixtures),
        })
    }

    /// Number of routes in the fixture set, active or not.
    pub fn route_count(&self) -> usize {
        self.fixtures.routes.len()
    }
}

fn load_fixtures(dir: &Path) -> Result<Fixtures, TranslocError> {
    if !dir.is_dir() {
        return Err(TranslocError::Fixture(format!(
            "mock data directory {dir:?} does not exist"
        )));
    }

    Ok(Fixtures {
        routes: load_array(dir, "GetRoutes.json")?,
        map_routes: load_array(dir, "GetRoutesForMapWithScheduleWithEncodedLine.json")?,
        vehicles: load_array(dir, "GetMapVehiclePoints.json")?,
        stops: load_array(dir, "GetStops.json")?,
        arrivals: load_array(dir, "GetStopArrivalTimes.json")?,
    })
}

fn load_array(dir: &Path, name: &str) -> Result<Vec<Value>, TranslocError> {
    let path = dir.join(name);
    if !path.exists() {
        return Ok(Vec::new());
    }

    let json = std::fs::read_to_string(&path)
        .map_err(|e| TranslocError::Fixture(format!("failed to read {path:?}: {e}")))?;

    parse_array(&json).map_err(|e| TranslocError::Fixture(format!("failed to parse {path:?}: {e}")))
}

fn belongs_to(item: &Value, route_id: &RouteId) -> bool {
    item.as_object()
        .and_then(|o| lookup_id(o, fields::ROUTE_ID))
        .is_some_and(|id| id == route_id.as_str())
}

/// Narrow an arrival record's timing list to `limit` entries.
fn truncate_times(record: &Value, limit: usize) -> Value {
    let Some(obj) = record.as_object() else {
        return record.clone();
    };

    let mut out: Map<String, Value> = obj.clone();
    for key in fields::TIMES.keys {
        if let Some(Value::Array(times)) = out.get_mut(*key) {
            times.truncate(limit);
        }
    }
    Value::Object(out)
}

impl MockTranslocClient {
    fn stop_items(&self, route_id: &RouteId) -> Vec<Value> {
        self.fixtures
            .stops
            .iter()
            .filter(|s| belongs_to(s, route_id))
            .cloned()
            .collect()
    }
}

impl TransitDataSource for MockTranslocClient {
    async fn get_active_routes(&self) -> Result<Vec<RouteRecord>, FetchError> {
        let fixtures = &self.fixtures;
        Ok(active_routes(
            convert_routes(&fixtures.routes),
            &fixtures.vehicles,
        ))
    }

    async fn get_stops(&self, route_id: &RouteId) -> Result<Vec<StopRecord>, FetchError> {
        Ok(convert_stops(&self.stop_items(route_id)))
    }

    async fn get_route_details(&self, route_id: &RouteId) -> Result<Vec<RouteRecord>, FetchError> {
        let fixtures = &self.fixtures;
        Ok(convert_routes(&fixtures.routes)
            .into_iter()
            .filter(|r| &r.route_id == route_id)
            .collect())
    }

    async fn get_stop_arrival_times(
        &self,
        route_id: &RouteId,
        route_stop_id: Option<&RouteStopId>,
        limit_per_stop: u32,
    ) -> Result<Vec<Value>, FetchError> {
        let fixtures = &self.fixtures;
        Ok(fixtures
            .arrivals
            .iter()
            .filter(|a| belongs_to(a, route_id))
            .filter(|a| match route_stop_id {
                Some(wanted) => a
                    .as_object()
                    .and_then(|o| lookup_id(o, fields::ROUTE_STOP_ID))
                    .is_some_and(|id| id == wanted.as_str()),
                None => true,
            })
            .map(|a| truncate_times(a, limit_per_stop as usize))
            .collect())
    }
}

impl MapDataSource for MockTranslocClient {
    async fn get_map_routes(&self) -> Result<Vec<MapRouteRecord>, FetchError> {
        Ok(convert_map_routes(&self.fixtures.map_routes))
    }

    async fn get_map_stops(&self, route_id: &RouteId) -> Result<Vec<MapStopRecord>, FetchError> {
        Ok(convert_map_stops(&self.stop_items(route_id), route_id))
    }

    async fn get_vehicle_points(&self) -> Result<Vec<VehiclePoint>, FetchError> {
        Ok(convert_vehicle_points(&self.fixtures.vehicles))
    }
}
