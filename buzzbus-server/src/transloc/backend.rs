//! Live-or-mock upstream selection.

use serde_json::Value;

use crate::domain::{RouteId, RouteStopId};
use crate::map::MapDataSource;
use crate::planner::{FetchError, TransitDataSource};

use super::client::TranslocClient;
use super::mock::MockTranslocClient;
use super::types::{MapRouteRecord, MapStopRecord, RouteRecord, StopRecord, VehiclePoint};

/// The upstream the server talks to, chosen at startup.
#[derive(Clone)]
pub enum TransitBackend {
    Live(TranslocClient),
    Mock(MockTranslocClient),
}

impl TransitDataSource for TransitBackend {
    async fn get_active_routes(&self) -> Result<Vec<RouteRecord>, FetchError> {
        match self {
            TransitBackend::Live(c) => c.get_active_routes().await,
            TransitBackend::Mock(m) => m.get_active_routes().await,
        }
    }

    async fn get_stops(&self, route_id: &RouteId) -> Result<Vec<StopRecord>, FetchError> {
        match self {
            TransitBackend::Live(c) => c.get_stops(route_id).await,
            TransitBackend::Mock(m) => m.get_stops(route_id).await,
        }
    }

    async fn get_route_details(&self, route_id: &RouteId) -> Result<Vec<RouteRecord>, FetchError> {
        match self {
            TransitBackend::Live(c) => c.get_route_details(route_id).await,
            TransitBackend::Mock(m) => m.get_route_details(route_id).await,
        }
    }

    async fn get_stop_arrival_times(
        &self,
        route_id: &RouteId,
        route_stop_id: Option<&RouteStopId>,
        limit_per_stop: u32,
    ) -> Result<Vec<Value>, FetchError> {
        match self {
            TransitBackend::Live(c) => {
                c.get_stop_arrival_times(route_id, route_stop_id, limit_per_stop)
                    .await
            }
            TransitBackend::Mock(m) => {
                m.get_stop_arrival_times(route_id, route_stop_id, limit_per_stop)
                    .await
            }
        }
    }
}

impl MapDataSource for TransitBackend {
    async fn get_map_routes(&self) -> Result<Vec<MapRouteRecord>, FetchError> {
        match self {
            TransitBackend::Live(c) => c.get_map_routes().await,
            TransitBackend::Mock(m) => m.get_map_routes().await,
        }
    }

    async fn get_map_stops(&self, route_id: &RouteId) -> Result<Vec<MapStopRecord>, FetchError> {
        match self {
            TransitBackend::Live(c) => c.get_map_stops(route_id).await,
            TransitBackend::Mock(m) => m.get_map_stops(route_id).await,
        }
    }

    async fn get_vehicle_points(&self) -> Result<Vec<VehiclePoint>, FetchError> {
        match self {
            TransitBackend::Live(c) => c.get_vehicle_points().await,
            TransitBackend::Mock(m) => m.get_vehicle_points().await,
        }
    }
}
