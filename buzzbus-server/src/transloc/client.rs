//! TransLoc JSONP relay HTTP client.
//!
//! Provides async methods for the handful of TransLoc endpoints the planner
//! needs. Handles authentication, concurrency limiting, and conversion to
//! typed records.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{RouteId, RouteStopId};
use crate::map::MapDataSource;
use crate::planner::{FetchError, TransitDataSource};

use super::convert::{
    active_routes, convert_map_routes, convert_map_stops, convert_routes, convert_stops,
    convert_vehicle_points, parse_array,
};
use super::error::TranslocError;
use super::types::{MapRouteRecord, MapStopRecord, RouteRecord, StopRecord, VehiclePoint};

/// Default base URL for the Georgia Tech TransLoc relay.
pub const DEFAULT_BASE_URL: &str = "https://gatech.transloc.com/Services/JSONPRelay.svc";

/// In-flight request cap. A search for N active routes issues N stop
/// requests at once, then three per candidate.
const DEFAULT_MAX_CONCURRENT: NonZeroUsize = NonZeroUsize::new(10).unwrap();

/// Per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the TransLoc relay.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslocConfig {
    /// Sent as the `APIKey` query parameter on every request.
    pub api_key: String,
    /// Relay root; endpoint names are appended after a `/`.
    pub base_url: String,
    pub max_concurrent: NonZeroUsize,
    pub timeout: Duration,
}

impl TranslocConfig {
    /// Config for the relay at `base_url` with default limits.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// URL of one relay endpoint.
    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint)
    }
}

/// TransLoc API client.
///
/// Uses a semaphore to bound concurrent requests; the planner fans out one
/// request per route and per candidate stop.
#[derive(Debug, Clone)]
pub struct TranslocClient {
    http: reqwest::Client,
    config: TranslocConfig,
    semaphore: Arc<Semaphore>,
}

impl TranslocClient {
    /// Create a new TransLoc client with the given configuration.
    pub fn new(config: TranslocConfig) -> Result<Self, TranslocError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.get())),
            config,
        })
    }

    /// GET an endpoint and return its body as a JSON array.
    async fn get_array(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<Value>, TranslocError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| TranslocError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = self.config.endpoint_url(endpoint);
        debug!(%endpoint, ?params, "TransLoc request");

        let response = self
            .http
            .get(&url)
            .query(&[("APIKey", self.config.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(TranslocError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TranslocError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslocError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        parse_array(&body).map_err(|e| TranslocError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }

    /// All routes configured on the system, active or not.
    pub async fn get_all_routes(&self) -> Result<Vec<RouteRecord>, TranslocError> {
        let items = self.get_array("GetRoutes", &[]).await?;
        Ok(convert_routes(&items))
    }

    /// Raw vehicle positions.
    pub async fn get_map_vehicle_points(&self) -> Result<Vec<Value>, TranslocError> {
        self.get_array("GetMapVehiclePoints", &[]).await
    }

    /// Routes that currently have at least one vehicle reporting.
    ///
    /// The route list and vehicle list are fetched concurrently.
    pub async fn fetch_active_routes(&self) -> Result<Vec<RouteRecord>, TranslocError> {
        let (routes, vehicles) =
            futures::try_join!(self.get_all_routes(), self.get_map_vehicle_points())?;
        Ok(active_routes(routes, &vehicles))
    }

    async fn get_stop_items(&self, route_id: &RouteId) -> Result<Vec<Value>, TranslocError> {
        self.get_array("GetStops", &[("routeID", route_id.to_string())])
            .await
    }

    /// Stops served by one route.
    pub async fn fetch_stops(&self, route_id: &RouteId) -> Result<Vec<StopRecord>, TranslocError> {
        Ok(convert_stops(&self.get_stop_items(route_id).await?))
    }

    /// Stops served by one route, with map display flags.
    pub async fn fetch_map_stops(
        &self,
        route_id: &RouteId,
    ) -> Result<Vec<MapStopRecord>, TranslocError> {
        Ok(convert_map_stops(&self.get_stop_items(route_id).await?, route_id))
    }

    /// Every route with its map styling and encoded path.
    pub async fn fetch_map_routes(&self) -> Result<Vec<MapRouteRecord>, TranslocError> {
        let items = self
            .get_array("GetRoutesForMapWithScheduleWithEncodedLine", &[])
            .await?;
        Ok(convert_map_routes(&items))
    }

    /// Current vehicle positions.
    pub async fn fetch_vehicle_points(&self) -> Result<Vec<VehiclePoint>, TranslocError> {
        Ok(convert_vehicle_points(&self.get_map_vehicle_points().await?))
    }

    /// Descriptive details for one route.
    pub async fn fetch_route_details(
        &self,
        route_id: &RouteId,
    ) -> Result<Vec<RouteRecord>, TranslocError> {
        let items = self
            .get_array("GetRoutes", &[("routeID", route_id.to_string())])
            .await?;
        Ok(convert_routes(&items))
    }

    /// Raw arrival records for a route, optionally narrowed to one stop.
    pub async fn fetch_stop_arrival_times(
        &self,
        route_id: &RouteId,
        route_stop_id: Option<&RouteStopId>,
        times_per_stop: u32,
    ) -> Result<Vec<Value>, TranslocError> {
        let mut params = vec![
            ("routeIDs", route_id.to_string()),
            ("timesPerStop", times_per_stop.to_string()),
        ];
        if let Some(stop) = route_stop_id {
            params.push(("routeStopIDs", stop.to_string()));
        }
        self.get_array("GetStopArrivalTimes", &params).await
    }
}

impl TransitDataSource for TranslocClient {
    async fn get_active_routes(&self) -> Result<Vec<RouteRecord>, FetchError> {
        self.fetch_active_routes()
            .await
            .map_err(|e| e.into_fetch_error("active routes"))
    }

    async fn get_stops(&self, route_id: &RouteId) -> Result<Vec<StopRecord>, FetchError> {
        self.fetch_stops(route_id)
            .await
            .map_err(|e| e.into_fetch_error(format!("stops for route {route_id}")))
    }

    async fn get_route_details(&self, route_id: &RouteId) -> Result<Vec<RouteRecord>, FetchError> {
        self.fetch_route_details(route_id)
            .await
            .map_err(|e| e.into_fetch_error(format!("details for route {route_id}")))
    }

    async fn get_stop_arrival_times(
        &self,
        route_id: &RouteId,
        route_stop_id: Option<&RouteStopId>,
        limit_per_stop: u32,
    ) -> Result<Vec<Value>, FetchError> {
        self.fetch_stop_arrival_times(route_id, route_stop_id, limit_per_stop)
            .await
            .map_err(|e| e.into_fetch_error(format!("arrivals for route {route_id}")))
    }
}

impl MapDataSource for TranslocClient {
    async fn get_map_routes(&self) -> Result<Vec<MapRouteRecord>, FetchError> {
        self.fetch_map_routes()
            .await
            .map_err(|e| e.into_fetch_error("map routes"))
    }

    async fn get_map_stops(&self, route_id: &RouteId) -> Result<Vec<MapStopRecord>, FetchError> {
        self.fetch_map_stops(route_id)
            .await
            .map_err(|e| e.into_fetch_error(format!("map stops for route {route_id}")))
    }

    async fn get_vehicle_points(&self) -> Result<Vec<VehiclePoint>, FetchError> {
        self.fetch_vehicle_points()
            .await
            .map_err(|e| e.into_fetch_error("vehicle positions"))
    }
}
