//! Caching layer for quasi-static TransLoc data.
//!
//! Stop lists and route details change a few times a semester, so they are
//! cached per route. Active routes and arrival estimates are live and always
//! go upstream. Failed fetches and empty answers are never cached: both mean
//! "no data right now", not "this route has no stops".

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use serde_json::Value;
use tracing::trace;

use crate::domain::{RouteId, RouteStopId};
use crate::map::MapDataSource;
use crate::planner::{FetchError, TransitDataSource};
use crate::transloc::{MapRouteRecord, MapStopRecord, RouteRecord, StopRecord, VehiclePoint};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached routes, per cache.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            max_capacity: 256,
        }
    }
}

/// A transit source with cached stop lists and route details.
pub struct CachedTransitSource<S> {
    inner: S,
    stops: MokaCache<RouteId, Arc<Vec<StopRecord>>>,
    details: MokaCache<RouteId, Arc<Vec<RouteRecord>>>,
}

impl<S: TransitDataSource> CachedTransitSource<S> {
    /// Wrap a source with the given cache configuration.
    pub fn new(inner: S, config: &CacheConfig) -> Self {
        Self {
            inner,
            stops: build_cache(config),
            details: build_cache(config),
        }
    }
}

fn build_cache<V>(config: &CacheConfig) -> MokaCache<RouteId, V>
where
    V: Clone + Send + Sync + 'static,
{
    MokaCache::builder()
        .time_to_live(config.ttl)
        .max_capacity(config.max_capacity)
        .build()
}

impl<S: TransitDataSource> TransitDataSource for CachedTransitSource<S> {
    async fn get_active_routes(&self) -> Result<Vec<RouteRecord>, FetchError> {
        self.inner.get_active_routes().await
    }

    async fn get_stops(&self, route_id: &RouteId) -> Result<Vec<StopRecord>, FetchError> {
        if let Some(cached) = self.stops.get(route_id).await {
            trace!(route = %route_id, "stop list cache hit");
            return Ok(cached.as_ref().clone());
        }

        let stops = self.inner.get_stops(route_id).await?;
        if !stops.is_empty() {
            self.stops
                .insert(route_id.clone(), Arc::new(stops.clone()))
                .await;
        }
        Ok(stops)
    }

    async fn get_route_details(&self, route_id: &RouteId) -> Result<Vec<RouteRecord>, FetchError> {
        if let Some(cached) = self.details.get(route_id).await {
            trace!(route = %route_id, "route details cache hit");
            return Ok(cached.as_ref().clone());
        }

        let details = self.inner.get_route_details(route_id).await?;
        if !details.is_empty() {
            self.details
                .insert(route_id.clone(), Arc::new(details.clone()))
                .await;
        }
        Ok(details)
    }

    async fn get_stop_arrival_times(
        &self,
        route_id: &RouteId,
        route_stop_id: Option<&RouteStopId>,
        limit_per_stop: u32,
    ) -> Result<Vec<Value>, FetchError> {
        self.inner
            .get_stop_arrival_times(route_id, route_stop_id, limit_per_stop)
            .await
    }
}

/// The map view is always fetched live.
impl<S: MapDataSource> MapDataSource for CachedTransitSource<S> {
    async fn get_map_routes(&self) -> Result<Vec<MapRouteRecord>, FetchError> {
        self.inner.get_map_routes().await
    }

    async fn get_map_stops(&self, route_id: &RouteId) -> Result<Vec<MapStopRecord>, FetchError> {
        self.inner.get_map_stops(route_id).await
    }

    async fn get_vehicle_points(&self) -> Result<Vec<VehiclePoint>, FetchError> {
        self.inner.get_vehicle_points().await
    }
}
