//! The upstream transit-data contract the planner consumes.

use std::future::Future;

use serde_json::Value;

use crate::domain::{RouteId, RouteStopId};
use crate::transloc::{RouteRecord, StopRecord};

/// An upstream fetch failed.
///
/// The planner never aborts on this: a failed fetch contributes nothing,
/// exactly like an empty one.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("failed to fetch {resource}: {message}")]
pub struct FetchError {
    pub resource: String,
    pub message: String,
}

/// Trait for providing live transit data.
///
/// This abstraction allows the planner to be tested with in-memory data.
/// Every operation may return an empty list to mean "no data".
pub trait TransitDataSource: Send + Sync {
    /// Routes currently operating.
    fn get_active_routes(
        &self,
    ) -> impl Future<Output = Result<Vec<RouteRecord>, FetchError>> + Send;

    /// Stops served by a route.
    fn get_stops(
        &self,
        route_id: &RouteId,
    ) -> impl Future<Output = Result<Vec<StopRecord>, FetchError>> + Send;

    /// Descriptive details for a route; the first element is canonical.
    fn get_route_details(
        &self,
        route_id: &RouteId,
    ) -> impl Future<Output = Result<Vec<RouteRecord>, FetchError>> + Send;

    /// Raw arrival records for a route, optionally narrowed to one stop.
    ///
    /// Records are left as JSON because their key spellings vary; the
    /// arrival resolver reads them through `transloc::fields`.
    fn get_stop_arrival_times(
        &self,
        route_id: &RouteId,
        route_stop_id: Option<&RouteStopId>,
        limit_per_stop: u32,
    ) -> impl Future<Output = Result<Vec<Value>, FetchError>> + Send;
}
