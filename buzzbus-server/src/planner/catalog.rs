//! Stop catalog: every stop of every active route.

use std::collections::HashSet;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::{RouteId, Stop};
use crate::transloc::RouteRecord;

use super::source::TransitDataSource;

/// One route and the stops it serves.
#[derive(Debug, Clone)]
pub struct RouteStops {
    pub route: RouteRecord,
    pub stops: Vec<Stop>,
}

/// Stops of all active routes, grouped by route.
///
/// Route ids are unique within a catalog: when upstream lists a route
/// twice the first listing wins and later ones are ignored. Routes keep
/// the order the upstream listed them in.
#[derive(Debug, Clone, Default)]
pub struct StopCatalog {
    routes: Vec<RouteStops>,
}

impl StopCatalog {
    /// Fetch the stop list of every route concurrently.
    ///
    /// One request per distinct route id, all in flight at once. Each
    /// result is paired with the route that requested it, never with the
    /// order of completion. A route whose fetch fails keeps an empty stop
    /// list and so can never become a candidate.
    pub async fn fetch<S: TransitDataSource>(source: &S, routes: Vec<RouteRecord>) -> Self {
        let routes = dedupe(routes, |r| &r.route_id);

        let results = join_all(routes.iter().map(|r| source.get_stops(&r.route_id))).await;

        let parts = routes
            .into_iter()
            .zip(results)
            .map(|(route, result)| {
                let records = result.unwrap_or_else(|e| {
                    warn!(route = %route.route_id, error = %e, "stop list unavailable");
                    Vec::new()
                });

                let stops = records
                    .into_iter()
                    .map(|r| Stop::new(r.point, r.description, route.route_id.clone(), r.route_stop_id))
                    .collect();

                (route, stops)
            })
            .collect();

        Self::from_parts(parts)
    }

    /// Build a catalog from already-fetched stops.
    ///
    /// Same duplicate rule as [`StopCatalog::fetch`]: the first part for a
    /// route id is kept, later ones are dropped.
    pub fn from_parts(parts: Vec<(RouteRecord, Vec<Stop>)>) -> Self {
        let routes = dedupe(parts, |(route, _)| &route.route_id)
            .into_iter()
            .map(|(route, stops)| RouteStops { route, stops })
            .collect();
        Self { routes }
    }

    pub fn routes(&self) -> &[RouteStops] {
        &self.routes
    }

    /// Number of routes that contributed at least one stop.
    pub fn routes_with_stops(&self) -> usize {
        self.routes.iter().filter(|r| !r.stops.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.routes_with_stops() == 0
    }
}

/// Drop repeated route ids, keeping the first occurrence.
fn dedupe<T>(items: Vec<T>, route_id: impl Fn(&T) -> &RouteId) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| {
            let id = route_id(item);
            let fresh = seen.insert(id.clone());
            if !fresh {
                debug!(route = %id, "duplicate active route ignored");
            }
            fresh
        })
        .collect()
}
