//! Route ranking by walking distance.
//!
//! Each route is judged on its own: the stop nearest the start point is
//! where you board, the stop nearest the destination is where you get
//! off, and the route costs the sum of the two walks.

use tracing::trace;

use crate::domain::{GeoPoint, RouteId, Stop};

use super::catalog::StopCatalog;
use super::config::PlannerConfig;

/// A route admitted past the walking thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteCandidate {
    pub route_id: RouteId,
    pub begin_stop: Stop,
    pub dest_stop: Stop,
    /// Walk from the start point to `begin_stop` (meters, unrounded).
    pub begin_distance_m: f64,
    /// Walk from `dest_stop` to the destination (meters, unrounded).
    pub dest_distance_m: f64,
    /// Leg sum plus any same-stop penalty. This is the ranking key.
    pub total_cost_m: f64,
    /// Whether both ends resolved to the same physical stop.
    pub same_stop: bool,
}

/// Nearest stop to a point, with its distance.
///
/// On ties the first stop in upstream order wins.
fn nearest<'a>(stops: &'a [Stop], point: &GeoPoint) -> Option<(&'a Stop, f64)> {
    stops
        .iter()
        .map(|s| (s, s.distance_to(point)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Choose the boarding and alighting stops for one route.
///
/// Returns `None` if the route has no stops or if either walk exceeds
/// `config.leg_threshold_m`. The threshold is applied to the raw legs,
/// before any penalty. A route whose two chosen stops are the same place is
/// kept but made `config.same_stop_penalty_m` more expensive.
pub fn best_stop_pair(
    route_id: &RouteId,
    stops: &[Stop],
    begin: &GeoPoint,
    dest: &GeoPoint,
    config: &PlannerConfig,
) -> Option<RouteCandidate> {
    let (begin_stop, begin_distance_m) = nearest(stops, begin)?;
    if begin_distance_m > config.leg_threshold_m {
        trace!(route = %route_id, begin_distance_m, "boarding walk too long");
        return None;
    }

    let (dest_stop, dest_distance_m) = nearest(stops, dest)?;
    if dest_distance_m > config.leg_threshold_m {
        trace!(route = %route_id, dest_distance_m, "alighting walk too long");
        return None;
    }

    let same_stop = begin_stop.same_place_as(dest_stop);
    let mut total_cost_m = begin_distance_m + dest_distance_m;
    if same_stop {
        total_cost_m += config.same_stop_penalty_m;
    }

    Some(RouteCandidate {
        route_id: route_id.clone(),
        begin_stop: begin_stop.clone(),
        dest_stop: dest_stop.clone(),
        begin_distance_m,
        dest_distance_m,
        total_cost_m,
        same_stop,
    })
}

/// Sort candidates cheapest first.
///
/// Equal costs order by route id so results never depend on the order
/// upstream happened to list routes in.
pub fn sort_candidates(candidates: &mut [RouteCandidate]) {
    candidates.sort_by(|a, b| {
        a.total_cost_m
            .total_cmp(&b.total_cost_m)
            .then_with(|| a.route_id.cmp(&b.route_id))
    });
}

/// Rank every route in the catalog and keep the best `config.max_results`.
///
/// At most one candidate per route.
pub fn rank_routes(
    catalog: &StopCatalog,
    begin: &GeoPoint,
    dest: &GeoPoint,
    config: &PlannerConfig,
) -> Vec<RouteCandidate> {
    let mut candidates: Vec<RouteCandidate> = catalog
        .routes()
        .iter()
        .filter_map(|r| best_stop_pair(&r.route.route_id, &r.stops, begin, dest, config))
        .collect();

    sort_candidates(&mut candidates);
    candidates.truncate(config.max_results);
    candidates
}
