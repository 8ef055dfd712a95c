//! Route search pipeline.
//!
//! Finds the best single-route bus options between two points:
//!
//! ```text
//! Idle → CatalogFetching → Ranking → Shortlisted → ResolvingArrivals
//!      → DirectionFiltering → Done
//! ```
//!
//! with `EmptyResult` reachable from `CatalogFetching` (nothing running)
//! and `Ranking` (nothing within walking distance). Each stage needs all
//! of the previous one's output, so stages run in order; the two stages
//! that talk to upstream fan out internally and join before moving on.
//!
//! Dropping the returned future cancels every in-flight request of the
//! current stage. Nothing is committed until a stage completes, so there
//! is nothing to roll back.

use std::fmt;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::{ArrivalEstimate, GeoPoint, RouteId, RouteStopId, round_to_tenth};

use super::arrivals::ArrivalResolver;
use super::catalog::StopCatalog;
use super::config::PlannerConfig;
use super::direction::{DirectionFiltered, filter_direction};
use super::rank::{RouteCandidate, rank_routes};
use super::source::TransitDataSource;

/// Pipeline stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStage {
    Idle,
    CatalogFetching,
    Ranking,
    Shortlisted,
    ResolvingArrivals,
    DirectionFiltering,
    Done,
    EmptyResult,
}

impl SearchStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, SearchStage::Done | SearchStage::EmptyResult)
    }
}

impl fmt::Display for SearchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchStage::Idle => "idle",
            SearchStage::CatalogFetching => "catalog-fetching",
            SearchStage::Ranking => "ranking",
            SearchStage::Shortlisted => "shortlisted",
            SearchStage::ResolvingArrivals => "resolving-arrivals",
            SearchStage::DirectionFiltering => "direction-filtering",
            SearchStage::Done => "done",
            SearchStage::EmptyResult => "empty-result",
        };
        f.write_str(name)
    }
}

/// One end of a recommended trip, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct StopView {
    pub name: String,
    /// Walking distance in meters, rounded to 0.1 m.
    pub distance_m: f64,
    pub route_stop_id: Option<RouteStopId>,
    pub arrivals: Vec<ArrivalEstimate>,
}

/// A recommended route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRecommendation {
    pub route_id: RouteId,
    pub route_name: String,
    pub begin_stop: StopView,
    pub dest_stop: StopView,
    /// Ranking cost (walks plus any same-stop penalty), rounded to 0.1 m.
    pub total_walking_distance_m: f64,
    pub same_stop: bool,
}

/// Counters describing what a search looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Routes reported as active.
    pub active_routes: usize,
    /// Active routes that returned at least one stop.
    pub routes_with_stops: usize,
    /// Candidates shortlisted for arrival lookup.
    pub candidates: usize,
    /// Shortlisted candidates dropped for lack of route details.
    pub dropped: usize,
}

/// Result of a route search.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSearchResult {
    /// Best routes first, at most `max_results`.
    pub recommendations: Vec<RouteRecommendation>,
    pub stats: SearchStats,
    /// `Done` or `EmptyResult`.
    pub final_stage: SearchStage,
}

impl RouteSearchResult {
    /// Create an empty result.
    pub fn empty(stats: SearchStats) -> Self {
        Self {
            recommendations: Vec::new(),
            stats,
            final_stage: SearchStage::EmptyResult,
        }
    }
}

/// Route planner over a transit data source.
pub struct RoutePlanner<'a, S: TransitDataSource> {
    source: &'a S,
    config: &'a PlannerConfig,
}

impl<'a, S: TransitDataSource> RoutePlanner<'a, S> {
    /// Create a new planner.
    pub fn new(source: &'a S, config: &'a PlannerConfig) -> Self {
        Self { source, config }
    }

    /// Search for single-route trips from `begin` to `dest`.
    ///
    /// Never fails: upstream errors count as missing data and at worst
    /// produce an empty list.
    pub async fn find_routes(&self, begin: GeoPoint, dest: GeoPoint) -> RouteSearchResult {
        let mut stage = SearchStage::Idle;
        let mut stats = SearchStats::default();

        advance(&mut stage, SearchStage::CatalogFetching);
        let routes = self.source.get_active_routes().await.unwrap_or_else(|e| {
            warn!(error = %e, "active routes unavailable");
            Vec::new()
        });
        stats.active_routes = routes.len();

        if routes.is_empty() {
            advance(&mut stage, SearchStage::EmptyResult);
            return RouteSearchResult::empty(stats);
        }

        let catalog = StopCatalog::fetch(self.source, routes).await;
        stats.routes_with_stops = catalog.routes_with_stops();

        advance(&mut stage, SearchStage::Ranking);
        let candidates = rank_routes(&catalog, &begin, &dest, self.config);
        drop(catalog);

        if candidates.is_empty() {
            advance(&mut stage, SearchStage::EmptyResult);
            return RouteSearchResult::empty(stats);
        }

        advance(&mut stage, SearchStage::Shortlisted);
        stats.candidates = candidates.len();
        for c in &candidates {
            debug!(
                route = %c.route_id,
                board = %c.begin_stop.description,
                alight = %c.dest_stop.description,
                cost_m = c.total_cost_m,
                "shortlisted"
            );
        }

        advance(&mut stage, SearchStage::ResolvingArrivals);
        let resolver = ArrivalResolver::new(self.source, self.config);
        // resolved[i] belongs to candidates[i].
        let resolved = join_all(candidates.iter().map(|c| resolver.resolve(c))).await;

        advance(&mut stage, SearchStage::DirectionFiltering);
        let recommendations: Vec<RouteRecommendation> = candidates
            .into_iter()
            .zip(resolved)
            .filter_map(|(candidate, resolved)| {
                let resolved = resolved?;
                let arrivals = filter_direction(resolved.begin_arrivals, resolved.dest_arrivals);
                Some(recommend(candidate, resolved.route_name, arrivals))
            })
            .collect();
        stats.dropped = stats.candidates - recommendations.len();

        advance(&mut stage, SearchStage::Done);
        RouteSearchResult {
            recommendations,
            stats,
            final_stage: stage,
        }
    }
}

fn advance(stage: &mut SearchStage, next: SearchStage) {
    debug_assert!(!stage.is_terminal(), "search left terminal stage {stage}");
    debug!(from = %stage, to = %next, "search stage");
    *stage = next;
}

/// Build the display form of a candidate. Distances are rounded here.
fn recommend(
    candidate: RouteCandidate,
    route_name: String,
    arrivals: DirectionFiltered,
) -> RouteRecommendation {
    RouteRecommendation {
        route_id: candidate.route_id,
        route_name,
        begin_stop: StopView {
            name: candidate.begin_stop.description,
            distance_m: round_to_tenth(candidate.begin_distance_m),
            route_stop_id: candidate.begin_stop.route_stop_id,
            arrivals: arrivals.begin,
        },
        dest_stop: StopView {
            name: candidate.dest_stop.description,
            distance_m: round_to_tenth(candidate.dest_distance_m),
            route_stop_id: candidate.dest_stop.route_stop_id,
            arrivals: arrivals.dest,
        },
        total_walking_distance_m: round_to_tenth(candidate.total_cost_m),
        same_stop: candidate.same_stop,
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
