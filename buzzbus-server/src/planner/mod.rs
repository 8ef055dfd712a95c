//! Single-route bus planner.
//!
//! Answers "which bus gets me from here to there with the least walking?",
//! considering only trips on one route with no transfers. Routes are ranked
//! on the walk to the nearest stop at each end, then the best few are
//! decorated with live arrival estimates filtered to buses heading the
//! right way.

mod arrivals;
mod catalog;
mod config;
mod direction;
mod rank;
mod search;
mod source;

pub use arrivals::{ArrivalResolver, ResolvedRoute, parse_arrival_records};
pub use catalog::{RouteStops, StopCatalog};
pub use config::PlannerConfig;
pub use direction::{DirectionFiltered, filter_direction};
pub use rank::{RouteCandidate, best_stop_pair, rank_routes, sort_candidates};
pub use search::{
    RoutePlanner, RouteRecommendation, RouteSearchResult, SearchStage, SearchStats, StopView,
};
pub use source::{FetchError, TransitDataSource};
