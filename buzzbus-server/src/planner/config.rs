//! Planner configuration.

/// Configuration parameters for route search.
///
/// Passed explicitly to ranking and arrival resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Longest walk to the boarding stop, or from the alighting stop (meters).
    /// Routes needing more than this on either leg are not candidates.
    pub leg_threshold_m: f64,

    /// Added to the cost of a route whose best boarding and alighting
    /// stops are the same place (meters).
    pub same_stop_penalty_m: f64,

    /// Maximum number of routes to return.
    pub max_results: usize,

    /// Arrival estimates requested per stop.
    pub arrivals_per_stop: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            leg_threshold_m: 1000.0,
            same_stop_penalty_m: 1000.0,
            max_results: 5,
            arrivals_per_stop: 3,
        }
    }
}
