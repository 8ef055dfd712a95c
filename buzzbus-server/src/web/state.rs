//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{CacheConfig, CachedTransitSource};
use crate::locations::CampusDirectory;
use crate::planner::PlannerConfig;
use crate::transloc::TransitBackend;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// TransLoc access, live or mock, with stop lists cached
    pub transit: Arc<CachedTransitSource<TransitBackend>>,

    /// Known campus buildings
    pub directory: Arc<CampusDirectory>,

    /// Route planner configuration
    pub config: Arc<PlannerConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        backend: TransitBackend,
        cache_config: &CacheConfig,
        directory: CampusDirectory,
        config: PlannerConfig,
    ) -> Self {
        Self {
            transit: Arc::new(CachedTransitSource::new(backend, cache_config)),
            directory: Arc::new(directory),
            config: Arc::new(config),
        }
    }
}
