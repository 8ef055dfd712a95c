use buzzbus_server::cache::CacheConfig;
use buzzbus_server::locations::CampusDirectory;
use buzzbus_server::planner::PlannerConfig;
use buzzbus_server::settings::Settings;
use buzzbus_server::transloc::{MockTranslocClient, TransitBackend, TranslocClient};
use buzzbus_server::web::{AppState, create_router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("buzzbus_server=info")),
        )
        .init();

    let settings = Settings::from_env()?;

    // Pick the upstream: captured fixtures if asked for, else the live relay
    let backend = match &settings.mock_dir {
        Some(dir) => {
            let mock = MockTranslocClient::new(dir)?;
            info!(dir = %dir.display(), routes = mock.route_count(), "using mock TransLoc data");
            TransitBackend::Mock(mock)
        }
        None => {
            if settings.transloc.api_key.is_empty() {
                warn!("TRANSLOC_API_KEY not set. API calls may be rejected.");
            }
            TransitBackend::Live(TranslocClient::new(settings.transloc.clone())?)
        }
    };

    let state = AppState::new(
        backend,
        &CacheConfig::default(),
        CampusDirectory::default(),
        PlannerConfig::default(),
    );

    let app = create_router(state, &settings.cors_origins);

    let addr = settings.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "BuzzBus route planner listening");
    info!("  GET  /health          - Health check");
    info!("  GET  /api/buildings   - Campus buildings");
    info!("  POST /api/RouteSearch - Find bus routes");

    axum::serve(listener, app).await?;
    Ok(())
}
