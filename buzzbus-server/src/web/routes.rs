//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::locations::LocationError;
use crate::map;
use crate::planner::RoutePlanner;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
///
/// `cors_origins` lists the frontends allowed to call the API.
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/buildings", get(buildings))
        .route("/api/RouteSearch", post(route_search))
        .route("/api/RouteSearch/map-routes", get(map_routes))
        .route("/api/RouteSearch/map-vehicles", get(map_vehicles))
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Names of the known campus buildings.
async fn buildings(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(
        state
            .directory
            .buildings()
            .iter()
            .map(|b| b.name.clone())
            .collect(),
    )
}

/// Find bus routes between two points.
async fn route_search(
    State(state): State<AppState>,
    Json(req): Json<RouteSearchRequest>,
) -> Result<Json<RouteSearchResponse>, AppError> {
    let begin_query = req.begin_query();
    let dest_query = req.dest_query();
    if begin_query.is_empty() || dest_query.is_empty() {
        return Err(AppError::BadRequest {
            message: "Both begin and destination points must be provided".to_string(),
        });
    }

    let begin = state
        .directory
        .resolve(&begin_query, "Starting Location")
        .map_err(|e| location_error("begin", e))?;
    let dest = state
        .directory
        .resolve(&dest_query, "Destination Location")
        .map_err(|e| location_error("destination", e))?;

    let planner = RoutePlanner::new(state.transit.as_ref(), state.config.as_ref());
    let result = planner.find_routes(begin.point, dest.point).await;

    info!(
        from = %begin.display_name,
        to = %dest.display_name,
        routes = result.recommendations.len(),
        active = result.stats.active_routes,
        dropped = result.stats.dropped,
        "route search"
    );

    let routes = result
        .recommendations
        .into_iter()
        .map(RouteResult::from)
        .collect();

    Ok(Json(RouteSearchResponse::new(
        routes,
        begin.display_name,
        dest.display_name,
    )))
}

/// Every route with its path and stops, for drawing the map.
async fn map_routes(State(state): State<AppState>) -> Json<Vec<MapRouteResult>> {
    let routes = map::map_routes(state.transit.as_ref()).await;
    info!(routes = routes.len(), "map routes");
    Json(routes.into_iter().map(MapRouteResult::from).collect())
}

/// Every reporting vehicle with the stops it is due at.
async fn map_vehicles(State(state): State<AppState>) -> Json<Vec<MapVehicleResult>> {
    let vehicles = map::map_vehicles(state.transit.as_ref()).await;
    info!(vehicles = vehicles.len(), "map vehicles");
    Json(vehicles.into_iter().map(MapVehicleResult::from).collect())
}

fn location_error(side: &str, e: LocationError) -> AppError {
    let message = match e {
        LocationError::Missing => "Both begin and destination points must be provided".to_string(),
        LocationError::UnknownBuilding(_) => format!("Invalid {side} building name"),
    };
    AppError::BadRequest { message }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
        };

        warn!(%status, %message, "request rejected");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
