//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::requests::{StatRequest, StatResponse};

use super::dto::*;
use super::state::AppState;
use super::templates::{AboutTemplate, IndexTemplate};

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/about", get(about_page))
        .route("/bus/:name", get(bus_stats))
        .route("/stop/:name", get(stop_stats))
        .route("/route", get(plan_route))
        .route("/map", get(map_svg))
        .route("/requests", post(process_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page with the network summary.
async fn index_page(State(state): State<AppState>) -> IndexTemplate {
    let buses = state
        .catalogue
        .all_buses()
        .into_iter()
        .map(|id| state.catalogue.bus_name(id).to_string())
        .collect();
    IndexTemplate {
        stop_count: state.catalogue.stop_count(),
        bus_count: state.catalogue.bus_count(),
        buses,
    }
}

/// About page.
async fn about_page() -> AboutTemplate {
    AboutTemplate
}

/// Route statistics for one bus.
async fn bus_stats(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<BusResponse>, AppError> {
    state
        .catalogue
        .bus_stats(&name)
        .map(|stats| Json(BusResponse::from(stats)))
        .ok_or(AppError::NotFound)
}

/// Buses serving one stop.
async fn stop_stats(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<StopResponse>, AppError> {
    state
        .catalogue
        .stop_stats(&name)
        .map(|stats| Json(StopResponse::from(stats)))
        .ok_or(AppError::NotFound)
}

/// Fastest itinerary between two stops.
async fn plan_route(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<RouteResponse>, AppError> {
    state
        .planner
        .plan(&query.from, &query.to)
        .map(|itinerary| Json(RouteResponse::from(itinerary)))
        .ok_or(AppError::NotFound)
}

/// The schematic network map.
async fn map_svg(State(state): State<AppState>) -> Response {
    let svg = state.renderer.render(&state.catalogue);
    ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response()
}

/// Batch endpoint speaking the stat-request protocol.
async fn process_requests(
    State(state): State<AppState>,
    Json(requests): Json<Vec<StatRequest>>,
) -> Json<Vec<StatResponse>> {
    Json(state.handler.handle_all(&requests))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// The requested stop, bus or connection does not exist.
    NotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
        };
        (
            status,
            Json(ErrorResponse {
                error_message: message,
            }),
        )
            .into_response()
    }
}
