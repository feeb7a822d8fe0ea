pub mod alerts;
pub mod classify;
pub mod config;
pub mod database;
pub mod error;
pub mod gpx_export;
pub mod ors;
pub mod pipeline;
pub mod places;
pub mod sampling;
pub mod saved_routes_handlers;
pub mod segments;
pub mod session_handlers;
pub mod timeline;
pub mod weather;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::database::Database;
use crate::error::TripError;
use crate::ors::RoutePlanner;
use crate::pipeline::{plan_trip, DEFAULT_SAMPLE_INTERVAL_KM};
use crate::places::PlaceSearch;
use crate::weather::ForecastApi;
use shared::{ApiError, ClientConfig, Coordinate, PlaceDetails, PlacePrediction, TripRequest, TripResponse};

/// Upper bound on one trip computation, all upstream calls included.
const PIPELINE_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<dyn RoutePlanner>,
    pub forecast: Arc<dyn ForecastApi>,
    pub places: Arc<dyn PlaceSearch>,
    pub client_config: ClientConfig,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/trip", post(trip_handler))
        .route("/api/config", get(config_handler))
        .route("/api/suggest", get(suggest_handler))
        .route("/api/place/:place_id", get(place_handler))
        .with_state(state)
}

/// Routes backed by the database: saved routes and the session slot.
pub fn storage_router(db: Arc<Database>) -> Router {
    Router::new()
        .route(
            "/api/routes",
            post(saved_routes_handlers::save_route).get(saved_routes_handlers::list_routes),
        )
        .route(
            "/api/routes/:id",
            get(saved_routes_handlers::get_route).delete(saved_routes_handlers::delete_route),
        )
        .route(
            "/api/session",
            get(session_handlers::get_session)
                .put(session_handlers::put_session)
                .delete(session_handlers::clear_session),
        )
        .with_state(db)
}

async fn trip_handler(
    State(state): State<AppState>,
    Json(request): Json<TripRequest>,
) -> Result<Json<TripResponse>, (StatusCode, Json<ApiError>)> {
    let trip = tokio::time::timeout(
        PIPELINE_TIMEOUT,
        plan_trip(
            state.planner.as_ref(),
            state.forecast.as_ref(),
            &request,
            DEFAULT_SAMPLE_INTERVAL_KM,
        ),
    )
    .await
    .map_err(|_| TripError::Timeout)
    .and_then(|result| result)
    .map_err(trip_error_to_api_error)?;

    Ok(Json(trip))
}

async fn config_handler(State(state): State<AppState>) -> Json<ClientConfig> {
    Json(state.client_config.clone())
}

#[derive(Debug, Deserialize)]
struct SuggestParams {
    q: String,
    lat: Option<f64>,
    lon: Option<f64>,
}

async fn suggest_handler(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Result<Json<Vec<PlacePrediction>>, (StatusCode, Json<ApiError>)> {
    let bias = match (params.lat, params.lon) {
        (Some(lat), Some(lon)) => Some(Coordinate { lat, lon }),
        _ => None,
    };

    state
        .places
        .suggest(&params.q, bias)
        .await
        .map(Json)
        .map_err(trip_error_to_api_error)
}

async fn place_handler(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> Result<Json<PlaceDetails>, (StatusCode, Json<ApiError>)> {
    state
        .places
        .details(&place_id)
        .await
        .map(|formatted_address| Json(PlaceDetails { formatted_address }))
        .map_err(trip_error_to_api_error)
}

fn trip_error_to_api_error(err: TripError) -> (StatusCode, Json<ApiError>) {
    let status = match &err {
        TripError::LocationNotFound(_) | TripError::RouteNotFound => StatusCode::NOT_FOUND,
        TripError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        TripError::Restore(_) => StatusCode::GONE,
        TripError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        TripError::WeatherFetch(_)
        | TripError::Transport(_)
        | TripError::Malformed(_)
        | TripError::Gpx(_) => StatusCode::BAD_GATEWAY,
    };

    (
        status,
        Json(ApiError {
            message: err.to_string(),
        }),
    )
}
