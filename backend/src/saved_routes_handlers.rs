// Handlers for the saved-routes API endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::database::{Database, DatabaseError, SaveRouteRequest, SavedRoute};
use shared::ApiError;

/// POST /api/routes - Save a new named route
pub async fn save_route(
    State(db): State<Arc<Database>>,
    Json(req): Json<SaveRouteRequest>,
) -> Result<Json<SavedRoute>, (StatusCode, Json<ApiError>)> {
    db.save_route(req)
        .await
        .map(Json)
        .map_err(db_error_to_api_error)
}

/// GET /api/routes - List all saved routes
pub async fn list_routes(
    State(db): State<Arc<Database>>,
) -> Result<Json<Vec<SavedRoute>>, (StatusCode, Json<ApiError>)> {
    db.list_routes()
        .await
        .map(Json)
        .map_err(db_error_to_api_error)
}

/// GET /api/routes/:id - Get a specific saved route
pub async fn get_route(
    State(db): State<Arc<Database>>,
    Path(id): Path<i32>,
) -> Result<Json<SavedRoute>, (StatusCode, Json<ApiError>)> {
    db.get_route(id)
        .await
        .map(Json)
        .map_err(db_error_to_api_error)
}

/// DELETE /api/routes/:id - Delete a saved route
pub async fn delete_route(
    State(db): State<Arc<Database>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    db.delete_route(id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(db_error_to_api_error)
}

/// Convert DatabaseError to an API error response.
pub(crate) fn db_error_to_api_error(err: DatabaseError) -> (StatusCode, Json<ApiError>) {
    let (status, message) = match err {
        DatabaseError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            format!("Route with ID {} not found", id),
        ),
        DatabaseError::InvalidData(msg) => (StatusCode::BAD_REQUEST, msg),
        DatabaseError::ConfigError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        DatabaseError::ConnectionError(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            format!("Database connection error: {}", e),
        ),
    };

    (status, Json(ApiError { message }))
}
