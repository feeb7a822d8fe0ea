// Handlers for the single-slot cached session.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::database::{Database, DatabaseError};
use crate::error::TripError;
use crate::saved_routes_handlers::db_error_to_api_error;
use shared::{ApiError, CachedSession};

/// GET /api/session - Restore the last computed trip. 404 when the slot is
/// empty; 410 when the stored payload was corrupt (the slot is discarded,
/// so the client falls back to its empty initial state).
pub async fn get_session(
    State(db): State<Arc<Database>>,
) -> Result<Json<CachedSession>, (StatusCode, Json<ApiError>)> {
    match db.get_session().await {
        Ok(Some(session)) => Ok(Json(session)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError {
                message: "no cached session".to_string(),
            }),
        )),
        Err(DatabaseError::InvalidData(msg)) => Err((
            StatusCode::GONE,
            Json(ApiError {
                message: TripError::Restore(msg).to_string(),
            }),
        )),
        Err(err) => Err(db_error_to_api_error(err)),
    }
}

/// PUT /api/session - Overwrite the slot with the latest successful trip.
pub async fn put_session(
    State(db): State<Arc<Database>>,
    Json(session): Json<CachedSession>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    db.put_session(&session)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(db_error_to_api_error)
}

/// DELETE /api/session - Clear the slot ("clear route").
pub async fn clear_session(
    State(db): State<Arc<Database>>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    db.clear_session()
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(db_error_to_api_error)
}
