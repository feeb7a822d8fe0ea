// PostgreSQL storage for saved routes and the cached session slot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{CachedSession, RoutePath};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use std::env;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Route not found: {0}")]
    NotFound(i32),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Saved route model (DB representation). Created on explicit save,
/// deleted on explicit delete, never updated in between.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedRoute {
    pub id: i32,
    pub name: String,
    pub start_address: String,
    pub end_address: String,
    pub distance_text: String,
    pub route_data: sqlx::types::JsonValue,
    pub created_at: DateTime<Utc>,
}

/// Request to save a new named route.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveRouteRequest {
    pub name: String,
    pub start_address: String,
    pub end_address: String,
    pub distance_text: String,
    pub route: RoutePath,
}

pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create new database connection pool.
    ///
    /// # Errors
    /// Returns DatabaseError if connection fails or DATABASE_URL is not set
    pub async fn new() -> Result<Self, DatabaseError> {
        let database_url = env::var("DATABASE_URL").map_err(|_| {
            DatabaseError::ConfigError("DATABASE_URL environment variable not set".to_string())
        })?;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await?;

        tracing::info!("PostgreSQL connection pool created");

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// # Errors
    /// Returns DatabaseError if migration fails
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        // SQLx query() cannot handle multiple statements, so the migration
        // runs through a raw connection.
        let mut conn = self.pool.acquire().await?;

        let migration_sql = include_str!("../migrations/20260807_create_trip_storage.sql");

        sqlx::raw_sql(migration_sql).execute(&mut *conn).await?;

        tracing::info!("Database migrations completed");
        Ok(())
    }

    /// Save a new named route.
    pub async fn save_route(&self, req: SaveRouteRequest) -> Result<SavedRoute, DatabaseError> {
        let route_json = serde_json::to_value(&req.route)
            .map_err(|e| DatabaseError::InvalidData(e.to_string()))?;

        let route = sqlx::query_as::<_, SavedRoute>(
            r#"
            INSERT INTO saved_routes (name, start_address, end_address, distance_text, route_data)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.start_address)
        .bind(&req.end_address)
        .bind(&req.distance_text)
        .bind(route_json)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Route saved: {} (ID: {})", route.name, route.id);
        Ok(route)
    }

    /// List all saved routes, most recent first.
    pub async fn list_routes(&self) -> Result<Vec<SavedRoute>, DatabaseError> {
        let routes =
            sqlx::query_as::<_, SavedRoute>("SELECT * FROM saved_routes ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        tracing::debug!("Retrieved {} saved routes", routes.len());
        Ok(routes)
    }

    /// Get a specific saved route by ID.
    pub async fn get_route(&self, id: i32) -> Result<SavedRoute, DatabaseError> {
        let route = sqlx::query_as::<_, SavedRoute>("SELECT * FROM saved_routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DatabaseError::NotFound(id))?;

        Ok(route)
    }

    /// Delete a saved route by ID.
    pub async fn delete_route(&self, id: i32) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM saved_routes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(id));
        }

        tracing::info!("Route deleted: ID {}", id);
        Ok(())
    }

    /// Deserialize a saved route's payload back into a RoutePath.
    pub fn to_route_path(saved: &SavedRoute) -> Result<RoutePath, DatabaseError> {
        serde_json::from_value(saved.route_data.clone())
            .map_err(|e| DatabaseError::InvalidData(format!("Failed to deserialize route: {e}")))
    }

    /// Replace the cached session slot wholesale. The slot either holds
    /// the full outcome of the last successful trip computation or nothing.
    pub async fn put_session(&self, session: &CachedSession) -> Result<(), DatabaseError> {
        let payload = serde_json::to_value(session)
            .map_err(|e| DatabaseError::InvalidData(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO cached_session (slot, payload, updated_at)
            VALUES (1, $1, now())
            ON CONFLICT (slot) DO UPDATE SET payload = EXCLUDED.payload, updated_at = now()
            "#,
        )
        .bind(payload)
        .execute(&self.pool)
        .await?;

        tracing::info!("Cached session replaced");
        Ok(())
    }

    /// Fetch the cached session, if any. A payload that no longer
    /// deserializes is discarded on the spot so the next load starts from
    /// the empty initial state.
    pub async fn get_session(&self) -> Result<Option<CachedSession>, DatabaseError> {
        let row: Option<(sqlx::types::JsonValue,)> =
            sqlx::query_as("SELECT payload FROM cached_session WHERE slot = 1")
                .fetch_optional(&self.pool)
                .await?;

        let Some((payload,)) = row else {
            return Ok(None);
        };

        match serde_json::from_value::<CachedSession>(payload) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                tracing::warn!("discarding corrupt cached session: {err}");
                self.clear_session().await?;
                Err(DatabaseError::InvalidData(
                    "cached session payload was malformed".to_string(),
                ))
            }
        }
    }

    /// Clear the cached session slot.
    pub async fn clear_session(&self) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM cached_session WHERE slot = 1")
            .execute(&self.pool)
            .await?;

        tracing::info!("Cached session cleared");
        Ok(())
    }
}
