use thiserror::Error;

#[derive(Debug, Error)]
pub enum TripError {
    #[error("location not found: {0}")]
    LocationNotFound(String),
    #[error("no drivable route between the selected locations")]
    RouteNotFound,
    #[error("weather lookup failed: {0}")]
    WeatherFetch(String),
    #[error("missing configuration: {0}")]
    Config(String),
    #[error("cached session could not be restored: {0}")]
    Restore(String),
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected upstream response: {0}")]
    Malformed(String),
    #[error("failed to build GPX document: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
    #[error("trip computation timed out")]
    Timeout,
}
