use shared::ClientConfig;

use crate::error::TripError;

/// Client credentials handed to the browser once at startup. Read from the
/// environment; a missing value aborts startup rather than failing later
/// mid-pipeline.
pub fn load_client_config() -> Result<ClientConfig, TripError> {
    Ok(ClientConfig {
        ors_api_key: require_env("ORS_API_KEY")?,
        places_api_key: require_env("PLACES_API_KEY")?,
    })
}

fn require_env(var: &str) -> Result<String, TripError> {
    std::env::var(var).map_err(|_| TripError::Config(var.to_string()))
}
