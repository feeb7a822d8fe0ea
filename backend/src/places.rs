use async_trait::async_trait;
use serde::Deserialize;
use shared::{Coordinate, PlacePrediction};

use crate::error::TripError;

const DEFAULT_AUTOCOMPLETE_URL: &str =
    "https://maps.googleapis.com/maps/api/place/autocomplete/json";
const DEFAULT_DETAILS_URL: &str = "https://maps.googleapis.com/maps/api/place/details/json";

/// Radius of the optional location bias applied to suggestions.
const BIAS_RADIUS_M: u32 = 50_000;

#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Candidate places for a partially typed address, optionally biased
    /// toward a coordinate.
    async fn suggest(
        &self,
        input: &str,
        bias: Option<Coordinate>,
    ) -> Result<Vec<PlacePrediction>, TripError>;

    /// Canonical formatted address for a prediction's place id.
    async fn details(&self, place_id: &str) -> Result<String, TripError>;
}

pub struct GooglePlacesClient {
    client: reqwest::Client,
    api_key: String,
    autocomplete_url: String,
    details_url: String,
}

impl GooglePlacesClient {
    pub fn new(client: reqwest::Client, api_key: String) -> Self {
        Self {
            client,
            api_key,
            autocomplete_url: DEFAULT_AUTOCOMPLETE_URL.to_string(),
            details_url: DEFAULT_DETAILS_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    place_id: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<DetailsResult>,
}

#[derive(Debug, Deserialize)]
struct DetailsResult {
    formatted_address: String,
}

fn check_status(status: &str) -> Result<(), TripError> {
    // ZERO_RESULTS is a valid empty answer, not a failure.
    if status == "OK" || status == "ZERO_RESULTS" {
        Ok(())
    } else {
        Err(TripError::Malformed(format!(
            "place service status {status}"
        )))
    }
}

#[async_trait]
impl PlaceSearch for GooglePlacesClient {
    async fn suggest(
        &self,
        input: &str,
        bias: Option<Coordinate>,
    ) -> Result<Vec<PlacePrediction>, TripError> {
        let mut url = format!(
            "{}?input={}&key={}",
            self.autocomplete_url,
            urlencoding::encode(input),
            self.api_key
        );
        if let Some(coord) = bias {
            url.push_str(&format!(
                "&location={:.4},{:.4}&radius={BIAS_RADIUS_M}",
                coord.lat, coord.lon
            ));
        }

        let response: AutocompleteResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        check_status(&response.status)?;

        Ok(response
            .predictions
            .into_iter()
            .map(|p| PlacePrediction {
                place_id: p.place_id,
                description: p.description,
            })
            .collect())
    }

    async fn details(&self, place_id: &str) -> Result<String, TripError> {
        let url = format!(
            "{}?place_id={}&fields=formatted_address&key={}",
            self.details_url,
            urlencoding::encode(place_id),
            self.api_key
        );

        let response: DetailsResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        check_status(&response.status)?;

        response
            .result
            .map(|r| r.formatted_address)
            .ok_or_else(|| TripError::LocationNotFound(place_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autocomplete_response_shape() {
        let body = r#"{
            "status": "OK",
            "predictions": [
                {"place_id": "abc123", "description": "Springfield, IL, USA"},
                {"place_id": "def456", "description": "Springfield, MO, USA"}
            ]
        }"#;
        let response: AutocompleteResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.predictions.len(), 2);
        assert_eq!(response.predictions[0].place_id, "abc123");
    }

    #[test]
    fn test_zero_results_is_not_an_error() {
        assert!(check_status("ZERO_RESULTS").is_ok());
        let body = r#"{"status": "ZERO_RESULTS"}"#;
        let response: AutocompleteResponse = serde_json::from_str(body).unwrap();
        assert!(response.predictions.is_empty());
    }

    #[test]
    fn test_denied_status_is_an_error() {
        assert!(matches!(
            check_status("REQUEST_DENIED"),
            Err(TripError::Malformed(_))
        ));
    }

    #[test]
    fn test_details_response_shape() {
        let body = r#"{
            "status": "OK",
            "result": {"formatted_address": "500 E Capitol Ave, Springfield, IL 62701, USA"}
        }"#;
        let response: DetailsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            response.result.unwrap().formatted_address,
            "500 E Capitol Ave, Springfield, IL 62701, USA"
        );
    }
}
