use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use shared::{Coordinate, RoutePath};

use crate::error::TripError;

const DEFAULT_GEOCODE_URL: &str = "https://api.openrouteservice.org/geocode/search";
const DEFAULT_DIRECTIONS_URL: &str =
    "https://api.openrouteservice.org/v2/directions/driving-car/geojson";

/// Geocoding and driving directions, one upstream credential for both.
#[async_trait]
pub trait RoutePlanner: Send + Sync {
    /// Resolve a free-text location to the first matching coordinate.
    async fn geocode(&self, query: &str) -> Result<Coordinate, TripError>;

    /// Driving route between two coordinates: polyline, distance in
    /// meters, duration in seconds.
    async fn directions(&self, start: Coordinate, end: Coordinate)
        -> Result<RoutePath, TripError>;
}

pub struct OrsClient {
    client: reqwest::Client,
    api_key: String,
    geocode_url: String,
    directions_url: String,
}

impl OrsClient {
    pub fn new(client: reqwest::Client, api_key: String) -> Self {
        Self {
            client,
            api_key,
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
            directions_url: DEFAULT_DIRECTIONS_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    features: Vec<GeocodeFeature>,
}

#[derive(Debug, Deserialize)]
struct GeocodeFeature {
    geometry: PointGeometry,
}

#[derive(Debug, Deserialize)]
struct PointGeometry {
    /// [lon, lat]
    coordinates: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    features: Vec<DirectionsFeature>,
}

#[derive(Debug, Deserialize)]
struct DirectionsFeature {
    geometry: LineGeometry,
    properties: DirectionsProperties,
}

#[derive(Debug, Deserialize)]
struct LineGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct DirectionsProperties {
    summary: DirectionsSummary,
}

#[derive(Debug, Deserialize)]
struct DirectionsSummary {
    distance: f64,
    duration: f64,
}

#[async_trait]
impl RoutePlanner for OrsClient {
    async fn geocode(&self, query: &str) -> Result<Coordinate, TripError> {
        let url = format!(
            "{}?api_key={}&text={}&size=1",
            self.geocode_url,
            self.api_key,
            urlencoding::encode(query)
        );

        let response: GeocodeResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let feature = response
            .features
            .first()
            .ok_or_else(|| TripError::LocationNotFound(query.to_string()))?;
        let [lon, lat] = feature.geometry.coordinates;
        tracing::debug!("geocoded {query:?} to ({lat:.4}, {lon:.4})");
        Ok(Coordinate { lat, lon })
    }

    async fn directions(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<RoutePath, TripError> {
        let body = serde_json::json!({
            "coordinates": [[start.lon, start.lat], [end.lon, end.lat]],
        });

        let response = self
            .client
            .post(&self.directions_url)
            .header("Authorization", &self.api_key)
            .json(&body)
            .send()
            .await?;
        // The router answers 404 when no drivable connection exists.
        if response.status() == StatusCode::NOT_FOUND {
            return Err(TripError::RouteNotFound);
        }
        let response: DirectionsResponse = response.error_for_status()?.json().await?;

        let feature = response
            .features
            .into_iter()
            .next()
            .ok_or(TripError::RouteNotFound)?;
        let path: Vec<Coordinate> = feature
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| Coordinate { lat, lon })
            .collect();
        if path.is_empty() {
            return Err(TripError::RouteNotFound);
        }

        let summary = feature.properties.summary;
        tracing::debug!(
            "route found: {} vertices, {:.1} km, {:.0} s",
            path.len(),
            summary.distance / 1000.0,
            summary.duration
        );
        Ok(RoutePath {
            path,
            distance_m: summary.distance,
            duration_s: summary.duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocode_response_shape() {
        let body = r#"{
            "features": [
                {"geometry": {"type": "Point", "coordinates": [-89.6501, 39.7817]}}
            ]
        }"#;
        let response: GeocodeResponse = serde_json::from_str(body).unwrap();
        let [lon, lat] = response.features[0].geometry.coordinates;
        assert_eq!(lon, -89.6501);
        assert_eq!(lat, 39.7817);
    }

    #[test]
    fn test_geocode_response_empty_features() {
        let response: GeocodeResponse = serde_json::from_str(r#"{"features": []}"#).unwrap();
        assert!(response.features.is_empty());
    }

    #[test]
    fn test_directions_response_shape() {
        let body = r#"{
            "features": [{
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[-89.65, 39.78], [-89.60, 39.80], [-89.55, 39.83]]
                },
                "properties": {
                    "summary": {"distance": 10432.5, "duration": 612.0}
                }
            }]
        }"#;
        let response: DirectionsResponse = serde_json::from_str(body).unwrap();
        let feature = &response.features[0];
        assert_eq!(feature.geometry.coordinates.len(), 3);
        assert_eq!(feature.properties.summary.distance, 10432.5);
        assert_eq!(feature.properties.summary.duration, 612.0);
    }
}
