use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// A sampled position along the route polyline. `cumulative_km` is the
/// polyline length walked from the route start to this point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoutePoint {
    pub coord: Coordinate,
    pub cumulative_km: f64,
}

/// Forecast picked for one sampled point, imperial units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSample {
    pub coord: Coordinate,
    pub temperature_f: f64,
    pub precipitation_in: f64,
    pub weather_code: i32,
    pub wind_speed_mph: f64,
    pub arrival_time: DateTime<Utc>,
}

/// A colored sub-polyline of the route bound to one weather classification.
/// Descriptive fields are those of the sample at the segment's start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSegment {
    pub path: Vec<Coordinate>,
    pub color: String,
    pub weather_code: i32,
    pub description: String,
    pub temperature_f: f64,
    pub precipitation_in: f64,
    pub wind_speed_mph: f64,
    pub arrival_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertCategory {
    Fog,
    Rain,
    #[serde(rename = "Heavy rain")]
    HeavyRain,
    Snow,
    #[serde(rename = "Heavy snow")]
    HeavySnow,
    Thunderstorm,
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AlertCategory::Fog => "Fog",
            AlertCategory::Rain => "Rain",
            AlertCategory::HeavyRain => "Heavy rain",
            AlertCategory::Snow => "Snow",
            AlertCategory::HeavySnow => "Heavy snow",
            AlertCategory::Thunderstorm => "Thunderstorm",
        };
        f.write_str(label)
    }
}

/// A maximal run of consecutive samples sharing one alert category,
/// expressed as a mile/time range along the route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRange {
    pub category: AlertCategory,
    pub start_mile: f64,
    pub end_mile: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Driving route as returned by the directions provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePath {
    pub path: Vec<Coordinate>,
    pub distance_m: f64,
    pub duration_s: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    pub start_address: String,
    pub end_address: String,
    pub departure: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripResponse {
    pub start: Coordinate,
    pub end: Coordinate,
    pub route: RoutePath,
    pub distance_mi: f64,
    pub samples: Vec<WeatherSample>,
    pub segments: Vec<RouteSegment>,
    pub alerts: Vec<AlertRange>,
    pub gpx_base64: String,
}

/// Single-slot session snapshot, fully replaced after every successful
/// trip computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedSession {
    pub request: TripRequest,
    pub trip: TripResponse,
}

/// The two opaque credentials the client needs, handed out once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub ors_api_key: String,
    pub places_api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacePrediction {
    pub place_id: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub formatted_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}
