use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::Deserialize;
use shared::{Coordinate, WeatherSample};

use crate::error::TripError;

const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";
const HOURLY_FIELDS: &str = "temperature_2m,precipitation,weather_code,wind_speed_10m";

/// One hourly forecast window for a single location, imperial units.
/// Timestamps are the provider's local-clock hours; `utc_offset_s` maps
/// them back to UTC.
#[derive(Debug, Clone)]
pub struct HourlyForecast {
    pub times: Vec<NaiveDateTime>,
    pub utc_offset_s: i64,
    pub temperature_f: Vec<f64>,
    pub precipitation_in: Vec<f64>,
    pub weather_code: Vec<i32>,
    pub wind_speed_mph: Vec<f64>,
}

#[async_trait]
pub trait ForecastApi: Send + Sync {
    /// Hourly forecast covering the arrival date plus the following day,
    /// so an arrival crossing local midnight still lands in the window.
    async fn hourly(
        &self,
        coord: Coordinate,
        arrival: DateTime<Utc>,
    ) -> Result<HourlyForecast, TripError>;
}

pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    utc_offset_seconds: i64,
    hourly: HourlyBlock,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
    precipitation: Vec<f64>,
    weather_code: Vec<i32>,
    wind_speed_10m: Vec<f64>,
}

#[async_trait]
impl ForecastApi for OpenMeteoClient {
    async fn hourly(
        &self,
        coord: Coordinate,
        arrival: DateTime<Utc>,
    ) -> Result<HourlyForecast, TripError> {
        let start_date = arrival.date_naive();
        let end_date = start_date + Duration::days(1);
        let url = format!(
            "{}?latitude={:.4}&longitude={:.4}&hourly={HOURLY_FIELDS}\
             &temperature_unit=fahrenheit&wind_speed_unit=mph&precipitation_unit=inch\
             &timezone=auto&start_date={start_date}&end_date={end_date}",
            self.base_url, coord.lat, coord.lon
        );

        let response: ForecastResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_forecast(response)
    }
}

fn parse_forecast(response: ForecastResponse) -> Result<HourlyForecast, TripError> {
    let hourly = response.hourly;
    let len = hourly.time.len();
    if len == 0 {
        return Err(TripError::WeatherFetch("empty hourly forecast".into()));
    }
    if hourly.temperature_2m.len() != len
        || hourly.precipitation.len() != len
        || hourly.weather_code.len() != len
        || hourly.wind_speed_10m.len() != len
    {
        return Err(TripError::WeatherFetch("misaligned hourly arrays".into()));
    }

    let times = hourly
        .time
        .iter()
        .map(|t| NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M"))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| TripError::WeatherFetch(format!("bad hourly timestamp: {err}")))?;

    Ok(HourlyForecast {
        times,
        utc_offset_s: response.utc_offset_seconds,
        temperature_f: hourly.temperature_2m,
        precipitation_in: hourly.precipitation,
        weather_code: hourly.weather_code,
        wind_speed_mph: hourly.wind_speed_10m,
    })
}

/// Index of the forecast hour for the arrival instant: elapsed whole hours
/// since the first returned hour, in the location's local clock, clamped
/// into the returned window. An arrival outside the window sticks to the
/// nearest boundary hour instead of extrapolating.
pub fn select_hour_index(forecast: &HourlyForecast, arrival: DateTime<Utc>) -> usize {
    let Some(&first) = forecast.times.first() else {
        return 0;
    };
    let local = arrival.naive_utc() + Duration::seconds(forecast.utc_offset_s);
    let hours = (local - first).num_hours();
    hours.clamp(0, forecast.times.len() as i64 - 1) as usize
}

/// Pick the forecast hour matching the arrival time and shape it into the
/// per-point sample the pipeline carries around.
pub fn sample_at(
    forecast: &HourlyForecast,
    coord: Coordinate,
    arrival: DateTime<Utc>,
) -> Result<WeatherSample, TripError> {
    let idx = select_hour_index(forecast, arrival);
    match (
        forecast.temperature_f.get(idx),
        forecast.precipitation_in.get(idx),
        forecast.weather_code.get(idx),
        forecast.wind_speed_mph.get(idx),
    ) {
        (Some(&temperature_f), Some(&precipitation_in), Some(&weather_code), Some(&wind_speed_mph)) => {
            Ok(WeatherSample {
                coord,
                temperature_f,
                precipitation_in,
                weather_code,
                wind_speed_mph,
                arrival_time: arrival,
            })
        }
        _ => Err(TripError::WeatherFetch(
            "hourly arrays shorter than time axis".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn window_of(hours: usize, utc_offset_s: i64) -> HourlyForecast {
        let first = NaiveDate::from_ymd_opt(2026, 8, 7)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        HourlyForecast {
            times: (0..hours).map(|h| first + Duration::hours(h as i64)).collect(),
            utc_offset_s,
            temperature_f: (0..hours).map(|h| 60.0 + h as f64).collect(),
            precipitation_in: vec![0.0; hours],
            weather_code: (0..hours as i32).collect(),
            wind_speed_mph: vec![10.0; hours],
        }
    }

    #[test]
    fn test_select_hour_within_window() {
        let forecast = window_of(48, 0);
        let arrival = Utc.with_ymd_and_hms(2026, 8, 7, 13, 30, 0).unwrap();
        assert_eq!(select_hour_index(&forecast, arrival), 13);
    }

    #[test]
    fn test_select_hour_applies_utc_offset() {
        // Arrival 13:30 UTC at UTC-5 is 08:30 local.
        let forecast = window_of(48, -5 * 3600);
        let arrival = Utc.with_ymd_and_hms(2026, 8, 7, 13, 30, 0).unwrap();
        assert_eq!(select_hour_index(&forecast, arrival), 8);
    }

    #[test]
    fn test_select_hour_clamps_before_window() {
        let forecast = window_of(48, 0);
        let arrival = Utc.with_ymd_and_hms(2026, 8, 6, 20, 0, 0).unwrap();
        assert_eq!(select_hour_index(&forecast, arrival), 0);
    }

    #[test]
    fn test_select_hour_exact_last_boundary() {
        let forecast = window_of(24, 0);
        let arrival = Utc.with_ymd_and_hms(2026, 8, 7, 23, 0, 0).unwrap();
        assert_eq!(select_hour_index(&forecast, arrival), 23);
    }

    #[test]
    fn test_select_hour_clamps_past_window() {
        let forecast = window_of(24, 0);
        let arrival = Utc.with_ymd_and_hms(2026, 8, 9, 4, 0, 0).unwrap();
        assert_eq!(select_hour_index(&forecast, arrival), 23);
    }

    #[test]
    fn test_sample_at_carries_hour_values() {
        let forecast = window_of(48, 0);
        let coord = Coordinate { lat: 40.0, lon: -88.0 };
        let arrival = Utc.with_ymd_and_hms(2026, 8, 7, 7, 10, 0).unwrap();
        let sample = sample_at(&forecast, coord, arrival).unwrap();

        assert_eq!(sample.weather_code, 7);
        assert_eq!(sample.temperature_f, 67.0);
        assert_eq!(sample.arrival_time, arrival);
        assert_eq!(sample.coord, coord);
    }

    #[test]
    fn test_parse_forecast_round_trip() {
        let body = r#"{
            "utc_offset_seconds": -18000,
            "hourly": {
                "time": ["2026-08-07T00:00", "2026-08-07T01:00"],
                "temperature_2m": [71.3, 70.1],
                "precipitation": [0.0, 0.02],
                "weather_code": [1, 61],
                "wind_speed_10m": [4.7, 6.2]
            }
        }"#;
        let response: ForecastResponse = serde_json::from_str(body).unwrap();
        let forecast = parse_forecast(response).unwrap();

        assert_eq!(forecast.times.len(), 2);
        assert_eq!(forecast.utc_offset_s, -18000);
        assert_eq!(forecast.weather_code[1], 61);
        assert_eq!(forecast.precipitation_in[1], 0.02);
    }

    #[test]
    fn test_parse_forecast_rejects_empty_window() {
        let body = r#"{
            "utc_offset_seconds": 0,
            "hourly": {
                "time": [],
                "temperature_2m": [],
                "precipitation": [],
                "weather_code": [],
                "wind_speed_10m": []
            }
        }"#;
        let response: ForecastResponse = serde_json::from_str(body).unwrap();
        assert!(matches!(
            parse_forecast(response),
            Err(TripError::WeatherFetch(_))
        ));
    }

    #[test]
    fn test_parse_forecast_rejects_misaligned_arrays() {
        let body = r#"{
            "utc_offset_seconds": 0,
            "hourly": {
                "time": ["2026-08-07T00:00", "2026-08-07T01:00"],
                "temperature_2m": [71.3],
                "precipitation": [0.0, 0.02],
                "weather_code": [1, 61],
                "wind_speed_10m": [4.7, 6.2]
            }
        }"#;
        let response: ForecastResponse = serde_json::from_str(body).unwrap();
        assert!(matches!(
            parse_forecast(response),
            Err(TripError::WeatherFetch(_))
        ));
    }
}
