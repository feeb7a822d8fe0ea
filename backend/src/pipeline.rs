use futures::future::try_join_all;
use shared::{TripRequest, TripResponse};

use crate::alerts::summarize_alerts;
use crate::error::TripError;
use crate::gpx_export::encode_route_as_gpx;
use crate::ors::RoutePlanner;
use crate::sampling::sample_route;
use crate::segments::build_segments;
use crate::timeline::project_arrival_times;
use crate::weather::{sample_at, ForecastApi};

/// Route polyline is sampled for weather every this many kilometers.
pub const DEFAULT_SAMPLE_INTERVAL_KM: f64 = 40.0;

const METERS_PER_MILE: f64 = 1_609.34;

/// Full route+weather computation: geocode both ends (concurrently), fetch
/// the route, sample it, project arrival times, fetch one forecast per
/// sample (all at once, failing fast so no partial result is ever
/// rendered), then derive colored segments and the alert summary.
pub async fn plan_trip(
    planner: &dyn RoutePlanner,
    forecast: &dyn ForecastApi,
    request: &TripRequest,
    interval_km: f64,
) -> Result<TripResponse, TripError> {
    let (start, end) = tokio::try_join!(
        planner.geocode(&request.start_address),
        planner.geocode(&request.end_address),
    )?;

    let route = planner.directions(start, end).await?;
    let points = sample_route(&route.path, interval_km);
    let times = project_arrival_times(request.departure, route.duration_s, points.len());

    let samples = try_join_all(points.iter().zip(&times).map(|(point, &arrival)| async move {
        let hourly = forecast.hourly(point.coord, arrival).await?;
        sample_at(&hourly, point.coord, arrival)
    }))
    .await?;

    let segments = build_segments(&route.path, &samples);
    let distance_mi = route.distance_m / METERS_PER_MILE;
    let alerts = summarize_alerts(&samples, distance_mi);
    let gpx_base64 = encode_route_as_gpx(&route.path)?;

    tracing::info!(
        "trip planned: {} samples, {} segments, {} alert ranges over {:.1} mi",
        samples.len(),
        segments.len(),
        alerts.len(),
        distance_mi
    );

    Ok(TripResponse {
        start,
        end,
        route,
        distance_mi,
        samples,
        segments,
        alerts,
        gpx_base64,
    })
}
