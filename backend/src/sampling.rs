use shared::{Coordinate, RoutePoint};

const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Floor for the sampling interval. A non-positive interval would make the
/// walk below emit every vertex, so callers passing one are clamped here.
const MIN_INTERVAL_KM: f64 = 1.0;

pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

pub fn route_distance_km(path: &[Coordinate]) -> f64 {
    path.windows(2).map(|w| haversine_km(w[0], w[1])).sum()
}

/// Walk the polyline and emit a point whenever at least `interval_km` of
/// polyline length has accumulated since the previous emission, plus the
/// final vertex. Emitted points are always polyline vertices, never
/// interpolated positions, so consecutive points span *at least* the
/// interval rather than exactly it.
pub fn sample_route(polyline: &[Coordinate], interval_km: f64) -> Vec<RoutePoint> {
    let interval = interval_km.max(MIN_INTERVAL_KM);
    let Some(&first) = polyline.first() else {
        return Vec::new();
    };

    let mut points = vec![RoutePoint {
        coord: first,
        cumulative_km: 0.0,
    }];
    // Polyline length consumed since the last emitted point.
    let mut pending_km = 0.0;
    let mut emitted_km = 0.0;

    for pair in polyline.windows(2) {
        pending_km += haversine_km(pair[0], pair[1]);
        if pending_km >= interval {
            emitted_km += pending_km;
            points.push(RoutePoint {
                coord: pair[1],
                cumulative_km: emitted_km,
            });
            pending_km = 0.0;
        }
    }

    if let Some(&end) = polyline.last() {
        let already_emitted = points.last().map(|p| p.coord) == Some(end);
        if !already_emitted {
            points.push(RoutePoint {
                coord: end,
                cumulative_km: emitted_km + pending_km,
            });
        }
    }

    points
}
