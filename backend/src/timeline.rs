use chrono::{DateTime, Duration, Utc};

/// Projected arrival time for each sample index: departure plus the route
/// duration scaled by `i / (n - 1)`. Progress is linear in sample *index*,
/// not in distance between samples, which matches how the rendered
/// timeline has always been computed.
pub fn project_arrival_times(
    departure: DateTime<Utc>,
    total_duration_s: f64,
    n: usize,
) -> Vec<DateTime<Utc>> {
    (0..n)
        .map(|i| {
            let progress = if n <= 1 {
                0.0
            } else {
                i as f64 / (n - 1) as f64
            };
            departure + Duration::milliseconds((total_duration_s * progress * 1000.0).round() as i64)
        })
        .collect()
}
