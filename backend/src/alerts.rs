use shared::{AlertCategory, AlertRange, WeatherSample};

use crate::classify::classify;

/// Merge maximal runs of consecutive samples sharing one alert category
/// into mile/time ranges. Good-weather samples (no category) never open a
/// range, and any category change closes the current one, bad-to-bad
/// included. An all-good route yields an empty list.
pub fn summarize_alerts(samples: &[WeatherSample], total_mi: f64) -> Vec<AlertRange> {
    let n = samples.len();
    let mile_at = |i: usize| {
        if n <= 1 {
            0.0
        } else {
            total_mi * i as f64 / (n - 1) as f64
        }
    };
    let range = |category: AlertCategory, first: usize, last: usize| AlertRange {
        category,
        start_mile: mile_at(first),
        end_mile: mile_at(last),
        start_time: samples[first].arrival_time,
        end_time: samples[last].arrival_time,
    };

    let mut ranges = Vec::new();
    // Currently open run: (category, first sample index, last sample index).
    let mut open: Option<(AlertCategory, usize, usize)> = None;

    for (i, sample) in samples.iter().enumerate() {
        let category = classify(sample.weather_code).category;
        open = match (open, category) {
            (Some((cat, first, _)), Some(cur)) if cat == cur => Some((cat, first, i)),
            (prev, cur) => {
                if let Some((cat, first, last)) = prev {
                    ranges.push(range(cat, first, last));
                }
                cur.map(|c| (c, i, i))
            }
        };
    }
    if let Some((cat, first, last)) = open {
        ranges.push(range(cat, first, last));
    }

    ranges
}
