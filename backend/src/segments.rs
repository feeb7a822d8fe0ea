use kdtree::distance::squared_euclidean;
use kdtree::KdTree;
use shared::{Coordinate, RouteSegment, WeatherSample};

use crate::classify::classify;

/// Spatial index over the route polyline vertices, keyed by raw
/// [lon, lat] degrees. Matching is planar Euclidean on purpose: segment
/// boundaries must stay identical to the ones produced for previously
/// cached and saved routes, which used the same metric.
struct PolylineIndex {
    tree: KdTree<f64, usize, [f64; 2]>,
}

impl PolylineIndex {
    fn new(polyline: &[Coordinate]) -> Self {
        let mut tree = KdTree::new(2);
        for (idx, coord) in polyline.iter().enumerate() {
            let _ = tree.add([coord.lon, coord.lat], idx);
        }
        Self { tree }
    }

    fn nearest(&self, target: Coordinate) -> usize {
        self.tree
            .nearest(&[target.lon, target.lat], 1, &squared_euclidean)
            .ok()
            .and_then(|hits| hits.first().map(|&(_, &idx)| idx))
            .unwrap_or(0)
    }
}

/// One renderable segment per consecutive sample pair. Each segment slices
/// the polyline between the vertices nearest the two samples; all display
/// fields come from the pair's *start* sample (trailing-edge attribution).
pub fn build_segments(polyline: &[Coordinate], samples: &[WeatherSample]) -> Vec<RouteSegment> {
    if polyline.is_empty() {
        return Vec::new();
    }

    let index = PolylineIndex::new(polyline);

    samples
        .windows(2)
        .map(|pair| {
            let start_idx = index.nearest(pair[0].coord);
            let end_idx = index.nearest(pair[1].coord);

            // Nearest-match on a backtracking route can invert the pair.
            // Degrade to the single start vertex so the segment count
            // invariant survives and renderers only ever see a 0/1-length
            // line in the worst case.
            let path = if start_idx < end_idx {
                polyline[start_idx..=end_idx].to_vec()
            } else {
                vec![polyline[start_idx]]
            };

            let sample = &pair[0];
            let class = classify(sample.weather_code);
            RouteSegment {
                path,
                color: class.color.to_string(),
                weather_code: sample.weather_code,
                description: class.description.to_string(),
                temperature_f: sample.temperature_f,
                precipitation_in: sample.precipitation_in,
                wind_speed_mph: sample.wind_speed_mph,
                arrival_time: sample.arrival_time,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate { lat, lon }
    }

    fn sample(at: Coordinate, weather_code: i32) -> WeatherSample {
        WeatherSample {
            coord: at,
            temperature_f: 68.0,
            precipitation_in: 0.0,
            weather_code,
            wind_speed_mph: 5.0,
            arrival_time: Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap(),
        }
    }

    fn straight_polyline(n: usize) -> Vec<Coordinate> {
        (0..n).map(|i| coord(45.0 + i as f64 * 0.01, 5.0)).collect()
    }

    #[test]
    fn test_segment_count_is_samples_minus_one() {
        let polyline = straight_polyline(20);
        for n in [0usize, 1, 2, 5] {
            let samples: Vec<_> = (0..n)
                .map(|i| sample(polyline[i * 3], 0))
                .collect();
            let segments = build_segments(&polyline, &samples);
            assert_eq!(segments.len(), n.saturating_sub(1));
        }
    }

    #[test]
    fn test_slices_cover_vertices_between_samples() {
        let polyline = straight_polyline(10);
        let samples = vec![sample(polyline[0], 0), sample(polyline[4], 0), sample(polyline[9], 0)];
        let segments = build_segments(&polyline, &samples);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].path.len(), 5);
        assert_eq!(segments[0].path[0], polyline[0]);
        assert_eq!(segments[0].path[4], polyline[4]);
        assert_eq!(segments[1].path.len(), 6);
        assert_eq!(segments[1].path[5], polyline[9]);
    }

    #[test]
    fn test_fields_come_from_start_sample() {
        let polyline = straight_polyline(10);
        let mut first = sample(polyline[0], 65);
        first.temperature_f = 41.0;
        let second = sample(polyline[9], 0);
        let segments = build_segments(&polyline, &[first, second]);

        assert_eq!(segments[0].weather_code, 65);
        assert_eq!(segments[0].color, "#1e40af");
        assert_eq!(segments[0].description, "Heavy rain");
        assert_eq!(segments[0].temperature_f, 41.0);
    }

    #[test]
    fn test_backtracking_route_degrades_to_single_vertex() {
        // Out-and-back polyline: the second sample sits closest to an
        // earlier vertex than the first, inverting the match. The return
        // leg is offset a hair in longitude so nearest-match ties cannot
        // occur.
        let mut polyline = straight_polyline(6);
        polyline.extend((0..5).rev().map(|i| coord(45.0 + i as f64 * 0.01, 5.001)));

        let samples = vec![sample(coord(45.05, 5.0), 0), sample(coord(45.01, 5.0), 0)];
        let segments = build_segments(&polyline, &samples);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].path.len(), 1);
        assert_eq!(segments[0].path[0], coord(45.05, 5.0));
    }

    #[test]
    fn test_empty_polyline_yields_no_segments() {
        let samples = vec![sample(coord(45.0, 5.0), 0), sample(coord(45.1, 5.0), 0)];
        assert!(build_segments(&[], &samples).is_empty());
    }
}
