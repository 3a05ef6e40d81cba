//! # Geographic Utilities
//!
//! Small geographic helpers for workout tracks.
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine_distance`] | Great-circle distance between two coordinates |
//! | [`polyline_length`] | Total length of a track in meters |
//! | [`compute_bounds`] | Bounding box of a track |
//!
//! All functions expect WGS84 coordinates (latitude/longitude in degrees).
//!
//! ## Example
//!
//! ```rust
//! use workout_mapper::{Coordinate, geo_utils};
//!
//! let track = vec![
//!     Coordinate::new(51.5074, -0.1278),
//!     Coordinate::new(51.5080, -0.1290),
//!     Coordinate::new(51.5090, -0.1300),
//! ];
//!
//! let length = geo_utils::polyline_length(&track);
//! assert!(length > 0.0);
//! ```

use geo::{Distance, Haversine, Point};

use crate::{Bounds, Coordinate};

/// Great-circle distance in meters between two coordinates (spherical Earth, r = 6,371 km).
///
/// ```rust
/// use workout_mapper::{Coordinate, geo_utils};
///
/// let london = Coordinate::new(51.5074, -0.1278);
/// let paris = Coordinate::new(48.8566, 2.3522);
///
/// let distance = geo_utils::haversine_distance(&london, &paris);
/// assert!((distance - 343_560.0).abs() < 1000.0); // ~344 km
/// ```
#[inline]
pub fn haversine_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let p1 = Point::new(a.longitude, a.latitude);
    let p2 = Point::new(b.longitude, b.latitude);
    Haversine::distance(p1, p2)
}

/// Sum of haversine distances between consecutive points. Fewer than two points is 0.0.
pub fn polyline_length(points: &[Coordinate]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

/// Bounding box of a track.
///
/// For empty input the bounds are inverted (MAX/MIN) and contain nothing.
pub fn compute_bounds(points: &[Coordinate]) -> Bounds {
    let mut bounds = Bounds {
        min_lat: f64::MAX,
        max_lat: f64::MIN,
        min_lng: f64::MAX,
        max_lng: f64::MIN,
    };

    for p in points {
        bounds.min_lat = bounds.min_lat.min(p.latitude);
        bounds.max_lat = bounds.max_lat.max(p.latitude);
        bounds.min_lng = bounds.min_lng.min(p.longitude);
        bounds.max_lng = bounds.max_lng.max(p.longitude);
    }

    bounds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_haversine_distance_same_point() {
        let p = Coordinate::new(51.5074, -0.1278);
        assert!(approx_eq(haversine_distance(&p, &p), 0.0, 0.001));
    }

    #[test]
    fn test_haversine_distance_known_value() {
        // London to Paris is approximately 343.5 km
        let london = Coordinate::new(51.5074, -0.1278);
        let paris = Coordinate::new(48.8566, 2.3522);
        let dist = haversine_distance(&london, &paris);
        assert!(approx_eq(dist, 343_560.0, 1000.0));
    }

    #[test]
    fn test_polyline_length_short_inputs() {
        assert_eq!(polyline_length(&[]), 0.0);
        assert_eq!(polyline_length(&[Coordinate::new(51.5074, -0.1278)]), 0.0);
    }

    #[test]
    fn test_polyline_length_sums_segments() {
        // 0.001 degrees of latitude is roughly 111 m
        let points: Vec<Coordinate> = (0..4)
            .map(|i| Coordinate::new(51.5 + i as f64 * 0.001, -0.1278))
            .collect();
        let length = polyline_length(&points);
        assert!(approx_eq(length, 333.6, 2.0), "got {}", length);
    }

    #[test]
    fn test_compute_bounds() {
        let points = vec![
            Coordinate::new(51.5000, -0.1300),
            Coordinate::new(51.5100, -0.1200),
            Coordinate::new(51.5050, -0.1250),
        ];
        let bounds = compute_bounds(&points);
        assert!(approx_eq(bounds.min_lat, 51.5000, 1e-9));
        assert!(approx_eq(bounds.max_lat, 51.5100, 1e-9));
        assert!(approx_eq(bounds.min_lng, -0.1300, 1e-9));
        assert!(approx_eq(bounds.max_lng, -0.1200, 1e-9));
    }
}
