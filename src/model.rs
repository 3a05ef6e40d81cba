//! Workout, route and point types produced by the retrieval pipeline.
//!
//! Everything here is an immutable snapshot: a pipeline run builds fresh values and the next
//! run replaces them wholesale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::activity_type_name;
use crate::geo_utils;
use crate::sort::{sort_workouts, SortKey};

// ============================================================================
// Coordinates
// ============================================================================

/// A WGS84 coordinate without a timestamp (taps, overlay vertices, bounds centers).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check if the coordinate is finite and within WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A timestamped location sample along a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            timestamp,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    pub fn is_valid(&self) -> bool {
        self.coordinate().is_valid()
    }
}

/// Bounding box in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_lat: self.min_lat.min(other.min_lat),
            max_lat: self.max_lat.max(other.max_lat),
            min_lng: self.min_lng.min(other.min_lng),
            max_lng: self.max_lng.max(other.max_lng),
        }
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}

// ============================================================================
// Routes and workouts
// ============================================================================

/// A GPS track recorded during a workout. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    id: String,
    points: Vec<GeoPoint>,
}

impl Route {
    /// Build a route from its points in recording order.
    ///
    /// Returns `None` when there are no points.
    pub fn new(id: impl Into<String>, points: Vec<GeoPoint>) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(Self {
            id: id.into(),
            points,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.points.iter().map(GeoPoint::coordinate).collect()
    }

    /// Track length in meters along consecutive points.
    pub fn length_meters(&self) -> f64 {
        geo_utils::polyline_length(&self.coordinates())
    }

    pub fn bounds(&self) -> Bounds {
        geo_utils::compute_bounds(&self.coordinates())
    }
}

/// Workout metadata as reported by the fitness store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutMeta {
    pub id: String,
    pub activity_type_code: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Total distance in meters, if the workout recorded one
    pub total_distance_meters: Option<f64>,
    pub duration_seconds: f64,
}

impl WorkoutMeta {
    /// Duration is non-negative and the time span is not inverted.
    pub fn is_consistent(&self) -> bool {
        self.duration_seconds.is_finite()
            && self.duration_seconds >= 0.0
            && self.end_time >= self.start_time
    }
}

/// A workout together with its routes. Always has at least one route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutRecord {
    meta: WorkoutMeta,
    routes: Vec<Route>,
}

impl WorkoutRecord {
    /// Returns `None` when `routes` is empty: route-less workouts are never published.
    pub fn new(meta: WorkoutMeta, routes: Vec<Route>) -> Option<Self> {
        if routes.is_empty() {
            return None;
        }
        Some(Self { meta, routes })
    }

    pub fn meta(&self) -> &WorkoutMeta {
        &self.meta
    }

    pub fn id(&self) -> &str {
        &self.meta.id
    }

    pub fn activity_type_code(&self) -> u32 {
        self.meta.activity_type_code
    }

    /// Display name of the activity, e.g. "Running".
    pub fn activity_name(&self) -> &'static str {
        activity_type_name(self.meta.activity_type_code)
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.meta.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.meta.end_time
    }

    pub fn total_distance_meters(&self) -> Option<f64> {
        self.meta.total_distance_meters
    }

    pub fn duration_seconds(&self) -> f64 {
        self.meta.duration_seconds
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

/// The published result of one pipeline run, newest workout first.
///
/// Never empty: an empty run is reported as [`crate::Retrieval::NoRoutedWorkouts`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedCollection {
    workouts: Vec<WorkoutRecord>,
}

impl RetrievedCollection {
    /// Returns `None` for an empty record list.
    pub fn from_records(workouts: Vec<WorkoutRecord>) -> Option<Self> {
        if workouts.is_empty() {
            return None;
        }
        Some(Self { workouts })
    }

    pub fn workouts(&self) -> &[WorkoutRecord] {
        &self.workouts
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn route_count(&self) -> usize {
        self.workouts.iter().map(|w| w.routes.len()).sum()
    }

    /// All routes in pipeline order (workout order, then route order within a workout).
    pub fn tracks(&self) -> Vec<&Route> {
        self.workouts.iter().flat_map(|w| w.routes.iter()).collect()
    }

    pub fn route(&self, route_id: &str) -> Option<&Route> {
        self.workouts
            .iter()
            .flat_map(|w| w.routes.iter())
            .find(|r| r.id == route_id)
    }

    /// Workouts ordered by `key`, see [`sort_workouts`].
    pub fn sorted(&self, key: SortKey) -> Vec<&WorkoutRecord> {
        sort_workouts(&self.workouts, key)
    }

    /// Bounding box of every route, for fitting the map camera.
    pub fn bounds(&self) -> Bounds {
        let mut tracks = self.tracks().into_iter().map(Route::bounds);
        // Collections are non-empty and routes are non-empty
        let first = tracks.next().unwrap_or(Bounds {
            min_lat: 0.0,
            max_lat: 0.0,
            min_lng: 0.0,
            max_lng: 0.0,
        });
        tracks.fold(first, |acc, b| acc.union(&b))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(51.5074, -0.1278).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 181.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_empty_route_rejected() {
        assert!(Route::new("r", Vec::new()).is_none());
    }

    #[test]
    fn test_workout_without_routes_rejected() {
        assert!(WorkoutRecord::new(meta("w", 37, 8, Some(5000.0), 1800.0), Vec::new()).is_none());
    }

    #[test]
    fn test_meta_consistency() {
        let mut m = meta("w", 37, 8, None, 600.0);
        assert!(m.is_consistent());
        m.duration_seconds = -1.0;
        assert!(!m.is_consistent());
        m.duration_seconds = 600.0;
        m.end_time = at(7);
        assert!(!m.is_consistent());
    }

    #[test]
    fn test_collection_tracks_in_pipeline_order() {
        let a = WorkoutRecord::new(
            meta("a", 37, 9, None, 60.0),
            vec![route("a-1", &[(1.0, 1.0)]), route("a-2", &[(2.0, 2.0)])],
        )
        .unwrap();
        let b = record(meta("b", 52, 8, None, 60.0), "b-1");
        let collection = RetrievedCollection::from_records(vec![a, b]).unwrap();

        let ids: Vec<&str> = collection.tracks().iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["a-1", "a-2", "b-1"]);
        assert_eq!(collection.route_count(), 3);
        assert!(collection.route("a-2").is_some());
        assert!(collection.route("zzz").is_none());
    }

    #[test]
    fn test_collection_bounds() {
        let a = WorkoutRecord::new(
            meta("a", 37, 9, None, 60.0),
            vec![route("a-1", &[(10.0, 20.0), (11.0, 21.0)])],
        )
        .unwrap();
        let b = WorkoutRecord::new(
            meta("b", 37, 8, None, 60.0),
            vec![route("b-1", &[(-5.0, 30.0)])],
        )
        .unwrap();
        let bounds = RetrievedCollection::from_records(vec![a, b]).unwrap().bounds();
        assert_eq!(bounds.min_lat, -5.0);
        assert_eq!(bounds.max_lat, 11.0);
        assert_eq!(bounds.min_lng, 20.0);
        assert_eq!(bounds.max_lng, 30.0);
    }

    #[test]
    fn test_route_length() {
        // 0.001 degrees of latitude is roughly 111 m
        let r = route("r", &[(51.500, -0.1278), (51.501, -0.1278), (51.502, -0.1278)]);
        assert!((r.length_meters() - 222.4).abs() < 2.0, "got {}", r.length_meters());
        assert_eq!(route("dot", &[(51.5, -0.12)]).length_meters(), 0.0);
    }

    #[test]
    fn test_empty_collection_rejected() {
        assert!(RetrievedCollection::from_records(Vec::new()).is_none());
    }
}
