//! UniFFI exports for the iOS/Android host.
//!
//! The host owns the fitness store and map view; these bindings cover the synchronous
//! interaction core (sheet snapping, track taps, list ordering and labels).

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::{
    activity_type_name, format_distance, format_duration, hit_test, init_logging, GeoPoint,
    PlanarPoint, Route, SheetConfig, SheetState, SortKey, TapLocation, TrackOverlay,
    TrackSelection, UnitSystem, Viewport, WorkoutMeta,
};

// ========================================================================
// Bottom sheet
// ========================================================================

/// Drag-to-setpoint controller shared with the host's gesture handler.
#[derive(uniffi::Object)]
pub struct SheetController {
    state: Mutex<SheetState>,
}

impl SheetController {
    fn with_state<T>(&self, f: impl FnOnce(&mut SheetState) -> T) -> T {
        // A poisoned lock only means a panic mid-update; the state itself is still usable
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

#[uniffi::export]
impl SheetController {
    /// Invalid setpoints fall back to the default configuration.
    #[uniffi::constructor]
    pub fn new(config: SheetConfig) -> Arc<Self> {
        init_logging();
        let state = match SheetState::new(config) {
            Ok(state) => state,
            Err(e) => {
                warn!("[WorkoutMapperRust] {}; using default sheet setpoints", e);
                SheetState::default()
            }
        };
        Arc::new(Self {
            state: Mutex::new(state),
        })
    }

    pub fn begin_drag(&self) {
        self.with_state(|s| s.begin_drag());
    }

    pub fn update_drag(&self, translation: f64) {
        self.with_state(|s| s.update_drag(translation));
    }

    pub fn end_drag(&self, translation: f64, predicted_translation: f64) -> f64 {
        self.with_state(|s| s.end_drag(translation, predicted_translation))
    }

    pub fn cancel_drag(&self) {
        self.with_state(|s| s.cancel_drag());
    }

    pub fn visual_offset(&self) -> f64 {
        self.with_state(|s| s.visual_offset())
    }

    pub fn rest_position(&self) -> f64 {
        self.with_state(|s| s.rest_position())
    }

    pub fn content_inset(&self) -> f64 {
        self.with_state(|s| s.content_inset())
    }

    pub fn is_dragging(&self) -> bool {
        self.with_state(|s| s.is_dragging())
    }
}

/// Get default sheet configuration.
#[uniffi::export]
pub fn default_sheet_config() -> SheetConfig {
    SheetConfig::default()
}

// ========================================================================
// Track taps
// ========================================================================

/// A displayed track as sent by the Swift/Kotlin host.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FlatTrack {
    pub route_id: String,
    /// Flat array of coordinates: [lat1, lng1, lat2, lng2, ...]
    pub coords: Vec<f64>,
}

fn route_from_flat(track: &FlatTrack) -> Option<Route> {
    let epoch = DateTime::<Utc>::default();
    let points: Vec<GeoPoint> = track
        .coords
        .chunks_exact(2)
        .map(|chunk| GeoPoint::new(chunk[0], chunk[1], epoch))
        .collect();
    Route::new(track.route_id.clone(), points)
}

/// Route id of the first displayed track containing a screen tap, if any.
///
/// `tracks` must be in display order. A `None` result means "keep the current selection".
#[uniffi::export]
pub fn hit_test_screen_tap(
    tracks: Vec<FlatTrack>,
    tap: PlanarPoint,
    viewport: Viewport,
) -> Option<String> {
    init_logging();
    let routes: Vec<Route> = tracks.iter().filter_map(route_from_flat).collect();
    let refs: Vec<&Route> = routes.iter().collect();

    let start = std::time::Instant::now();
    let hit = hit_test(TapLocation::Screen(tap), &refs, &viewport).map(|r| r.id().to_string());
    debug!(
        "[WorkoutMapperRust] Hit test over {} tracks in {:?}: {:?}",
        refs.len(),
        start.elapsed(),
        hit
    );
    hit
}

/// Overlays for `tracks` in display order with `selected_route_id` highlighted.
#[uniffi::export]
pub fn track_overlays(tracks: Vec<FlatTrack>, selected_route_id: Option<String>) -> Vec<TrackOverlay> {
    let routes: Vec<Route> = tracks.iter().filter_map(route_from_flat).collect();
    let refs: Vec<&Route> = routes.iter().collect();
    let mut selection = TrackSelection::new();
    if let Some(id) = selected_route_id {
        selection.select(id);
    }
    selection.retain_known(&refs);
    selection.overlays(&refs)
}

// ========================================================================
// Workout list
// ========================================================================

/// Workout summary passed from the host for list ordering.
#[derive(Debug, Clone, uniffi::Record)]
pub struct WorkoutSummary {
    pub workout_id: String,
    pub activity_type_code: u32,
    /// Start time in milliseconds since the Unix epoch
    pub start_time_ms: i64,
    pub total_distance_meters: Option<f64>,
    pub duration_seconds: f64,
}

impl WorkoutSummary {
    fn to_meta(&self) -> WorkoutMeta {
        let start = DateTime::<Utc>::from_timestamp_millis(self.start_time_ms).unwrap_or_default();
        // Saturating cast; an end past chrono's range falls back to the start
        let millis = (self.duration_seconds.max(0.0) * 1000.0) as i64;
        let end = chrono::Duration::try_milliseconds(millis)
            .and_then(|span| start.checked_add_signed(span))
            .unwrap_or(start);
        WorkoutMeta {
            id: self.workout_id.clone(),
            activity_type_code: self.activity_type_code,
            start_time: start,
            end_time: end,
            total_distance_meters: self.total_distance_meters,
            duration_seconds: self.duration_seconds,
        }
    }
}

/// Workout ids ordered by `key` (stable; ties keep input order).
#[uniffi::export]
pub fn sort_workout_ids(workouts: Vec<WorkoutSummary>, key: SortKey) -> Vec<String> {
    init_logging();
    let mut metas: Vec<WorkoutMeta> = workouts.iter().map(WorkoutSummary::to_meta).collect();
    metas.sort_by(|a, b| key.compare(a, b));
    info!("[WorkoutMapperRust] Sorted {} workouts by {}", metas.len(), key);
    metas.into_iter().map(|m| m.id).collect()
}

/// Display name for an activity code.
#[uniffi::export]
pub fn activity_name(code: u32) -> String {
    activity_type_name(code).to_string()
}

/// "1 hr 5 min" style duration label.
#[uniffi::export]
pub fn duration_label(seconds: f64) -> String {
    format_duration(seconds)
}

/// "5.0 km" / "3.1 mi" / "Not recorded" distance label.
#[uniffi::export]
pub fn distance_label(meters: Option<f64>, units: UnitSystem) -> String {
    format_distance(meters, units)
}
