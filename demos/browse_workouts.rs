//! Load routed workouts from an in-memory store, list them, tap a track and drag the sheet.
//!
//! Run with: cargo run --example browse_workouts

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use workout_mapper::{
    list_rows, FixedUnitPreference, GeoPoint, InMemoryStore, LoadState, MapSurface,
    PipelineConfig, RouteLibrary, SheetConfig, SheetState, SortKey, TapLocation, TrackOverlay,
    TrackSelection, UnitSystem, Viewport, WorkoutMeta,
};

struct PrintSurface;

impl MapSurface for PrintSurface {
    fn set_overlays(&mut self, overlays: Vec<TrackOverlay>) {
        for overlay in overlays {
            println!(
                "   draw {} ({} points, {:?}, width {})",
                overlay.route_id,
                overlay.points.len(),
                overlay.color,
                overlay.line_width
            );
        }
    }
}

fn workout(id: &str, code: u32, hour: u32, distance: Option<f64>, duration: f64) -> WorkoutMeta {
    let start = Utc.with_ymd_and_hms(2024, 9, 24, hour, 0, 0).unwrap();
    WorkoutMeta {
        id: id.to_string(),
        activity_type_code: code,
        start_time: start,
        end_time: start + Duration::seconds(duration as i64),
        total_distance_meters: distance,
        duration_seconds: duration,
    }
}

fn track(hour: u32, coords: &[(f64, f64)]) -> Vec<GeoPoint> {
    let start = Utc.with_ymd_and_hms(2024, 9, 24, hour, 0, 0).unwrap();
    coords
        .iter()
        .enumerate()
        .map(|(i, &(lat, lng))| GeoPoint::new(lat, lng, start + Duration::seconds(i as i64 * 60)))
        .collect()
}

#[tokio::main]
async fn main() {
    let mut store = InMemoryStore::new();
    store.add_workout(workout("w-run", 37, 9, Some(5000.0), 1800.0));
    store.add_route(
        "w-run",
        "r-run",
        track(9, &[(51.500, -0.130), (51.500, -0.120), (51.510, -0.120), (51.510, -0.130)]),
    );
    // Indoor walk: no route, so it never reaches the map
    store.add_workout(workout("w-walk", 52, 8, Some(1200.0), 900.0));
    store.add_workout(workout("w-ride", 13, 7, Some(10000.0), 3600.0));
    store.add_route("w-ride", "r-ride", track(7, &[(51.520, -0.100), (51.540, -0.080)]));

    println!("Workout Mapper Example\n");

    let library = RouteLibrary::new(Arc::new(store), PipelineConfig::default());
    if let Err(e) = library.refresh().await {
        println!("Refresh failed: {}", e);
        return;
    }

    let collection = match library.state() {
        LoadState::Loaded(collection) => collection,
        other => {
            println!("Nothing to show: {:?}", other);
            return;
        }
    };

    println!("1. Workouts by distance:");
    let units = FixedUnitPreference(UnitSystem::Metric);
    for row in list_rows(&collection, SortKey::Distance, &units) {
        println!("   {:<10} {:<14} {:<10} {}", row.title, row.date, row.distance, row.duration);
    }

    println!("\n2. Tap inside the run loop:");
    let tracks = collection.tracks();
    let viewport = Viewport::new(collection.bounds().center(), 12.0, 390.0, 844.0);
    let mut selection = TrackSelection::new();
    let mut surface = PrintSurface;
    let outcome = selection.handle_tap(
        TapLocation::Geo(workout_mapper::Coordinate::new(51.505, -0.125)),
        &tracks,
        &viewport,
        &mut surface,
    );
    println!("   -> {:?}", outcome);

    println!("\n3. Drag the sheet up from collapsed:");
    let mut sheet = SheetState::new(SheetConfig::default()).unwrap();
    sheet.begin_drag();
    sheet.update_drag(-250.0);
    println!("   dragging at {:.0}", sheet.visual_offset());
    let rest = sheet.end_drag(-250.0, -400.0);
    println!("   settled on {:.0} (content inset {:.0})", rest, sheet.content_inset());
}
