//! # Workout Mapper
//!
//! Workout route retrieval and map interaction for a fitness app.
//!
//! This library provides:
//! - A concurrent retrieval pipeline that loads routed workouts from a fitness store
//! - A route library that keeps only the latest refresh result
//! - Tap hit testing and single-track highlighting on a map
//! - A drag-to-setpoint bottom sheet and list ordering/formatting
//!
//! ## Features
//!
//! - **`parallel`** - Project tracks in parallel with rayon during hit testing
//! - **`ffi`** - Enable FFI bindings for mobile platforms (iOS/Android)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use workout_mapper::{
//!     fetch_all_routed_workouts, GeoPoint, InMemoryStore, PipelineConfig, SortKey, WorkoutMeta,
//! };
//!
//! # tokio_test_block(async {
//! let start = Utc.with_ymd_and_hms(2024, 9, 24, 7, 0, 0).unwrap();
//! let mut store = InMemoryStore::new();
//! store.add_workout(WorkoutMeta {
//!     id: "run".into(),
//!     activity_type_code: 37,
//!     start_time: start,
//!     end_time: start + chrono::Duration::minutes(30),
//!     total_distance_meters: Some(5000.0),
//!     duration_seconds: 1800.0,
//! });
//! store.add_route("run", "run-route", vec![
//!     GeoPoint::new(51.5074, -0.1278, start),
//!     GeoPoint::new(51.5080, -0.1290, start),
//! ]);
//!
//! let retrieval = fetch_all_routed_workouts(&store, &PipelineConfig::default()).await.unwrap();
//! let collection = retrieval.collection().unwrap();
//! assert_eq!(collection.sorted(SortKey::Distance)[0].activity_name(), "Running");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

// Error types shared by the pipeline and configuration
pub mod error;
pub use error::{MapperError, QueryStage, Result, StoreError};

// Core workout and route types
pub mod model;
pub use model::{Bounds, Coordinate, GeoPoint, RetrievedCollection, Route, WorkoutMeta, WorkoutRecord};

pub mod activity;
pub use activity::{activity_type_name, UNKNOWN_ACTIVITY};

pub mod geo_utils;

// Store abstraction and retrieval pipeline
pub mod pipeline;
pub use pipeline::{
    fetch_all_routed_workouts, FitnessStore, PipelineConfig, PointBatch, PointStream, Retrieval,
    RouteMeta,
};

pub mod library;
pub use library::{LoadState, RefreshOutcome, RouteLibrary};

pub mod memory_store;
pub use memory_store::InMemoryStore;

// Map interaction
pub mod projection;
pub use projection::{MapProjection, PlanarPoint, Viewport, WebMercator};

pub use hit_test::{hit_test, ProjectedTracks, TapLocation};

pub mod selection;
pub use selection::{MapSurface, TapOutcome, TrackColor, TrackOverlay, TrackSelection, TRACK_LINE_WIDTH};

pub mod sheet;
pub use sheet::{resolve_setpoint, DragPhase, SheetConfig, SheetState};

// List presentation
pub mod sort;
pub use sort::{sort_workouts, SortKey};

pub mod units;
pub use units::{
    format_date, format_distance, format_duration, list_rows, FixedUnitPreference,
    UnitPreferences, UnitSystem, WorkoutRow,
};

#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("WorkoutMapperRust"),
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
fn init_logging() {
    // No-op on non-Android platforms
}
