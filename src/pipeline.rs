//! Retrieval pipeline: workouts, then their routes, then each route's points.
//!
//! One run reads the fitness store in three stages:
//! 1. list every workout, newest first
//! 2. list the routes associated with each workout (workouts without routes are dropped)
//! 3. stream each route's points until the store signals completion
//!
//! Any query failure aborts the run. Nothing is published from a partial run.
//!
//! Stage 2 and 3 lookups may overlap up to [`PipelineConfig`] limits. Overlap never changes
//! the order of the result: futures are driven with `buffered`, which yields in input order.

use std::time::Instant;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{MapperError, QueryStage, Result, StoreError};
use crate::{GeoPoint, RetrievedCollection, Route, WorkoutMeta, WorkoutRecord};

/// A route known to the fitness store, before its points are loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMeta {
    pub id: String,
    pub workout_id: String,
}

/// One delivery of points from a route query.
#[derive(Debug, Clone, PartialEq)]
pub struct PointBatch {
    pub points: Vec<GeoPoint>,
    /// Set on the final batch of the route
    pub done: bool,
}

/// Point batches in delivery order.
pub type PointStream = BoxStream<'static, std::result::Result<PointBatch, StoreError>>;

/// Read-only access to the device fitness store.
#[async_trait]
pub trait FitnessStore: Send + Sync {
    /// Every workout, ordered newest first by start time.
    async fn list_workouts(&self) -> std::result::Result<Vec<WorkoutMeta>, StoreError>;

    /// Routes associated with the given workout.
    async fn list_routes_for_workout(
        &self,
        workout_id: &str,
    ) -> std::result::Result<Vec<RouteMeta>, StoreError>;

    /// Points of a route, delivered in batches terminated by a batch with `done` set.
    async fn stream_points_for_route(
        &self,
        route_id: &str,
    ) -> std::result::Result<PointStream, StoreError>;
}

/// Concurrency limits for a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct PipelineConfig {
    /// Workouts whose routes are resolved at the same time.
    /// Default: 4
    pub workout_concurrency: u32,

    /// Routes of one workout whose points are streamed at the same time.
    /// Default: 4
    pub route_concurrency: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workout_concurrency: 4,
            route_concurrency: 4,
        }
    }
}

impl PipelineConfig {
    /// Strictly sequential access, one query in flight at a time.
    pub fn sequential() -> Self {
        Self {
            workout_concurrency: 1,
            route_concurrency: 1,
        }
    }
}

/// Outcome of a successful pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum Retrieval {
    /// At least one workout has a non-empty route
    Workouts(RetrievedCollection),
    /// The queries succeeded but there is nothing to show
    NoRoutedWorkouts,
}

impl Retrieval {
    pub fn collection(&self) -> Option<&RetrievedCollection> {
        match self {
            Retrieval::Workouts(c) => Some(c),
            Retrieval::NoRoutedWorkouts => None,
        }
    }

    pub fn into_collection(self) -> Option<RetrievedCollection> {
        match self {
            Retrieval::Workouts(c) => Some(c),
            Retrieval::NoRoutedWorkouts => None,
        }
    }
}

/// Fetch every workout that has at least one non-empty route, newest first.
pub async fn fetch_all_routed_workouts(
    store: &dyn FitnessStore,
    config: &PipelineConfig,
) -> Result<Retrieval> {
    let start = Instant::now();

    // Stage 1
    let mut workouts = store
        .list_workouts()
        .await
        .map_err(|source| MapperError::StoreQueryFailed {
            stage: QueryStage::Workouts,
            source,
        })?;
    // Newest first even if the store ignored the sort order; stable for equal start times
    workouts.sort_by(|a, b| b.start_time.cmp(&a.start_time));

    let total = workouts.len();
    workouts.retain(|w| {
        let ok = w.is_consistent();
        if !ok {
            warn!(
                "[RoutePipeline] Skipping workout {} with inconsistent time span (duration {}s)",
                w.id, w.duration_seconds
            );
        }
        ok
    });

    info!(
        "[RoutePipeline] Listed {} workouts ({} usable), resolving routes",
        total,
        workouts.len()
    );

    // Stages 2 and 3, per workout
    let workout_limit = config.workout_concurrency.max(1) as usize;
    let route_limit = config.route_concurrency.max(1) as usize;

    let records: Vec<Option<WorkoutRecord>> = stream::iter(workouts)
        .map(|workout| resolve_workout(store, workout, route_limit))
        .buffered(workout_limit)
        .try_collect()
        .await?;

    let records: Vec<WorkoutRecord> = records.into_iter().flatten().collect();
    let route_count: usize = records.iter().map(|r| r.routes().len()).sum();

    info!(
        "[RoutePipeline] DONE: {} of {} workouts have routes ({} routes) in {:.2}s",
        records.len(),
        total,
        route_count,
        start.elapsed().as_secs_f64()
    );

    Ok(match RetrievedCollection::from_records(records) {
        Some(collection) => Retrieval::Workouts(collection),
        None => Retrieval::NoRoutedWorkouts,
    })
}

/// Stage 2 and 3 for one workout. `None` if it ends up with no usable route.
async fn resolve_workout(
    store: &dyn FitnessStore,
    workout: WorkoutMeta,
    route_limit: usize,
) -> Result<Option<WorkoutRecord>> {
    let route_metas = store
        .list_routes_for_workout(&workout.id)
        .await
        .map_err(|source| MapperError::StoreQueryFailed {
            stage: QueryStage::Routes {
                workout_id: workout.id.clone(),
            },
            source,
        })?;

    if route_metas.is_empty() {
        debug!("[RoutePipeline] Workout {} has no routes, dropping", workout.id);
        return Ok(None);
    }

    let routes: Vec<Option<Route>> = stream::iter(route_metas)
        .map(|route| resolve_route(store, route))
        .buffered(route_limit)
        .try_collect()
        .await?;

    let routes: Vec<Route> = routes.into_iter().flatten().collect();
    if routes.is_empty() {
        debug!(
            "[RoutePipeline] Workout {} has only empty routes, dropping",
            workout.id
        );
    }
    Ok(WorkoutRecord::new(workout, routes))
}

/// Stage 3: collect every batch of a route until `done`.
async fn resolve_route(store: &dyn FitnessStore, route: RouteMeta) -> Result<Option<Route>> {
    let points_failed = |source: StoreError| MapperError::StoreQueryFailed {
        stage: QueryStage::Points {
            route_id: route.id.clone(),
        },
        source,
    };

    let mut batches = store
        .stream_points_for_route(&route.id)
        .await
        .map_err(points_failed)?;

    let mut points: Vec<GeoPoint> = Vec::new();
    let mut batch_count = 0u32;
    let mut completed = false;

    while let Some(batch) = batches.next().await {
        let batch = batch.map_err(points_failed)?;
        batch_count += 1;
        points.extend(batch.points);
        if batch.done {
            completed = true;
            break;
        }
    }

    if !completed {
        warn!(
            "[RoutePipeline] Route {} stream ended after {} batches without completion",
            route.id, batch_count
        );
        return Err(MapperError::IncompletePointStream { route_id: route.id });
    }

    let received = points.len();
    points.retain(GeoPoint::is_valid);
    if points.len() < received {
        debug!(
            "[RoutePipeline] Route {}: dropped {} invalid points",
            route.id,
            received - points.len()
        );
    }

    debug!(
        "[RoutePipeline] Route {} ({}): {} points in {} batches",
        route.id,
        route.workout_id,
        points.len(),
        batch_count
    );

    Ok(Route::new(route.id, points))
}
