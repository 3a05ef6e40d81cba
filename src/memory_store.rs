//! In-memory [`FitnessStore`] for previews, demos and tests.
//!
//! Points are delivered in batches of a configurable size, the way a device store
//! delivers long routes.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use crate::error::StoreError;
use crate::pipeline::{FitnessStore, PointBatch, PointStream, RouteMeta};
use crate::{GeoPoint, WorkoutMeta};

const DEFAULT_BATCH_SIZE: usize = 64;

#[derive(Debug, Clone)]
struct StoredRoute {
    meta: RouteMeta,
    points: Vec<GeoPoint>,
}

/// Fitness store backed by vectors. Workouts are listed in insertion order.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    workouts: Vec<WorkoutMeta>,
    routes: Vec<StoredRoute>,
    batch_size: usize,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_batch_size(DEFAULT_BATCH_SIZE)
    }

    /// Deliver route points `batch_size` at a time (minimum 1).
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            workouts: Vec::new(),
            routes: Vec::new(),
            batch_size: batch_size.max(1),
        }
    }

    pub fn add_workout(&mut self, workout: WorkoutMeta) {
        self.workouts.push(workout);
    }

    /// Attach a route to a workout. Routes of one workout are listed in insertion order.
    pub fn add_route(&mut self, workout_id: &str, route_id: &str, points: Vec<GeoPoint>) {
        self.routes.push(StoredRoute {
            meta: RouteMeta {
                id: route_id.to_string(),
                workout_id: workout_id.to_string(),
            },
            points,
        });
    }

    pub fn workout_count(&self) -> usize {
        self.workouts.len()
    }

    fn batches(&self, points: &[GeoPoint]) -> Vec<PointBatch> {
        if points.is_empty() {
            return vec![PointBatch {
                points: Vec::new(),
                done: true,
            }];
        }
        let chunk_count = points.len().div_ceil(self.batch_size);
        points
            .chunks(self.batch_size)
            .enumerate()
            .map(|(i, chunk)| PointBatch {
                points: chunk.to_vec(),
                done: i + 1 == chunk_count,
            })
            .collect()
    }
}

#[async_trait]
impl FitnessStore for InMemoryStore {
    async fn list_workouts(&self) -> Result<Vec<WorkoutMeta>, StoreError> {
        Ok(self.workouts.clone())
    }

    async fn list_routes_for_workout(&self, workout_id: &str) -> Result<Vec<RouteMeta>, StoreError> {
        Ok(self
            .routes
            .iter()
            .filter(|r| r.meta.workout_id == workout_id)
            .map(|r| r.meta.clone())
            .collect())
    }

    async fn stream_points_for_route(&self, route_id: &str) -> Result<PointStream, StoreError> {
        let route = self
            .routes
            .iter()
            .find(|r| r.meta.id == route_id)
            .ok_or_else(|| StoreError::new(format!("No route with id {}", route_id)))?;

        let batches = self.batches(&route.points);
        Ok(stream::iter(batches.into_iter().map(Ok)).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::{at, meta};

    fn points(n: usize) -> Vec<GeoPoint> {
        (0..n).map(|i| GeoPoint::new(i as f64, 0.0, at(6))).collect()
    }

    #[tokio::test]
    async fn test_points_split_into_batches() {
        let mut store = InMemoryStore::with_batch_size(2);
        store.add_route("w", "r", points(5));

        let batches: Vec<PointBatch> = store
            .stream_points_for_route("r")
            .await
            .unwrap()
            .map(|b| b.unwrap())
            .collect()
            .await;

        let sizes: Vec<usize> = batches.iter().map(|b| b.points.len()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        let done: Vec<bool> = batches.iter().map(|b| b.done).collect();
        assert_eq!(done, vec![false, false, true]);
    }

    #[tokio::test]
    async fn test_routes_filtered_by_workout() {
        let mut store = InMemoryStore::new();
        store.add_workout(meta("a", 37, 8, None, 60.0));
        store.add_route("a", "a-1", points(1));
        store.add_route("b", "b-1", points(1));
        store.add_route("a", "a-2", points(1));

        let ids: Vec<String> = store
            .list_routes_for_workout("a")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["a-1", "a-2"]);
        assert_eq!(store.workout_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_route_is_error() {
        let store = InMemoryStore::new();
        assert!(store.stream_points_for_route("missing").await.is_err());
    }
}
