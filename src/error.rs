//! Unified error handling for the workout-mapper library.
//!
//! Every fallible operation returns [`MapperError`]. "Nothing to show" is not an error:
//! the pipeline reports it as [`crate::Retrieval::NoRoutedWorkouts`].

use std::fmt;
use thiserror::Error;

/// Error reported by a [`crate::FitnessStore`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Which fitness store query failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStage {
    /// Stage 1: listing workouts
    Workouts,
    /// Stage 2: listing routes associated with a workout
    Routes { workout_id: String },
    /// Stage 3: streaming the points of a route
    Points { route_id: String },
}

impl fmt::Display for QueryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryStage::Workouts => write!(f, "workout"),
            QueryStage::Routes { workout_id } => write!(f, "route (workout '{}')", workout_id),
            QueryStage::Points { route_id } => write!(f, "location (route '{}')", route_id),
        }
    }
}

/// Unified error type for workout-mapper operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapperError {
    /// A fitness store query failed; the whole pipeline run is abandoned.
    #[error("{stage} query failed: {source}")]
    StoreQueryFailed {
        stage: QueryStage,
        #[source]
        source: StoreError,
    },

    /// A route's point stream ended without signalling completion.
    #[error("point stream for route '{route_id}' ended before completion")]
    IncompletePointStream { route_id: String },

    /// Sheet setpoints are unusable.
    #[error("Invalid sheet configuration: {message}")]
    InvalidSheetConfig { message: String },
}

impl MapperError {
    /// True for failures that came from reading the fitness store.
    ///
    /// A truncated point stream counts as a store failure: the caller should offer a retry.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            MapperError::StoreQueryFailed { .. } | MapperError::IncompletePointStream { .. }
        )
    }
}

/// Result type alias for workout-mapper operations.
pub type Result<T> = std::result::Result<T, MapperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MapperError::StoreQueryFailed {
            stage: QueryStage::Routes {
                workout_id: "w-1".to_string(),
            },
            source: StoreError::new("authorization denied"),
        };
        let text = err.to_string();
        assert!(text.contains("w-1"));
        assert!(text.contains("authorization denied"));
    }

    #[test]
    fn test_incomplete_stream_is_store_failure() {
        let err = MapperError::IncompletePointStream {
            route_id: "r-1".to_string(),
        };
        assert!(err.is_store_failure());
        assert!(err.to_string().contains("r-1"));

        let config_err = MapperError::InvalidSheetConfig {
            message: "empty".to_string(),
        };
        assert!(!config_err.is_store_failure());
    }

    #[test]
    fn test_store_error_is_source() {
        use std::error::Error;

        let err = MapperError::StoreQueryFailed {
            stage: QueryStage::Workouts,
            source: StoreError::new("timeout"),
        };
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("timeout"));
    }
}
