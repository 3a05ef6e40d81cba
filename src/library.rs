//! Holder of the currently displayed workout collection.
//!
//! Each [`RouteLibrary::refresh`] call is a request. The library only ever publishes the
//! result of the most recently *requested* run: a run that finishes after a newer one was
//! requested is discarded, whatever order the runs complete in.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::watch;

use crate::error::{MapperError, Result};
use crate::pipeline::{fetch_all_routed_workouts, FitnessStore, PipelineConfig, Retrieval};
use crate::RetrievedCollection;

/// What the UI should show for the workout collection.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// No run requested yet
    Idle,
    /// The latest requested run is in flight
    Loading,
    /// The latest run produced workouts
    Loaded(Arc<RetrievedCollection>),
    /// The latest run succeeded with nothing to show
    Empty,
    /// The latest run failed; the UI should offer a retry
    Failed(MapperError),
}

impl LoadState {
    pub fn collection(&self) -> Option<&Arc<RetrievedCollection>> {
        match self {
            LoadState::Loaded(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// How a refresh request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The run's result is now the published state
    Published,
    /// A newer request was made while this run was in flight; its result was dropped
    Superseded,
}

/// Runs the retrieval pipeline and publishes results with latest-request-wins semantics.
pub struct RouteLibrary {
    store: Arc<dyn FitnessStore>,
    config: PipelineConfig,
    latest_request: Arc<AtomicU64>,
    state: Arc<watch::Sender<LoadState>>,
}

impl RouteLibrary {
    pub fn new(store: Arc<dyn FitnessStore>, config: PipelineConfig) -> Self {
        let (state, _) = watch::channel(LoadState::Idle);
        Self {
            store,
            config,
            latest_request: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
        }
    }

    /// Snapshot of the published state.
    pub fn state(&self) -> LoadState {
        self.state.borrow().clone()
    }

    /// The published collection, if the latest run produced one.
    pub fn collection(&self) -> Option<Arc<RetrievedCollection>> {
        self.state.borrow().collection().cloned()
    }

    /// Receiver that is notified whenever the published state changes.
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state.subscribe()
    }

    /// Request a new pipeline run.
    ///
    /// The request is registered when this method is called, not when the returned future is
    /// first polled, so the returned future can be spawned freely. The state switches to
    /// [`LoadState::Loading`] immediately. Dropping the future before it finishes restores
    /// the state the request replaced, unless a newer request has been made since.
    ///
    /// A failure of the current run is both published as [`LoadState::Failed`] and returned.
    /// A superseded run returns `Ok(RefreshOutcome::Superseded)` even if it failed.
    pub fn refresh(&self) -> impl Future<Output = Result<RefreshOutcome>> + Send + 'static {
        let latest = Arc::clone(&self.latest_request);
        let mut run = 0;
        let mut previous = LoadState::Idle;
        // Bump and mark loading under the state lock so publishing can't interleave
        self.state.send_modify(|state| {
            run = latest.fetch_add(1, Ordering::SeqCst) + 1;
            previous = std::mem::replace(state, LoadState::Loading);
        });
        // An older in-flight run is superseded now and will never publish
        if previous.is_loading() {
            previous = LoadState::Idle;
        }

        let mut guard = PendingRun {
            run,
            latest: Arc::clone(&latest),
            state: Arc::clone(&self.state),
            previous,
            settled: false,
        };
        let store = Arc::clone(&self.store);
        let config = self.config.clone();
        let state = Arc::clone(&self.state);

        async move {
            info!("[RouteLibrary] Run #{} started", run);
            let result = fetch_all_routed_workouts(store.as_ref(), &config).await;
            guard.settled = true;

            let (next_state, error) = match result {
                Ok(Retrieval::Workouts(collection)) => (LoadState::Loaded(Arc::new(collection)), None),
                Ok(Retrieval::NoRoutedWorkouts) => (LoadState::Empty, None),
                Err(e) => (LoadState::Failed(e.clone()), Some(e)),
            };

            let published = state.send_if_modified(|current| {
                if latest.load(Ordering::SeqCst) != run {
                    return false;
                }
                *current = next_state;
                true
            });

            if !published {
                debug!(
                    "[RouteLibrary] Run #{} superseded by run #{}, discarding result",
                    run,
                    latest.load(Ordering::SeqCst)
                );
                return Ok(RefreshOutcome::Superseded);
            }

            match error {
                Some(e) => {
                    warn!("[RouteLibrary] Run #{} failed: {}", run, e);
                    Err(e)
                }
                None => {
                    info!("[RouteLibrary] Run #{} published", run);
                    Ok(RefreshOutcome::Published)
                }
            }
        }
    }
}

/// Owned by a refresh future; puts back the replaced state if the future is dropped early.
struct PendingRun {
    run: u64,
    latest: Arc<AtomicU64>,
    state: Arc<watch::Sender<LoadState>>,
    previous: LoadState,
    settled: bool,
}

impl Drop for PendingRun {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let run = self.run;
        let latest = &self.latest;
        let previous = std::mem::replace(&mut self.previous, LoadState::Idle);
        let restored = self.state.send_if_modified(|current| {
            if latest.load(Ordering::SeqCst) != run {
                return false;
            }
            *current = previous;
            true
        });
        if restored {
            debug!("[RouteLibrary] Run #{} dropped before completion, state restored", run);
        }
    }
}
