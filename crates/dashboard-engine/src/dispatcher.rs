//! Recompute Dispatcher
//!
//! Fans a filter change out to every registered view. Cheap views are
//! computed inline; expensive views are delegated to the [`ResultCache`] and
//! come back as handles the caller can await.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{debug, info_span, warn};
use uuid::Uuid;

use crate::cache::{ComputeHandle, ResultCache, ViewStatus};
use crate::dataset::Dataset;
use crate::error::{ComputationFailure, EngineError, Result};
use crate::predicate::{FilterValue, Selection};
use crate::views::{self, CostClass, ViewDefinition, ViewResult};

/// Result of dispatching one view
#[derive(Debug)]
pub enum ViewOutcome {
    /// Computed inline
    Ready(std::result::Result<Arc<ViewResult>, ComputationFailure>),
    /// Served by the result cache
    Deferred(ComputeHandle),
}

impl ViewOutcome {
    pub fn is_deferred(&self) -> bool {
        matches!(self, ViewOutcome::Deferred(_))
    }

    pub fn status(&self) -> ViewStatus {
        match self {
            ViewOutcome::Ready(Ok(result)) => ViewStatus::Ready {
                result: Arc::clone(result),
            },
            ViewOutcome::Ready(Err(failure)) => ViewStatus::Failed {
                reason: failure.reason.clone(),
            },
            ViewOutcome::Deferred(handle) => handle.status(),
        }
    }

    /// Wait for the result, however long it takes
    pub async fn resolve(self) -> std::result::Result<Arc<ViewResult>, ComputationFailure> {
        match self {
            ViewOutcome::Ready(result) => result,
            ViewOutcome::Deferred(mut handle) => handle.wait().await,
        }
    }

    /// Wait at most `timeout`; a computation still running afterwards is
    /// reported as pending and keeps running in the background.
    pub async fn settle_within(self, timeout: Duration) -> ViewStatus {
        let mut handle = match self {
            ViewOutcome::Deferred(handle) => handle,
            ready => return ready.status(),
        };

        match tokio::time::timeout(timeout, handle.wait()).await {
            Ok(Ok(result)) => ViewStatus::Ready { result },
            Ok(Err(failure)) => ViewStatus::Failed {
                reason: failure.reason,
            },
            Err(_) => handle.status(),
        }
    }
}

/// Every view's outcome for one filter change, in registry order
#[derive(Debug)]
pub struct FilterChange {
    filter: FilterValue,
    dispatch_id: Uuid,
    outcomes: Vec<(&'static str, ViewOutcome)>,
}

impl FilterChange {
    pub fn filter(&self) -> &FilterValue {
        &self.filter
    }

    pub fn dispatch_id(&self) -> Uuid {
        self.dispatch_id
    }

    pub fn outcomes(&self) -> &[(&'static str, ViewOutcome)] {
        &self.outcomes
    }

    pub fn outcome(&self, view: &str) -> Option<&ViewOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| *name == view)
            .map(|(_, outcome)| outcome)
    }

    pub fn into_outcomes(self) -> Vec<(&'static str, ViewOutcome)> {
        self.outcomes
    }

    /// Await every view, deferred ones concurrently
    pub async fn resolve(
        self,
    ) -> BTreeMap<&'static str, std::result::Result<Arc<ViewResult>, ComputationFailure>> {
        let pending = self.outcomes.into_iter().map(|(name, outcome)| async move {
            (name, outcome.resolve().await)
        });
        join_all(pending).await.into_iter().collect()
    }
}

/// Routes filter changes and single-view requests
pub struct Dispatcher {
    dataset: Arc<Dataset>,
    cache: ResultCache,
    views: &'static [ViewDefinition],
}

impl Dispatcher {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self::with_views(dataset, views::registry())
    }

    pub fn with_views(dataset: Arc<Dataset>, views: &'static [ViewDefinition]) -> Self {
        Self {
            cache: ResultCache::new(Arc::clone(&dataset)),
            dataset,
            views,
        }
    }

    /// Load the dataset at `path` and dispatch against the full registry
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let dataset = Dataset::load(path)?;
        Ok(Self::new(Arc::new(dataset)))
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn views(&self) -> &'static [ViewDefinition] {
        self.views
    }

    pub fn find(&self, name: &str) -> Option<&'static ViewDefinition> {
        self.views.iter().find(|view| view.name == name)
    }

    /// Recompute every view for `filter`.
    ///
    /// Returns without waiting on expensive views.
    pub fn on_filter_change(&self, filter: &FilterValue) -> FilterChange {
        let dispatch_id = Uuid::new_v4();
        let span = info_span!("filter_change", %dispatch_id, filter = %filter);
        let _guard = span.enter();

        if !filter.is_all() && !self.dataset.has_channel_grouping(filter.as_str()) {
            debug!("Filter matches no rows");
        }

        let selection = filter.predicate().select(&self.dataset);
        let outcomes = self
            .views
            .iter()
            .map(|view| (view.name, self.dispatch(filter, view, &selection)))
            .collect::<Vec<_>>();

        debug!(
            views = outcomes.len(),
            deferred = outcomes.iter().filter(|(_, o)| o.is_deferred()).count(),
            "Filter change dispatched"
        );

        FilterChange {
            filter: filter.clone(),
            dispatch_id,
            outcomes,
        }
    }

    /// Compute a single named view for `filter`
    pub fn request(&self, filter: &FilterValue, name: &str) -> Result<ViewOutcome> {
        let view = self
            .find(name)
            .ok_or_else(|| EngineError::UnknownView(name.to_string()))?;

        let outcome = match view.cost {
            CostClass::Cheap => {
                let selection = filter.predicate().select(&self.dataset);
                self.dispatch(filter, view, &selection)
            }
            CostClass::Expensive => ViewOutcome::Deferred(self.cache.get_or_compute(filter, view)),
        };
        Ok(outcome)
    }

    /// Request a single named view and wait for its result
    pub async fn compute(&self, filter: &FilterValue, name: &str) -> Result<Arc<ViewResult>> {
        let result = self.request(filter, name)?.resolve().await?;
        Ok(result)
    }

    /// Status of an expensive view without triggering it. Cheap views are
    /// never cached and always report `None`.
    pub fn status(&self, filter: &FilterValue, name: &str) -> Result<Option<ViewStatus>> {
        let view = self
            .find(name)
            .ok_or_else(|| EngineError::UnknownView(name.to_string()))?;
        Ok(self.cache.status(filter, view))
    }

    /// Submit every expensive view for each filter without waiting.
    /// Returns the number of computations started.
    pub fn warm(&self, filters: &[FilterValue]) -> usize {
        let mut submitted = 0;
        for filter in filters {
            for view in self.views.iter().filter(|view| view.is_expensive()) {
                if self.cache.get_or_compute(filter, view).submitted() {
                    submitted += 1;
                }
            }
        }
        debug!(filters = filters.len(), submitted, "Cache warm-up submitted");
        submitted
    }

    fn dispatch(
        &self,
        filter: &FilterValue,
        view: &'static ViewDefinition,
        selection: &Selection<'_>,
    ) -> ViewOutcome {
        match view.cost {
            CostClass::Cheap => {
                let result = view.try_compute(selection);
                if let Err(failure) = &result {
                    warn!(view = view.name, reason = %failure.reason, "View computation failed");
                }
                ViewOutcome::Ready(result.map(Arc::new))
            }
            CostClass::Expensive => ViewOutcome::Deferred(self.cache.get_or_compute(filter, view)),
        }
    }
}
