//! Result Cache
//!
//! Memoizes expensive view results per `(predicate, view)` key with
//! single-flight semantics: the first request for a key starts the
//! computation in the background, and every later request for the same key
//! subscribes to that one computation instead of starting another.
//!
//! Entries move `Pending -> Ready` or `Pending -> Failed` and are published
//! over a `watch` channel. A `Failed` entry is replaced by a fresh
//! computation on the next request for its key; `Ready` entries live for the
//! lifetime of the cache. A computation whose task is dropped before it
//! finishes, as happens when its runtime shuts down, settles as `Failed`.

use std::sync::Arc;
use std::time::Instant;

use dashboard_telemetry::{Counter, Gauge, Histogram, HistogramSnapshot};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::dataset::Dataset;
use crate::error::ComputationFailure;
use crate::predicate::{FilterValue, Predicate};
use crate::views::{ViewDefinition, ViewResult};

/// Identifies one memoized result
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub predicate: Predicate,
    pub view: &'static str,
}

impl CacheKey {
    pub fn new(filter: &FilterValue, view: &'static ViewDefinition) -> Self {
        Self {
            predicate: filter.predicate(),
            view: view.name,
        }
    }
}

/// Lifecycle of a cache entry
#[derive(Debug, Clone, PartialEq)]
pub enum EntryState {
    Pending,
    Ready(Arc<ViewResult>),
    Failed(ComputationFailure),
}

impl EntryState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, EntryState::Pending)
    }
}

/// Externally visible status of a view for a given filter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ViewStatus {
    /// This request started the computation and it has not finished yet
    Submitted,
    /// Another request's computation is still running
    Pending,
    Ready { result: Arc<ViewResult> },
    Failed { reason: String },
}

impl ViewStatus {
    fn from_state(state: &EntryState, submitted: bool) -> Self {
        match state {
            EntryState::Pending if submitted => ViewStatus::Submitted,
            EntryState::Pending => ViewStatus::Pending,
            EntryState::Ready(result) => ViewStatus::Ready {
                result: Arc::clone(result),
            },
            EntryState::Failed(failure) => ViewStatus::Failed {
                reason: failure.reason.clone(),
            },
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, ViewStatus::Ready { .. } | ViewStatus::Failed { .. })
    }
}

#[derive(Debug, Clone)]
struct CacheMetrics {
    hits: Counter,
    misses: Counter,
    joins: Counter,
    computations: Counter,
    failures: Counter,
    in_flight: Gauge,
    computation_ms: Histogram,
}

impl CacheMetrics {
    fn new() -> Self {
        Self {
            hits: Counter::new("cache_hits"),
            misses: Counter::new("cache_misses"),
            joins: Counter::new("cache_joins"),
            computations: Counter::new("computations"),
            failures: Counter::new("computation_failures"),
            in_flight: Gauge::new("computations_in_flight"),
            computation_ms: Histogram::new("computation_ms"),
        }
    }
}

/// Cache counters at a point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_joins: u64,
    pub computations: u64,
    pub computation_failures: u64,
    pub in_flight: u64,
    pub computation_ms: HistogramSnapshot,
}

type Slot = Arc<watch::Sender<EntryState>>;

/// Single-flight cache for expensive views over one dataset snapshot
pub struct ResultCache {
    dataset: Arc<Dataset>,
    entries: DashMap<CacheKey, Slot>,
    metrics: CacheMetrics,
}

impl ResultCache {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self {
            dataset,
            entries: DashMap::new(),
            metrics: CacheMetrics::new(),
        }
    }

    /// Return a handle on the result for `(filter, view)`, starting the
    /// computation if no usable entry exists.
    ///
    /// Never blocks: the computation runs on the blocking pool and callers
    /// observe it through the returned handle.
    pub fn get_or_compute(
        &self,
        filter: &FilterValue,
        view: &'static ViewDefinition,
    ) -> ComputeHandle {
        let key = CacheKey::new(filter, view);

        // The entry guard holds a shard lock; it is released at the end of
        // this match, before any computation is spawned.
        let (slot, submitted) = match self.entries.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                let state = occupied.get().borrow().clone();
                match state {
                    EntryState::Ready(_) => {
                        self.metrics.hits.inc();
                        (Arc::clone(occupied.get()), false)
                    }
                    EntryState::Pending => {
                        self.metrics.joins.inc();
                        (Arc::clone(occupied.get()), false)
                    }
                    EntryState::Failed(failure) => {
                        debug!(view = view.name, filter = %filter, reason = %failure.reason, "Retrying failed view");
                        self.metrics.misses.inc();
                        let slot: Slot = Arc::new(watch::channel(EntryState::Pending).0);
                        occupied.insert(Arc::clone(&slot));
                        (slot, true)
                    }
                }
            }
            Entry::Vacant(vacant) => {
                self.metrics.misses.inc();
                let slot: Slot = Arc::new(watch::channel(EntryState::Pending).0);
                vacant.insert(Arc::clone(&slot));
                (slot, true)
            }
        };

        let receiver = slot.subscribe();
        if submitted {
            self.submit(key.predicate, view, slot);
        }

        ComputeHandle {
            view: view.name,
            filter: filter.clone(),
            submitted,
            receiver,
        }
    }

    /// Peek at an entry without starting a computation
    pub fn status(&self, filter: &FilterValue, view: &'static ViewDefinition) -> Option<ViewStatus> {
        let key = CacheKey::new(filter, view);
        self.entries
            .get(&key)
            .map(|slot| ViewStatus::from_state(&slot.borrow(), false))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            cache_hits: self.metrics.hits.get(),
            cache_misses: self.metrics.misses.get(),
            cache_joins: self.metrics.joins.get(),
            computations: self.metrics.computations.get(),
            computation_failures: self.metrics.failures.get(),
            in_flight: self.metrics.in_flight.get(),
            computation_ms: self.metrics.computation_ms.snapshot(),
        }
    }

    fn submit(&self, predicate: Predicate, view: &'static ViewDefinition, slot: Slot) {
        let dataset = Arc::clone(&self.dataset);
        self.metrics.computations.inc();
        self.metrics.in_flight.inc();
        let publisher = Publisher {
            slot,
            metrics: self.metrics.clone(),
            view,
            started: Instant::now(),
            published: false,
        };

        let compute = move || {
            let selection = predicate.select(&dataset);
            view.try_compute(&selection)
        };

        match Handle::try_current() {
            Ok(handle) => {
                // The publisher lives inside the task so a runtime shutdown
                // still settles the entry.
                handle.spawn(async move {
                    let outcome = match tokio::task::spawn_blocking(compute).await {
                        Ok(outcome) => outcome,
                        Err(e) => Err(ComputationFailure::new(view.name, e.to_string())),
                    };
                    publisher.publish(outcome);
                });
            }
            Err(_) => {
                // Outside a runtime there is nowhere to defer to.
                publisher.publish(compute());
            }
        }
    }
}

/// Settles one submitted entry exactly once. Dropped unpublished, it marks
/// the entry failed so the next request retries it.
struct Publisher {
    slot: Slot,
    metrics: CacheMetrics,
    view: &'static ViewDefinition,
    started: Instant,
    published: bool,
}

impl Publisher {
    fn publish(mut self, outcome: Result<ViewResult, ComputationFailure>) {
        self.settle(outcome);
    }

    fn settle(&mut self, outcome: Result<ViewResult, ComputationFailure>) {
        self.published = true;
        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        self.metrics.computation_ms.record(elapsed_ms);
        self.metrics.in_flight.dec();

        let state = match outcome {
            Ok(result) => {
                debug!(view = self.view.name, elapsed_ms, "View computed");
                EntryState::Ready(Arc::new(result))
            }
            Err(failure) => {
                self.metrics.failures.inc();
                warn!(view = self.view.name, reason = %failure.reason, "View computation failed");
                EntryState::Failed(failure)
            }
        };
        self.slot.send_replace(state);
    }
}

impl Drop for Publisher {
    fn drop(&mut self) {
        if !self.published {
            let failure = ComputationFailure::new(self.view.name, "computation abandoned");
            self.settle(Err(failure));
        }
    }
}

/// A caller's subscription to one cache entry
#[derive(Debug)]
pub struct ComputeHandle {
    view: &'static str,
    filter: FilterValue,
    submitted: bool,
    receiver: watch::Receiver<EntryState>,
}

impl ComputeHandle {
    pub fn view(&self) -> &'static str {
        self.view
    }

    pub fn filter(&self) -> &FilterValue {
        &self.filter
    }

    /// Whether this request started the computation
    pub fn submitted(&self) -> bool {
        self.submitted
    }

    pub fn status(&self) -> ViewStatus {
        ViewStatus::from_state(&self.receiver.borrow(), self.submitted)
    }

    /// Wait until the entry settles
    pub async fn wait(&mut self) -> Result<Arc<ViewResult>, ComputationFailure> {
        let state = match self.receiver.wait_for(EntryState::is_settled).await {
            Ok(state) => (*state).clone(),
            Err(_) => return Err(ComputationFailure::new(self.view, "computation abandoned")),
        };

        match state {
            EntryState::Ready(result) => Ok(result),
            EntryState::Failed(failure) => Err(failure),
            EntryState::Pending => Err(ComputationFailure::new(self.view, "computation abandoned")),
        }
    }
}
