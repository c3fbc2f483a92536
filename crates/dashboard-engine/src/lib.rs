//! # Dashboard Engine
//!
//! Filter-driven recompute engine behind the website marketing dashboard.
//!
//! A single shared [`FilterValue`] (a channel grouping, or `"All"`) drives a
//! fixed registry of derived views:
//!
//! - **Dataset Store** - immutable snapshot of the marketing rows
//! - **Filter Predicate** - maps the filter to a row selection
//! - **View Registry** - pure aggregation rules producing scalars, tables and charts
//! - **Recompute Dispatcher** - fans a filter change out to every view
//! - **Result Cache** - single-flight memoization for the expensive views
//!
//! ## Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use dashboard_engine::{Dataset, Dispatcher, FilterValue};
//!
//! let dataset = Arc::new(Dataset::load("./assets/data.csv")?);
//! let dispatcher = Dispatcher::new(dataset);
//!
//! let change = dispatcher.on_filter_change(&FilterValue::new("Organic Search"));
//! let results = change.resolve().await;
//! ```

pub mod cache;
pub mod dataset;
pub mod dispatcher;
pub mod error;
pub mod format;
pub mod predicate;
pub mod views;

// Re-exports
pub use cache::{CacheKey, CacheStats, ComputeHandle, EntryState, ResultCache, ViewStatus};
pub use dataset::{Dataset, Row};
pub use dispatcher::{Dispatcher, FilterChange, ViewOutcome};
pub use error::{ComputationFailure, DataLoadError, EngineError, Result};
pub use format::abbreviate;
pub use predicate::{FilterValue, Predicate, Selection};
pub use views::{
    registry, CostClass, ResultKind, ViewDefinition, ViewResult, RECENT_YEAR_CUTOFF,
};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
