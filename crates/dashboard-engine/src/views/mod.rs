//! View Registry
//!
//! The fixed set of derived views shown on the dashboard. Every view is a
//! pure function of the selected rows; its cost class decides whether the
//! dispatcher runs it inline or through the result cache.

mod charts;
mod grouping;
pub mod result;
mod scalars;
mod tables;

use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::Datelike;
use serde::Serialize;

use crate::dataset::Row;
use crate::error::{panic_message, ComputationFailure};
use crate::predicate::Selection;

pub use charts::TOP_N;
pub use result::{
    Axis, BarMode, Cell, ChartSpec, Column, ColumnKind, Mark, Orientation, Scalar, Series, Table,
    ViewResult,
};
pub use tables::TOTAL_LABEL;

/// First year counted by the "recent year" views
pub const RECENT_YEAR_CUTOFF: i32 = 2019;

pub(crate) fn is_recent(row: &Row) -> bool {
    row.date.year() >= RECENT_YEAR_CUTOFF
}

/// Aggregation rule of a view
pub type Aggregation = fn(&Selection<'_>) -> ViewResult;

/// Whether a view is recomputed inline or served through the result cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CostClass {
    Cheap,
    Expensive,
}

/// Shape of a view's result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Scalar,
    Table,
    Chart,
}

/// A named view and its aggregation rule
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ViewDefinition {
    pub name: &'static str,
    /// Panel caption on the dashboard
    pub title: &'static str,
    pub kind: ResultKind,
    pub cost: CostClass,
    #[serde(skip)]
    pub aggregate: Aggregation,
}

impl ViewDefinition {
    pub fn compute(&self, selection: &Selection<'_>) -> ViewResult {
        (self.aggregate)(selection)
    }

    /// Run the aggregation, turning a panic into a [`ComputationFailure`]
    /// scoped to this view.
    pub fn try_compute(&self, selection: &Selection<'_>) -> Result<ViewResult, ComputationFailure> {
        catch_unwind(AssertUnwindSafe(|| self.compute(selection)))
            .map_err(|payload| ComputationFailure::new(self.name, panic_message(payload.as_ref())))
    }

    pub fn is_expensive(&self) -> bool {
        self.cost == CostClass::Expensive
    }
}

static REGISTRY: [ViewDefinition; 12] = [
    ViewDefinition {
        name: "total-sessions",
        title: "Total Sessions",
        kind: ResultKind::Scalar,
        cost: CostClass::Cheap,
        aggregate: scalars::total_sessions,
    },
    ViewDefinition {
        name: "total-exits",
        title: "Total Exits",
        kind: ResultKind::Scalar,
        cost: CostClass::Cheap,
        aggregate: scalars::total_exits,
    },
    ViewDefinition {
        name: "total-bounces",
        title: "Total Bounces",
        kind: ResultKind::Scalar,
        cost: CostClass::Cheap,
        aggregate: scalars::total_bounces,
    },
    ViewDefinition {
        name: "avg-time-on-page",
        title: "Average of Time on Page",
        kind: ResultKind::Scalar,
        cost: CostClass::Cheap,
        aggregate: scalars::avg_time_on_page,
    },
    ViewDefinition {
        name: "recent-year-sessions",
        title: "Latest Year Sessions",
        kind: ResultKind::Scalar,
        cost: CostClass::Cheap,
        aggregate: scalars::recent_year_sessions,
    },
    ViewDefinition {
        name: "recent-year-unique-pageviews",
        title: "Unique Pageviews",
        kind: ResultKind::Scalar,
        cost: CostClass::Cheap,
        aggregate: scalars::recent_year_unique_pageviews,
    },
    ViewDefinition {
        name: "avg-page-load-time",
        title: "Average Page Load Time",
        kind: ResultKind::Scalar,
        cost: CostClass::Cheap,
        aggregate: scalars::avg_page_load_time,
    },
    ViewDefinition {
        name: "sessions-by-month",
        title: "Sum of Sessions by Month",
        kind: ResultKind::Chart,
        cost: CostClass::Cheap,
        aggregate: charts::sessions_by_month,
    },
    ViewDefinition {
        name: "bounces-and-sessions-by-month",
        title: "Sessions and Bounces by Month",
        kind: ResultKind::Chart,
        cost: CostClass::Cheap,
        aggregate: charts::bounces_and_sessions_by_month,
    },
    ViewDefinition {
        name: "device-category-breakdown",
        title: "Sessions and Bounces per Device",
        kind: ResultKind::Table,
        cost: CostClass::Cheap,
        aggregate: tables::device_category_breakdown,
    },
    ViewDefinition {
        name: "top-5-countries-by-unique-pageviews",
        title: "Top 5 Country by Unique Pageviews",
        kind: ResultKind::Chart,
        cost: CostClass::Expensive,
        aggregate: charts::top_countries_by_unique_pageviews,
    },
    ViewDefinition {
        name: "top-5-pages-by-unique-pageviews",
        title: "Top 5 Page Title by Unique Pageviews",
        kind: ResultKind::Chart,
        cost: CostClass::Expensive,
        aggregate: charts::top_pages_by_unique_pageviews,
    },
];

/// Every dashboard view, in panel order
pub fn registry() -> &'static [ViewDefinition] {
    &REGISTRY
}

/// Look a view up by name
pub fn find(name: &str) -> Option<&'static ViewDefinition> {
    REGISTRY.iter().find(|view| view.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_names_are_unique() {
        let names: HashSet<&str> = registry().iter().map(|v| v.name).collect();
        assert_eq!(names.len(), registry().len());
    }

    #[test]
    fn test_only_top_rankings_are_expensive() {
        let expensive: Vec<&str> = registry()
            .iter()
            .filter(|v| v.is_expensive())
            .map(|v| v.name)
            .collect();
        assert_eq!(
            expensive,
            vec![
                "top-5-countries-by-unique-pageviews",
                "top-5-pages-by-unique-pageviews"
            ]
        );
    }

    fn exploding(_: &Selection<'_>) -> ViewResult {
        panic!("division by zero")
    }

    #[test]
    fn test_try_compute_captures_panic() {
        let view = ViewDefinition {
            name: "exploding",
            title: "Exploding",
            kind: ResultKind::Scalar,
            cost: CostClass::Cheap,
            aggregate: exploding,
        };
        let dataset = crate::dataset::Dataset::from_rows(Vec::new());
        let failure = view
            .try_compute(&Selection::All(dataset.rows()))
            .unwrap_err();
        assert_eq!(failure, ComputationFailure::new("exploding", "division by zero"));
    }

    #[test]
    fn test_find() {
        assert_eq!(find("total-sessions").map(|v| v.kind), Some(ResultKind::Scalar));
        assert!(find("total-revenue").is_none());
    }
}
