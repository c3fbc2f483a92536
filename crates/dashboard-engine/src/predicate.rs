//! Filter Predicate
//!
//! Turns the shared filter value into an explicit, hashable [`Predicate`] and
//! applies it to the dataset. The predicate doubles as the filter component of
//! result cache keys.

use std::fmt;
use std::slice;

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Row};

/// Sentinel filter value meaning "no filtering"
pub const ALL: &str = "All";

/// The single shared dashboard input: a channel grouping, or `"All"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterValue(String);

impl FilterValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn all() -> Self {
        Self(ALL.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_all(&self) -> bool {
        self.0 == ALL
    }

    pub fn predicate(&self) -> Predicate {
        if self.is_all() {
            Predicate::All
        } else {
            Predicate::ChannelGrouping(self.0.clone())
        }
    }

    /// Every selectable value: the dataset's channel groupings in order of
    /// first appearance, followed by `"All"`.
    pub fn options(dataset: &Dataset) -> Vec<FilterValue> {
        dataset
            .channel_groupings()
            .into_iter()
            .map(FilterValue::new)
            .chain(std::iter::once(FilterValue::all()))
            .collect()
    }
}

impl Default for FilterValue {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Row-selection rule derived from a [`FilterValue`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Predicate {
    /// Keep every row
    All,
    /// Keep rows whose channel grouping equals the value exactly
    ChannelGrouping(String),
}

impl Predicate {
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Predicate::All => true,
            Predicate::ChannelGrouping(grouping) => row.channel_grouping == *grouping,
        }
    }

    /// Apply the predicate. `All` borrows the snapshot as-is; a channel
    /// grouping keeps matching rows in source order. A grouping that does not
    /// occur in the dataset yields an empty selection.
    pub fn select<'a>(&self, dataset: &'a Dataset) -> Selection<'a> {
        match self {
            Predicate::All => Selection::All(dataset.rows()),
            Predicate::ChannelGrouping(_) => Selection::Matching(
                dataset.rows().iter().filter(|row| self.matches(row)).collect(),
            ),
        }
    }
}

/// Select the rows for a filter value.
pub fn select<'a>(dataset: &'a Dataset, filter: &FilterValue) -> Selection<'a> {
    filter.predicate().select(dataset)
}

/// Rows chosen by a predicate
#[derive(Debug, Clone)]
pub enum Selection<'a> {
    All(&'a [Row]),
    Matching(Vec<&'a Row>),
}

impl<'a> Selection<'a> {
    pub fn iter(&self) -> SelectionIter<'_, 'a> {
        match self {
            Selection::All(rows) => SelectionIter::All(rows.iter()),
            Selection::Matching(rows) => SelectionIter::Matching(rows.iter()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Selection::All(rows) => rows.len(),
            Selection::Matching(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Iterator over the rows of a [`Selection`]
pub enum SelectionIter<'s, 'a> {
    All(slice::Iter<'a, Row>),
    Matching(slice::Iter<'s, &'a Row>),
}

impl<'s, 'a> Iterator for SelectionIter<'s, 'a> {
    type Item = &'a Row;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            SelectionIter::All(rows) => rows.next(),
            SelectionIter::Matching(rows) => rows.next().copied(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            SelectionIter::All(rows) => rows.size_hint(),
            SelectionIter::Matching(rows) => rows.size_hint(),
        }
    }
}
