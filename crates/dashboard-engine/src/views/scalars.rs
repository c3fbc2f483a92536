//! KPI scalar views

use super::is_recent;
use super::result::{Scalar, ViewResult};
use crate::dataset::Row;
use crate::predicate::Selection;

fn total(selection: &Selection<'_>, metric: fn(&Row) -> f64) -> ViewResult {
    ViewResult::Scalar(Scalar::new(selection.iter().map(metric).sum()))
}

fn recent_total(selection: &Selection<'_>, metric: fn(&Row) -> f64) -> ViewResult {
    let sum = selection.iter().filter(|row| is_recent(row)).map(metric).sum();
    ViewResult::Scalar(Scalar::new(sum))
}

pub(crate) fn total_sessions(selection: &Selection<'_>) -> ViewResult {
    total(selection, |row| row.sessions)
}

pub(crate) fn total_exits(selection: &Selection<'_>) -> ViewResult {
    total(selection, |row| row.exits)
}

pub(crate) fn total_bounces(selection: &Selection<'_>) -> ViewResult {
    total(selection, |row| row.bounces)
}

pub(crate) fn avg_time_on_page(selection: &Selection<'_>) -> ViewResult {
    let sum = selection.iter().map(|row| row.time_on_page).sum();
    ViewResult::Scalar(Scalar::mean(sum, selection.len()))
}

pub(crate) fn recent_year_sessions(selection: &Selection<'_>) -> ViewResult {
    recent_total(selection, |row| row.sessions)
}

pub(crate) fn recent_year_unique_pageviews(selection: &Selection<'_>) -> ViewResult {
    recent_total(selection, |row| row.unique_pageviews)
}

pub(crate) fn avg_page_load_time(selection: &Selection<'_>) -> ViewResult {
    let (sum, count) = selection
        .iter()
        .filter(|row| is_recent(row))
        .fold((0.0, 0_usize), |(sum, count), row| {
            (sum + row.page_load_time, count + 1)
        });
    ViewResult::Scalar(Scalar::mean(sum, count))
}
