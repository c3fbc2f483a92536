//! Chart views
//!
//! Each chart carries the layout hints of the dashboard panel it feeds. The
//! engine never interprets them.

use std::collections::BTreeMap;

use chrono::{Datelike, Month, NaiveDate};

use super::grouping::GroupedSums;
use super::is_recent;
use super::result::{Axis, BarMode, ChartSpec, Mark, Orientation, Series, ViewResult};
use crate::predicate::Selection;

/// Size of the top-N rankings
pub const TOP_N: usize = 5;

/// Value label format used on every chart
const SI_FORMAT: &str = ".2s";

fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| format!("Month {month}"))
}

fn next_month((year, month): (i32, u32)) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Month buckets are labelled by their last day
fn month_end_label(key: (i32, u32)) -> String {
    let (year, month) = next_month(key);
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| format!("{:04}-{:02}", key.0, key.1))
}

/// Sessions per calendar month for the recent years, January first.
/// Months of different years share a bucket.
pub(crate) fn sessions_by_month(selection: &Selection<'_>) -> ViewResult {
    let mut sums = GroupedSums::<u32, 1>::new();
    for row in selection.iter().filter(|row| is_recent(row)) {
        sums.add(row.date.month(), [row.sessions]);
    }

    let mut chart = ChartSpec::new(Mark::Bar).title("Sum of Sessions by Month");
    chart.text_format = Some(SI_FORMAT.to_string());
    chart.x_axis.tick_angle = Some(315);
    chart.y_axis = Axis::hidden();

    if !sums.is_empty() {
        let mut series = Series::new("Sessions");
        for (month, [sessions]) in sums.into_sorted() {
            series.push(month_name(month), sessions);
        }
        chart.series.push(series);
    }

    ViewResult::Chart(chart)
}

/// Sessions and bounces per month over the whole date range. Months between
/// the first and last observed month that have no rows are reported as zero.
pub(crate) fn bounces_and_sessions_by_month(selection: &Selection<'_>) -> ViewResult {
    let mut buckets: BTreeMap<(i32, u32), [f64; 2]> = BTreeMap::new();
    for row in selection.iter() {
        let sums = buckets
            .entry((row.date.year(), row.date.month()))
            .or_insert([0.0; 2]);
        sums[0] += row.sessions;
        sums[1] += row.bounces;
    }

    let mut chart = ChartSpec::new(Mark::Line);
    chart.y_axis.tick_format = Some(SI_FORMAT.to_string());

    let bounds = buckets
        .keys()
        .next()
        .copied()
        .zip(buckets.keys().next_back().copied());
    if let Some((first, last)) = bounds {
        let mut sessions = Series::new("Sum of Sessions");
        let mut bounces = Series::new("Sum of Bounces");
        let mut cursor = first;
        loop {
            let [s, b] = buckets.get(&cursor).copied().unwrap_or([0.0; 2]);
            let label = month_end_label(cursor);
            sessions.push(label.clone(), s);
            bounces.push(label, b);
            if cursor >= last {
                break;
            }
            cursor = next_month(cursor);
        }
        chart.series = vec![sessions, bounces];
    }

    ViewResult::Chart(chart)
}

/// The five countries with the most unique pageviews, as horizontal bars
pub(crate) fn top_countries_by_unique_pageviews(selection: &Selection<'_>) -> ViewResult {
    let mut sums = GroupedSums::<&str, 1>::new();
    for row in selection.iter() {
        sums.add(row.country.as_str(), [row.unique_pageviews]);
    }

    let mut chart = ChartSpec::new(Mark::Bar).title("Top 5 Country by Unique Pageviews");
    chart.orientation = Orientation::Horizontal;
    chart.text_format = Some(SI_FORMAT.to_string());
    chart.x_axis.show_tick_labels = false;

    if !sums.is_empty() {
        let mut series = Series::new("Unique Pageviews");
        for (country, [pageviews]) in sums.into_ranked(0).into_iter().take(TOP_N) {
            series.push(country, pageviews);
        }
        chart.series.push(series);
    }

    ViewResult::Chart(chart)
}

/// The five page titles with the most unique pageviews, one stacked series
/// per device category.
pub(crate) fn top_pages_by_unique_pageviews(selection: &Selection<'_>) -> ViewResult {
    let mut per_title = GroupedSums::<&str, 1>::new();
    let mut per_title_device = GroupedSums::<(&str, &str), 1>::new();
    let mut devices: Vec<&str> = Vec::new();

    for row in selection.iter() {
        let title = row.page_title.as_str();
        let device = row.device_category.as_str();
        per_title.add(title, [row.unique_pageviews]);
        per_title_device.add((title, device), [row.unique_pageviews]);
        if !devices.contains(&device) {
            devices.push(device);
        }
    }

    let top_titles: Vec<&str> = per_title
        .into_ranked(0)
        .into_iter()
        .take(TOP_N)
        .map(|(title, _)| title)
        .collect();

    let series = devices
        .into_iter()
        .filter_map(|device| {
            let mut series = Series::new(device);
            for &title in &top_titles {
                if let Some([pageviews]) = per_title_device.get(&(title, device)) {
                    series.push(title, *pageviews);
                }
            }
            (!series.is_empty()).then_some(series)
        })
        .collect();

    let mut chart = ChartSpec::new(Mark::Bar)
        .title("Top 5 Page Title by Unique Pageviews")
        .series(series);
    chart.bar_mode = Some(BarMode::Stack);
    chart.text_format = Some(SI_FORMAT.to_string());
    chart.x_axis.tick_angle = Some(90);
    chart.y_axis = Axis::hidden();

    ViewResult::Chart(chart)
}
