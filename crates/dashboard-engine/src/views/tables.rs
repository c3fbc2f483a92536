//! Tabular views

use super::grouping::GroupedSums;
use super::result::{Cell, Column, ColumnKind, Table, ViewResult};
use crate::predicate::Selection;

/// Label of the synthetic row appended to grouped tables
pub const TOTAL_LABEL: &str = "Total";

/// Sessions and bounces per device category, sorted by category, followed by
/// a `Total` row summing both columns.
pub(crate) fn device_category_breakdown(selection: &Selection<'_>) -> ViewResult {
    let mut sums = GroupedSums::<&str, 2>::new();
    for row in selection.iter() {
        sums.add(row.device_category.as_str(), [row.sessions, row.bounces]);
    }

    let groups = sums.into_sorted();
    let (sessions, bounces) = groups
        .iter()
        .fold((0.0, 0.0), |(s, b), (_, [sessions, bounces])| {
            (s + sessions, b + bounces)
        });

    let mut rows: Vec<Vec<Cell>> = groups
        .into_iter()
        .map(|(device, [sessions, bounces])| {
            vec![
                Cell::Text(device.to_string()),
                Cell::Number(sessions),
                Cell::Number(bounces),
            ]
        })
        .collect();
    rows.push(vec![
        Cell::Text(TOTAL_LABEL.to_string()),
        Cell::Number(sessions),
        Cell::Number(bounces),
    ]);

    ViewResult::Table(Table {
        columns: vec![
            Column::new("Device Category", ColumnKind::Text),
            Column::new("Sessions", ColumnKind::Number),
            Column::new("Bounces", ColumnKind::Number),
        ],
        rows,
    })
}
