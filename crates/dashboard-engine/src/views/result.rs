//! View result shapes handed to the rendering layer

use serde::Serialize;

use crate::format::abbreviate;

/// Output of a view's aggregation rule
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewResult {
    Scalar(Scalar),
    Table(Table),
    Chart(ChartSpec),
}

impl ViewResult {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            ViewResult::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            ViewResult::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_chart(&self) -> Option<&ChartSpec> {
        match self {
            ViewResult::Chart(chart) => Some(chart),
            _ => None,
        }
    }
}

/// A KPI number together with its abbreviated display form.
///
/// `value` is `None` when the number is undefined (an average over no rows);
/// the display is then absent too and the renderer decides what to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scalar {
    pub value: Option<f64>,
    pub display: Option<String>,
}

impl Scalar {
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Self {
                value: Some(value),
                display: Some(abbreviate(value)),
            }
        } else {
            Self::undefined()
        }
    }

    pub fn undefined() -> Self {
        Self {
            value: None,
            display: None,
        }
    }

    /// `sum / count`, undefined when `count` is zero
    pub fn mean(sum: f64, count: usize) -> Self {
        if count == 0 {
            Self::undefined()
        } else {
            Self::new(sum / count as f64)
        }
    }
}

/// Column value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
    Number,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub id: String,
    pub name: String,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(name: &str, kind: ColumnKind) -> Self {
        Self {
            id: name.to_string(),
            name: name.to_string(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(text) => Some(text),
            Cell::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(number) => Some(*number),
            Cell::Text(_) => None,
        }
    }
}

/// Ordered records with their column schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
}

/// Chart mark type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Bar,
    Line,
}

/// Direction of the value axis. Horizontal charts put labels on the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    Stack,
    Group,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Option<String>,
    pub visible: bool,
    pub show_tick_labels: bool,
    pub tick_angle: Option<i32>,
    pub tick_format: Option<String>,
}

impl Default for Axis {
    fn default() -> Self {
        Self {
            title: None,
            visible: true,
            show_tick_labels: true,
            tick_angle: None,
            tick_format: None,
        }
    }
}

impl Axis {
    pub fn hidden() -> Self {
        Self {
            visible: false,
            show_tick_labels: false,
            ..Self::default()
        }
    }
}

/// One named series of `(label, value)` points
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        self.labels.push(label.into());
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Chart description consumed by the rendering layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: Option<String>,
    pub mark: Mark,
    pub orientation: Orientation,
    pub bar_mode: Option<BarMode>,
    /// d3-style format for value labels drawn on the marks
    pub text_format: Option<String>,
    pub series: Vec<Series>,
    pub x_axis: Axis,
    pub y_axis: Axis,
}

impl ChartSpec {
    pub fn new(mark: Mark) -> Self {
        Self {
            title: None,
            mark,
            orientation: Orientation::Vertical,
            bar_mode: None,
            text_format: None,
            series: Vec::new(),
            x_axis: Axis::default(),
            y_axis: Axis::default(),
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn series(mut self, series: Vec<Series>) -> Self {
        self.series = series;
        self
    }

    /// Find a series by name
    pub fn find_series(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|series| series.name == name)
    }
}
