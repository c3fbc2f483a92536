//! Dataset Store
//!
//! Holds the immutable snapshot of website marketing rows. The snapshot is
//! loaded once at startup and shared read-only (behind an `Arc`) by every
//! component afterwards.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::DataLoadError;

/// Source date format (`MM/DD/YYYY`)
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Columns the source must provide. Any other column is ignored.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "Channel Grouping",
    "Country",
    "Date",
    "Page Title",
    "Device Category",
    "Sessions",
    "Bounces",
    "Exits",
    "Unique Pageviews",
    "Page Load Time",
    "Time on Page",
];

/// One observation of the marketing dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub channel_grouping: String,
    pub country: String,
    pub date: NaiveDate,
    pub page_title: String,
    pub device_category: String,
    pub sessions: f64,
    pub bounces: f64,
    pub exits: f64,
    pub unique_pageviews: f64,
    pub page_load_time: f64,
    pub time_on_page: f64,
}

/// Row as it appears in the CSV, before date validation
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Channel Grouping")]
    channel_grouping: String,
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Page Title")]
    page_title: String,
    #[serde(rename = "Device Category")]
    device_category: String,
    #[serde(rename = "Sessions")]
    sessions: f64,
    #[serde(rename = "Bounces")]
    bounces: f64,
    #[serde(rename = "Exits")]
    exits: f64,
    #[serde(rename = "Unique Pageviews")]
    unique_pageviews: f64,
    #[serde(rename = "Page Load Time")]
    page_load_time: f64,
    #[serde(rename = "Time on Page")]
    time_on_page: f64,
}

impl RawRow {
    fn into_row(self, line: u64) -> Result<Row, DataLoadError> {
        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).map_err(|_| {
            DataLoadError::InvalidDate {
                line,
                value: self.date.clone(),
            }
        })?;

        Ok(Row {
            channel_grouping: self.channel_grouping,
            country: self.country,
            date,
            page_title: self.page_title,
            device_category: self.device_category,
            sessions: self.sessions,
            bounces: self.bounces,
            exits: self.exits,
            unique_pageviews: self.unique_pageviews,
            page_load_time: self.page_load_time,
            time_on_page: self.time_on_page,
        })
    }
}

/// Immutable, ordered snapshot of rows
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    /// Load the dataset from a CSV file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DataLoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let dataset = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            rows = dataset.len(),
            channel_groupings = dataset.channel_groupings().len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    /// Parse CSV content from any reader.
    ///
    /// Headers are validated against [`REQUIRED_COLUMNS`] before any record is
    /// read, so a schema problem is reported as [`DataLoadError::MissingColumn`]
    /// rather than as a per-record deserialization failure.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataLoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|header| header == *column) {
                return Err(DataLoadError::MissingColumn((*column).to_string()));
            }
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let raw: RawRow = record.deserialize(Some(&headers))?;
            rows.push(raw.into_row(line)?);
        }

        Ok(Self { rows })
    }

    /// Build a dataset from rows that are already typed.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// The full snapshot, in source order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct channel groupings in order of first appearance
    pub fn channel_groupings(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|row| row.channel_grouping.as_str())
            .filter(|grouping| seen.insert(*grouping))
            .collect()
    }

    /// Whether any row carries the given channel grouping
    pub fn has_channel_grouping(&self, grouping: &str) -> bool {
        self.rows.iter().any(|row| row.channel_grouping == grouping)
    }
}
