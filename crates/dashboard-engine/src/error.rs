//! Error types for the dashboard engine

use std::any::Any;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, EngineError>;

/// Top-level engine error
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Data load error: {0}")]
    DataLoad(#[from] DataLoadError),

    #[error("Computation failed: {0}")]
    Computation(#[from] ComputationFailure),

    #[error("Unknown view: {0}")]
    UnknownView(String),
}

/// Dataset loading errors. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("Cannot read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column missing: {0}")]
    MissingColumn(String),

    #[error("Invalid date {value:?} on line {line}, expected MM/DD/YYYY")]
    InvalidDate { line: u64, value: String },
}

/// A view's aggregation rule failed while executing.
///
/// Recorded against a single cache entry and handed to every caller waiting
/// on that entry, hence `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("view {view} failed: {reason}")]
pub struct ComputationFailure {
    pub view: String,
    pub reason: String,
}

impl ComputationFailure {
    pub fn new(view: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            reason: reason.into(),
        }
    }
}

/// Extract a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "aggregation panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_variants() {
        let borrowed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(borrowed.as_ref()), "boom");

        let owned: Box<dyn Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(panic_message(owned.as_ref()), "owned boom");

        let opaque: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(opaque.as_ref()), "aggregation panicked");
    }

    #[test]
    fn test_computation_failure_display() {
        let failure = ComputationFailure::new("top-5-countries-by-unique-pageviews", "boom");
        assert_eq!(
            failure.to_string(),
            "view top-5-countries-by-unique-pageviews failed: boom"
        );
    }
}
