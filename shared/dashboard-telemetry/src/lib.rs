//! Dashboard Telemetry
//!
//! Structured logging setup and in-process metric primitives shared by the
//! dashboard crates.

mod config;
mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{Counter, Gauge, Histogram, HistogramSnapshot};
pub use tracing_setup::init_tracing;

pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Initialize telemetry for a service
pub fn init(service_name: &str, config: &TelemetryConfig) -> Result<()> {
    init_tracing(service_name, config)
}

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Tracing initialization failed: {0}")]
    TracingInit(String),
}
