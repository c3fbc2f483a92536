//! Configuration for the dashboard API

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use dashboard_core::{DashboardError, ServiceConfig};
use dashboard_telemetry::TelemetryConfig;

const SERVICE_NAME: &str = "dashboard-api";

/// Dashboard API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Name and bind address
    pub service: ServiceConfig,
    /// Log level and format
    pub telemetry: TelemetryConfig,
    /// CSV source loaded at startup
    pub dataset_path: PathBuf,
    /// How long the dashboard endpoint waits for expensive views
    pub view_wait: Duration,
    /// Precompute expensive views for every filter option at startup
    pub warm_cache: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> dashboard_core::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> dashboard_core::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let service = ServiceConfig::from_lookup(SERVICE_NAME, &lookup)?;
        Ok(Self {
            service,
            telemetry: TelemetryConfig::from_lookup(&lookup),
            dataset_path: lookup("DATASET_PATH")
                .unwrap_or_else(|| "./assets/data.csv".to_string())
                .into(),
            view_wait: Duration::from_millis(
                lookup("VIEW_WAIT_MS")
                    .unwrap_or_else(|| "2000".to_string())
                    .parse()
                    .map_err(|e| DashboardError::Config(format!("Invalid VIEW_WAIT_MS: {}", e)))?,
            ),
            warm_cache: lookup("WARM_CACHE")
                .unwrap_or_else(|| "true".to_string())
                .parse()
                .map_err(|e| DashboardError::Config(format!("Invalid WARM_CACHE: {}", e)))?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                service_name: SERVICE_NAME.to_string(),
                http_bind: ([0, 0, 0, 0], 8050).into(),
            },
            telemetry: TelemetryConfig::default(),
            dataset_path: PathBuf::from("./assets/data.csv"),
            view_wait: Duration::from_millis(2000),
            warm_cache: true,
        }
    }
}
