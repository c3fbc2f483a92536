//! Dashboard API
//!
//! HTTP front of the website marketing dashboard:
//! - Filter options derived from the dataset's channel groupings
//! - Whole-dashboard recompute on a filter change
//! - Single view lookups and cache status probes
//! - Cache warm-up for every filter option at startup

mod config;
mod error;
mod handlers;
mod routes;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use dashboard_core::{
    DashboardError, DashboardService, DependencyStatus, HealthStatus, MicroserviceRuntime,
    ReadinessStatus,
};
use dashboard_engine::{Dispatcher, FilterValue};
use tokio::net::TcpListener;
use tracing::info;

pub use config::Config;
pub use error::{Error, Result};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub config: Arc<Config>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config, dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    dashboard_telemetry::init(&config.service.service_name, &config.telemetry)?;

    info!("Starting Dashboard API");

    // A dataset that fails to load aborts startup before any view is served
    let dispatcher = Dispatcher::load(&config.dataset_path)?;

    let service = Arc::new(DashboardApi::new(AppState::new(config, dispatcher)));
    MicroserviceRuntime::run(service).await?;

    Ok(())
}

/// Dashboard API service
pub struct DashboardApi {
    state: AppState,
}

impl DashboardApi {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Submit the expensive views for every dropdown option
    fn warm_cache(&self) {
        let dispatcher = &self.state.dispatcher;
        let options: Vec<FilterValue> = FilterValue::options(dispatcher.dataset());
        let submitted = dispatcher.warm(&options);
        info!(
            filters = options.len(),
            submitted,
            "Cache warm-up started"
        );
    }
}

#[async_trait]
impl DashboardService for DashboardApi {
    fn service_id(&self) -> &'static str {
        "dashboard-api"
    }

    async fn health(&self) -> HealthStatus {
        HealthStatus {
            healthy: true,
            service_id: self.state.config.service.service_name.clone(),
            version: self.version().to_string(),
            uptime_seconds: self.state.uptime_secs(),
        }
    }

    async fn ready(&self) -> ReadinessStatus {
        let rows = self.state.dispatcher.dataset().len();
        ReadinessStatus {
            ready: true,
            dependencies: vec![DependencyStatus {
                name: "dataset".to_string(),
                available: true,
                detail: Some(format!("{} rows", rows)),
            }],
        }
    }

    async fn shutdown(&self) -> dashboard_core::Result<()> {
        let stats = self.state.dispatcher.cache().stats();
        info!(
            entries = stats.entries,
            computations = stats.computations,
            in_flight = stats.in_flight,
            "Shutting down Dashboard API"
        );
        Ok(())
    }

    async fn start(&self) -> dashboard_core::Result<()> {
        let bind_addr = self.state.config.service.http_bind;

        if self.state.config.warm_cache {
            self.warm_cache();
        }

        let app = routes::create_router(self.state.clone());
        let listener = TcpListener::bind(bind_addr).await?;
        info!(
            http = %bind_addr,
            view_wait_ms = self.state.config.view_wait.as_millis() as u64,
            "Dashboard API listening"
        );

        axum::serve(listener, app)
            .await
            .map_err(|e| DashboardError::Network(e.to_string()))
    }
}
