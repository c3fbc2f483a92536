//! Tracing Setup

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{Result, TelemetryConfig, TelemetryError};

/// Initialize the global tracing subscriber
pub fn init_tracing(service_name: &str, config: &TelemetryConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    // Exactly one of the two format layers is present
    let json_layer = config.json_logs.then(|| {
        fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(config.with_thread_ids)
    });
    let text_layer = (!config.json_logs).then(|| {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(config.with_thread_ids)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .map_err(|e| TelemetryError::TracingInit(e.to_string()))?;

    tracing::info!(
        service = service_name,
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "Tracing initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_reported() {
        let config = TelemetryConfig {
            json_logs: false,
            ..TelemetryConfig::default()
        };
        // The global subscriber can be installed once per process
        let first = init_tracing("dashboard-test", &config);
        let second = init_tracing("dashboard-test", &config);
        assert!(first.is_err() || second.is_err());
        assert!(matches!(second, Err(TelemetryError::TracingInit(_))));
    }
}
