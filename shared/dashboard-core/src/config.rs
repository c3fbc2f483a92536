//! Configuration management for services

use std::net::SocketAddr;

use crate::error::{DashboardError, Result};

/// Settings every dashboard service shares
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub service_name: String,
    pub http_bind: SocketAddr,
}

impl ServiceConfig {
    /// Build the configuration from an arbitrary variable lookup.
    /// `default_name` is used when `SERVICE_NAME` is unset.
    pub fn from_lookup<F>(default_name: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            service_name: lookup("SERVICE_NAME").unwrap_or_else(|| default_name.to_string()),
            http_bind: lookup("HTTP_BIND")
                .unwrap_or_else(|| "0.0.0.0:8050".to_string())
                .parse()
                .map_err(|e| DashboardError::Config(format!("Invalid HTTP_BIND: {}", e)))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_lookup("dashboard-api", |_| None).unwrap();
        assert_eq!(config.service_name, "dashboard-api");
        assert_eq!(config.http_bind.port(), 8050);
    }

    #[test]
    fn test_invalid_bind_is_config_error() {
        let err = ServiceConfig::from_lookup("dashboard-api", |key| {
            (key == "HTTP_BIND").then(|| "not-an-address".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }
}
