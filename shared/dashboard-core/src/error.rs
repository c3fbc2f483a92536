//! Error types for dashboard services

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DashboardError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Network(_) => "NETWORK_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(DashboardError::Config("HTTP_BIND".into()).error_code(), "CONFIG_ERROR");
        assert_eq!(DashboardError::Internal("join".into()).error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_io_errors_are_network_errors() {
        let err: DashboardError =
            std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use").into();
        assert!(matches!(err, DashboardError::Network(_)));
        assert_eq!(err.error_code(), "NETWORK_ERROR");
    }
}
