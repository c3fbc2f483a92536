//! Dashboard Core - shared service infrastructure
//!
//! This crate provides:
//! - The service trait every dashboard binary implements
//! - A runtime that drives the service lifecycle and shutdown signals
//! - Error handling utilities with HTTP status mapping
//! - Environment-based configuration

pub mod config;
pub mod error;
pub mod service;

pub use config::ServiceConfig;
pub use error::{DashboardError, Result};
pub use service::{
    DashboardService, DependencyStatus, HealthStatus, MicroserviceRuntime, ReadinessStatus,
};
