//! Sensiscan Observability
//!
//! This crate provides observability features:
//! - Lock-free detection statistics (always on)
//! - Metrics collection (Prometheus)
//! - Structured logging setup

pub mod logging;
pub mod metrics;
pub mod stats;

pub use logging::{LoggingConfig, init_logging};
pub use metrics::Metrics;
pub use stats::{DetectionStats, StatsSnapshot};
