//! Prometheus metrics and structured logging for the bot dashboard.
//!
//! - Structured logging with tracing (JSON in production, pretty otherwise)
//! - Prometheus counters for API traffic, discarded stale responses,
//!   bot lifecycle actions and polling

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, DEFAULT_LOG_FILTER};
pub use metrics::Metrics;
