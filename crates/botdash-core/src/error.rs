//! Error types for botdash-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid side encoding: {0} (expected -1, 0 or 1)")]
    InvalidSide(i64),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
