//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(#[from] botdash_api::ApiError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] botdash_telemetry::TelemetryError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The server answered a bot action with `success: false`.
    #[error("{action} rejected: {message}")]
    Rejected { action: &'static str, message: String },
}

pub type AppResult<T> = Result<T, AppError>;
