//! API error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with status >= 400.
    #[error("{resource} request failed: HTTP {status}: {message}")]
    Status {
        resource: String,
        status: u16,
        message: String,
    },

    #[error("Could not reach server for {resource}: {message}")]
    Transport { resource: String, message: String },

    #[error("Failed to parse {resource} response: {message}")]
    Decode { resource: String, message: String },

    /// Bot parameters rejected locally; nothing was sent.
    #[error("Invalid bot parameters: {0}")]
    Validation(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl ApiError {
    /// HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Status { .. } => "http_error",
            Self::Transport { .. } => "transport",
            Self::Decode { .. } => "decode",
            Self::Validation(_) => "validation",
            Self::HttpClient(_) => "client",
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
