//! API client configuration.

use serde::{Deserialize, Serialize};

/// How the futures balance fetch treats HTTP failures.
///
/// The balance endpoint historically answers a non-2xx status with an empty
/// body when the account has no data. `Tolerant` keeps that contract: status
/// >= 400 resolves to "no balances" instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceFetchMode {
    #[default]
    Tolerant,
    Strict,
}

/// Backend endpoints and client behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the data API.
    #[serde(default = "default_data_api_url")]
    pub data_api_url: String,
    /// Base URL of the execution API.
    #[serde(default = "default_execution_api_url")]
    pub execution_api_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub balance_fetch_mode: BalanceFetchMode,
}

fn default_data_api_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_execution_api_url() -> String {
    "http://localhost:5001".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            data_api_url: default_data_api_url(),
            execution_api_url: default_execution_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            balance_fetch_mode: BalanceFetchMode::default(),
        }
    }
}
