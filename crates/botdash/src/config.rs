//! Application configuration.

use std::path::Path;

use botdash_api::ApiConfig;
use botdash_dashboard::DashboardConfig;
use botdash_telemetry::DEFAULT_LOG_FILTER;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "BOTDASH_CONFIG";

/// Config file used when neither `--config` nor the environment names one.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend endpoints.
    #[serde(default)]
    pub api: ApiConfig,
    /// Polling and banner timing.
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Config path: CLI arg > `BOTDASH_CONFIG` > default.
    pub fn resolve_path(cli: Option<String>) -> String {
        cli.or_else(|| std::env::var(CONFIG_ENV_VAR).ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        Self::from_toml(&content)
    }

    /// Load `path`, or the defaults if the file does not exist.
    pub fn from_file_or_default(path: &str) -> AppResult<Self> {
        if Path::new(path).exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        if self.dashboard.poll_interval_secs == 0 {
            return Err(AppError::Config(
                "dashboard.poll_interval_secs must be positive".to_string(),
            ));
        }
        if self.dashboard.channel_capacity == 0 {
            return Err(AppError::Config(
                "dashboard.channel_capacity must be positive".to_string(),
            ));
        }
        if self.api.request_timeout_secs == 0 {
            return Err(AppError::Config(
                "api.request_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botdash_api::BalanceFetchMode;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.data_api_url, "http://localhost:5000");
        assert_eq!(config.api.execution_api_url, "http://localhost:5001");
        assert_eq!(config.api.balance_fetch_mode, BalanceFetchMode::Tolerant);
        assert_eq!(config.dashboard.poll_interval_secs, 60);
        assert_eq!(config.dashboard.message_dismiss_ms, 4200);
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [api]
            data_api_url = "http://data:8000"
            balance_fetch_mode = "strict"

            [dashboard]
            poll_interval_secs = 15
            "#,
        )
        .unwrap();

        assert_eq!(config.api.data_api_url, "http://data:8000");
        assert_eq!(config.api.execution_api_url, "http://localhost:5001");
        assert_eq!(config.api.balance_fetch_mode, BalanceFetchMode::Strict);
        assert_eq!(config.dashboard.poll_interval_secs, 15);
        assert_eq!(config.dashboard.message_dismiss_ms, 4200);
        assert_eq!(
            config.dashboard.reference_resources,
            vec!["symbols", "strategies", "candleSizes", "exchanges"]
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = AppConfig::from_toml("[dashboard]\npoll_interval_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("poll_interval_secs"));

        let err = AppConfig::from_toml("[api]\nrequest_timeout_secs = \"ten\"\n").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::from_file_or_default("does/not/exist.toml").unwrap();
        assert_eq!(config.dashboard.poll_interval_secs, 60);

        assert!(AppConfig::from_file("does/not/exist.toml").is_err());
    }

    #[test]
    fn test_resolve_path_prefers_cli() {
        assert_eq!(
            AppConfig::resolve_path(Some("custom.toml".to_string())),
            "custom.toml"
        );
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("data_api_url"));
        assert!(toml_str.contains("poll_interval_secs"));
    }
}
