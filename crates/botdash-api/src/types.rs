//! Request and response envelopes.

use botdash_core::{PipelineId, RawPipeline};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// Reference data requested on mount.
pub const REFERENCE_RESOURCES: [&str; 4] = ["symbols", "strategies", "candleSizes", "exchanges"];

/// Reference data keyed by resource name.
///
/// Contents are opaque to the dashboard; they only feed the bot creation
/// form of a front end.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resources(pub serde_json::Map<String, serde_json::Value>);

impl Resources {
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge another response into this one, newer entries winning.
    pub fn merge(&mut self, other: Resources) {
        self.0.extend(other.0);
    }
}

/// Server-side statistics per pipeline; opaque to the dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PipelineMetricsReport(pub serde_json::Map<String, serde_json::Value>);

/// Answer of the execution API price endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceResponse {
    pub symbol: String,
    pub price: Decimal,
}

/// Acknowledgment returned by start/stop/delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotActionResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub pipeline: Option<RawPipeline>,
}

/// Parameters of a new pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartBotRequest {
    pub symbol: String,
    pub strategy: String,
    pub candle_size: String,
    pub exchanges: String,
    #[serde(default)]
    pub params: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub paper_trading: bool,
    #[serde(default = "default_leverage")]
    pub leverage: u32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub allocation: Option<Decimal>,
}

fn default_leverage() -> u32 {
    1
}

impl StartBotRequest {
    /// Reject missing selections before anything is sent.
    pub fn validate(&self) -> ApiResult<()> {
        let required = [
            ("symbol", &self.symbol),
            ("strategy", &self.strategy),
            ("candle size", &self.candle_size),
            ("exchange", &self.exchanges),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(ApiError::Validation(format!(
                "missing {}",
                missing.join(", ")
            )));
        }
        if self.leverage == 0 {
            return Err(ApiError::Validation("leverage must be at least 1".to_string()));
        }
        if let Some(allocation) = self.allocation {
            if allocation <= Decimal::ZERO {
                return Err(ApiError::Validation(
                    "allocation must be positive".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Body of `PUT /stop_bot`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopBotRequest {
    pub pipeline_id: PipelineId,
}
