//! Pipeline (bot) records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::PipelineId;
use crate::normalize::parse_timestamp;

/// Pipeline as returned by the data API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPipeline {
    pub id: PipelineId,
    pub symbol: String,
    pub strategy: String,
    pub candle_size: String,
    pub exchange: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub paper_trading: bool,
    /// Strategy parameters; opaque to the dashboard.
    #[serde(default)]
    pub params: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub number_trades: u64,
    #[serde(default)]
    pub current_equity: Decimal,
    #[serde(default)]
    pub open_time: Option<String>,
    #[serde(default)]
    pub leverage: Option<u32>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub allocation: Option<Decimal>,
}

/// A normalized pipeline.
///
/// Patched locally when a start/stop action returns the updated record,
/// otherwise replaced on refetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: PipelineId,
    pub symbol: String,
    pub strategy: String,
    pub candle_size: String,
    pub exchange: String,
    pub active: bool,
    pub paper_trading: bool,
    pub params: serde_json::Map<String, serde_json::Value>,
    pub number_trades: u64,
    pub current_equity: Decimal,
    pub open_time: Option<DateTime<Utc>>,
    pub leverage: Option<u32>,
    pub color: Option<String>,
    pub allocation: Option<Decimal>,
}

impl From<RawPipeline> for Pipeline {
    fn from(raw: RawPipeline) -> Self {
        Self {
            id: raw.id,
            symbol: raw.symbol,
            strategy: raw.strategy,
            candle_size: raw.candle_size,
            exchange: raw.exchange,
            active: raw.active,
            paper_trading: raw.paper_trading,
            params: raw.params,
            number_trades: raw.number_trades,
            current_equity: raw.current_equity,
            open_time: raw.open_time.as_deref().and_then(parse_timestamp),
            leverage: raw.leverage,
            color: raw.color,
            allocation: raw.allocation,
        }
    }
}
