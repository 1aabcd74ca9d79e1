//! Position records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::{PipelineId, PositionId};
use crate::normalize::parse_timestamp;
use crate::side::Side;

/// Position as returned by the data API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPosition {
    pub id: PositionId,
    pub symbol: String,
    pub pipeline_id: PipelineId,
    #[serde(default)]
    pub exchange: String,
    pub side: Side,
    pub amount: Decimal,
    pub price: Decimal,
    #[serde(default)]
    pub open_time: Option<String>,
    #[serde(default)]
    pub close_time: Option<String>,
    #[serde(default)]
    pub paper_trading: bool,
    #[serde(default)]
    pub open: bool,
}

/// A normalized position: current exposure of one pipeline in one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub symbol: String,
    pub pipeline_id: PipelineId,
    pub exchange: String,
    pub side: Side,
    pub amount: Decimal,
    /// Entry price.
    pub price: Decimal,
    pub open_time: Option<DateTime<Utc>>,
    pub close_time: Option<DateTime<Utc>>,
    pub paper_trading: bool,
    pub open: bool,
}

impl Position {
    /// Notional at entry.
    #[must_use]
    pub fn initial_equity(&self) -> Decimal {
        self.amount * self.price
    }
}

impl From<RawPosition> for Position {
    fn from(raw: RawPosition) -> Self {
        Self {
            id: raw.id,
            symbol: raw.symbol,
            pipeline_id: raw.pipeline_id,
            exchange: raw.exchange,
            side: raw.side,
            amount: raw.amount,
            price: raw.price,
            open_time: raw.open_time.as_deref().and_then(parse_timestamp),
            close_time: raw.close_time.as_deref().and_then(parse_timestamp),
            paper_trading: raw.paper_trading,
            open: raw.open,
        }
    }
}
