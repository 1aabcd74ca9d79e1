//! Trade records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::{PipelineId, TradeId};
use crate::normalize::parse_timestamp;
use crate::side::Side;

/// Trade as returned by the data API.
///
/// Dates arrive as ISO-8601 strings and numbers may arrive as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrade {
    pub id: TradeId,
    pub pipeline_id: PipelineId,
    pub symbol: String,
    pub side: Side,
    pub amount: Decimal,
    pub open_price: Decimal,
    #[serde(default)]
    pub open_time: Option<String>,
    #[serde(default)]
    pub close_time: Option<String>,
    #[serde(default)]
    pub profit_loss_pct: Option<Decimal>,
}

/// A normalized trade.
///
/// Immutable once closed. `close_time` and `profit_loss_pct` are `None`
/// while the trade is still open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub pipeline_id: PipelineId,
    pub symbol: String,
    pub side: Side,
    pub amount: Decimal,
    pub open_price: Decimal,
    pub open_time: Option<DateTime<Utc>>,
    pub close_time: Option<DateTime<Utc>>,
    pub profit_loss_pct: Option<Decimal>,
}

impl Trade {
    /// A trade is closed once the backend has reported its result.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.profit_loss_pct.is_some()
    }

    /// Trade duration in milliseconds, or `None` while open.
    #[must_use]
    pub fn duration_ms(&self) -> Option<i64> {
        match (self.open_time, self.close_time) {
            (Some(open), Some(close)) => Some((close - open).num_milliseconds()),
            _ => None,
        }
    }

    /// Closed with a non-negative result.
    #[must_use]
    pub fn is_winner(&self) -> bool {
        self.profit_loss_pct.map_or(false, |pct| pct >= Decimal::ZERO)
    }
}

impl From<RawTrade> for Trade {
    fn from(raw: RawTrade) -> Self {
        Self {
            id: raw.id,
            pipeline_id: raw.pipeline_id,
            symbol: raw.symbol,
            side: raw.side,
            amount: raw.amount,
            open_price: raw.open_price,
            open_time: raw.open_time.as_deref().and_then(parse_timestamp),
            close_time: raw.close_time.as_deref().and_then(parse_timestamp),
            profit_loss_pct: raw.profit_loss_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_raw_trade_accepts_string_numbers() {
        let raw: RawTrade = serde_json::from_str(
            r#"{
                "id": 1,
                "pipelineId": 3,
                "symbol": "BTCUSDT",
                "side": -1,
                "amount": "0.5",
                "openPrice": 20000.5,
                "openTime": "2023-01-01T10:00:00Z",
                "closeTime": null,
                "profitLossPct": null
            }"#,
        )
        .unwrap();

        assert_eq!(raw.amount, dec!(0.5));
        assert_eq!(raw.open_price, dec!(20000.5));

        let trade = Trade::from(raw);
        assert_eq!(trade.side, Side::Short);
        assert!(trade.open_time.is_some());
        assert!(trade.close_time.is_none());
        assert!(!trade.is_closed());
        assert_eq!(trade.duration_ms(), None);
    }

    #[test]
    fn test_duration_and_winner() {
        let raw = RawTrade {
            id: TradeId(1),
            pipeline_id: PipelineId(1),
            symbol: "ETHUSDT".to_string(),
            side: Side::Long,
            amount: dec!(1),
            open_price: dec!(1500),
            open_time: Some("2023-01-01T10:00:00Z".to_string()),
            close_time: Some("2023-01-01T11:00:00Z".to_string()),
            profit_loss_pct: Some(dec!(0)),
        };
        let trade = Trade::from(raw);
        assert_eq!(trade.duration_ms(), Some(3_600_000));
        assert!(trade.is_winner());
    }
}
