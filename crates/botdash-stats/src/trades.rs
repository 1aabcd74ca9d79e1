//! Trade statistics.

use botdash_core::Trade;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::reducer::Reducer;

/// Aggregate statistics over a trade collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TradesMetrics {
    pub number_trades: u64,
    /// Longest closed trade (milliseconds).
    pub max_trade_duration: i64,
    /// Sum of closed trade durations (milliseconds).
    pub total_trade_duration: i64,
    pub winning_trades: u64,
    pub closed_trades: u64,
    /// Highest `profit_loss_pct` among closed trades.
    pub best_trade: Option<Decimal>,
    /// Lowest `profit_loss_pct` among closed trades.
    pub worst_trade: Option<Decimal>,
}

impl TradesMetrics {
    /// Mean duration over all trades (open trades count as zero).
    ///
    /// `None` when there are no trades.
    #[must_use]
    pub fn avg_trade_duration(&self) -> Option<f64> {
        if self.number_trades == 0 {
            return None;
        }
        Some(self.total_trade_duration as f64 / self.number_trades as f64)
    }

    /// Winning share of closed trades, in percent.
    ///
    /// `None` when no trade has closed yet.
    #[must_use]
    pub fn win_rate(&self) -> Option<f64> {
        if self.closed_trades == 0 {
            return None;
        }
        Some(self.winning_trades as f64 / self.closed_trades as f64 * 100.0)
    }
}

/// Folds trades into [`TradesMetrics`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TradesReducer;

impl Reducer for TradesReducer {
    type Item = Trade;
    type Output = TradesMetrics;

    fn zero(&self) -> TradesMetrics {
        TradesMetrics::default()
    }

    fn step(&self, mut acc: TradesMetrics, trade: &Trade) -> TradesMetrics {
        acc.number_trades += 1;

        let duration = trade.duration_ms().unwrap_or(0);
        acc.max_trade_duration = acc.max_trade_duration.max(duration);
        acc.total_trade_duration += duration;

        if let Some(pct) = trade.profit_loss_pct {
            acc.closed_trades += 1;
            if pct >= Decimal::ZERO {
                acc.winning_trades += 1;
            }
            acc.best_trade = Some(acc.best_trade.map_or(pct, |best| best.max(pct)));
            acc.worst_trade = Some(acc.worst_trade.map_or(pct, |worst| worst.min(pct)));
        }

        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botdash_core::{PipelineId, Side, TradeId};
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn trade(id: u64, duration_ms: Option<i64>, pct: Option<Decimal>) -> Trade {
        let open = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        Trade {
            id: TradeId(id),
            pipeline_id: PipelineId(1),
            symbol: "BTCUSDT".to_string(),
            side: Side::Long,
            amount: dec!(1),
            open_price: dec!(100),
            open_time: Some(open),
            close_time: duration_ms.map(|ms| open + Duration::milliseconds(ms)),
            profit_loss_pct: pct,
        }
    }

    #[test]
    fn test_empty_collection_is_zero() {
        let metrics = TradesReducer.reduce(&Vec::<Trade>::new());
        assert_eq!(metrics, TradesMetrics::default());
        assert_eq!(metrics.avg_trade_duration(), None);
        assert_eq!(metrics.win_rate(), None);
    }

    #[test]
    fn test_single_closed_winner() {
        let trades = vec![trade(1, Some(3_600_000), Some(dec!(0.05)))];
        let metrics = TradesReducer.reduce(&trades);

        assert_eq!(metrics.number_trades, 1);
        assert_eq!(metrics.closed_trades, 1);
        assert_eq!(metrics.winning_trades, 1);
        assert_eq!(metrics.best_trade, Some(dec!(0.05)));
        assert_eq!(metrics.worst_trade, Some(dec!(0.05)));
        assert_eq!(metrics.max_trade_duration, 3_600_000);
        assert_eq!(metrics.avg_trade_duration(), Some(3_600_000.0));
        assert_eq!(metrics.win_rate(), Some(100.0));
    }

    #[test]
    fn test_mixed_trades() {
        let trades = vec![
            trade(1, Some(1_000), Some(dec!(0.10))),
            trade(2, Some(5_000), Some(dec!(-0.20))),
            trade(3, None, None),
            trade(4, Some(2_000), Some(dec!(0))),
        ];
        let metrics = TradesReducer.reduce(&trades);

        assert_eq!(metrics.number_trades, 4);
        assert_eq!(metrics.closed_trades, 3);
        assert_eq!(metrics.winning_trades, 2);
        assert_eq!(metrics.best_trade, Some(dec!(0.10)));
        assert_eq!(metrics.worst_trade, Some(dec!(-0.20)));
        assert_eq!(metrics.max_trade_duration, 5_000);
        assert_eq!(metrics.total_trade_duration, 8_000);
        assert_eq!(metrics.avg_trade_duration(), Some(2_000.0));
    }

    #[test]
    fn test_count_invariants_hold() {
        let pcts = [Some(dec!(1)), None, Some(dec!(-1)), Some(dec!(0)), None];
        for n in 0..=pcts.len() {
            let trades: Vec<Trade> = pcts[..n]
                .iter()
                .enumerate()
                .map(|(i, pct)| trade(i as u64, pct.map(|_| 10), *pct))
                .collect();
            let metrics = TradesReducer.reduce(&trades);

            assert_eq!(metrics.number_trades, trades.len() as u64);
            assert!(metrics.winning_trades <= metrics.closed_trades);
            assert!(metrics.closed_trades <= metrics.number_trades);
        }
    }

    #[test]
    fn test_reduce_is_deterministic() {
        let trades = vec![
            trade(1, Some(1_000), Some(dec!(0.3))),
            trade(2, Some(4_000), Some(dec!(-0.1))),
        ];
        assert_eq!(TradesReducer.reduce(&trades), TradesReducer.reduce(&trades));
    }
}
