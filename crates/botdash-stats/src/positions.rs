//! Open position statistics.

use std::collections::BTreeMap;

use botdash_core::{Position, PriceMap};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::reducer::Reducer;

/// Aggregate exposure over a position collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PositionsMetrics {
    pub open_positions: u64,
    /// Sum of `amount * current price`; unknown prices count as zero.
    pub total_equity_positions: Decimal,
    /// Sum of `amount * entry price`.
    pub total_initial_equity: Decimal,
    pub symbols_count: BTreeMap<String, u64>,
}

impl PositionsMetrics {
    /// Net PnL in percent, defined only when initial equity is non-zero.
    #[must_use]
    pub fn pnl_pct(&self) -> Option<Decimal> {
        if self.total_initial_equity.is_zero() {
            return None;
        }
        Some(
            (self.total_equity_positions - self.total_initial_equity) / self.total_initial_equity
                * Decimal::ONE_HUNDRED,
        )
    }
}

/// Folds positions into [`PositionsMetrics`] against a live price map.
#[derive(Debug, Clone, Copy)]
pub struct PositionsReducer<'a> {
    prices: &'a PriceMap,
}

impl<'a> PositionsReducer<'a> {
    pub fn new(prices: &'a PriceMap) -> Self {
        Self { prices }
    }
}

impl Reducer for PositionsReducer<'_> {
    type Item = Position;
    type Output = PositionsMetrics;

    fn zero(&self) -> PositionsMetrics {
        PositionsMetrics::default()
    }

    fn step(&self, mut acc: PositionsMetrics, position: &Position) -> PositionsMetrics {
        let current_price = self
            .prices
            .get(&position.symbol)
            .copied()
            .unwrap_or(Decimal::ZERO);

        acc.open_positions += 1;
        acc.total_equity_positions += position.amount * current_price;
        acc.total_initial_equity += position.initial_equity();
        *acc.symbols_count.entry(position.symbol.clone()).or_insert(0) += 1;
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botdash_core::{PipelineId, PositionId, Side};
    use rust_decimal_macros::dec;

    fn position(id: u64, symbol: &str, amount: Decimal, price: Decimal) -> Position {
        Position {
            id: PositionId(id),
            symbol: symbol.to_string(),
            pipeline_id: PipelineId(id),
            exchange: "binance".to_string(),
            side: Side::Long,
            amount,
            price,
            open_time: None,
            close_time: None,
            paper_trading: false,
            open: true,
        }
    }

    #[test]
    fn test_single_position_pnl() {
        let prices = PriceMap::from([("BTC".to_string(), dec!(110))]);
        let positions = vec![position(1, "BTC", dec!(1), dec!(100))];

        let metrics = PositionsReducer::new(&prices).reduce(&positions);

        assert_eq!(metrics.open_positions, 1);
        assert_eq!(metrics.total_equity_positions, dec!(110));
        assert_eq!(metrics.total_initial_equity, dec!(100));
        assert_eq!(metrics.pnl_pct(), Some(dec!(10)));
    }

    #[test]
    fn test_unknown_price_counts_as_zero() {
        let prices = PriceMap::new();
        let positions = vec![position(1, "ETH", dec!(2), dec!(50))];

        let metrics = PositionsReducer::new(&prices).reduce(&positions);

        assert_eq!(metrics.total_equity_positions, Decimal::ZERO);
        assert_eq!(metrics.total_initial_equity, dec!(100));
        assert_eq!(metrics.pnl_pct(), Some(dec!(-100)));
    }

    #[test]
    fn test_empty_has_no_pnl() {
        let prices = PriceMap::new();
        let metrics = PositionsReducer::new(&prices).reduce(&Vec::<Position>::new());
        assert_eq!(metrics, PositionsMetrics::default());
        assert_eq!(metrics.pnl_pct(), None);
    }

    #[test]
    fn test_symbol_counts_sum_to_open_positions() {
        let prices = PriceMap::from([("BTC".to_string(), dec!(1))]);
        let positions = vec![
            position(1, "BTC", dec!(1), dec!(1)),
            position(2, "ETH", dec!(1), dec!(1)),
            position(3, "BTC", dec!(1), dec!(1)),
            position(4, "SOL", dec!(1), dec!(1)),
        ];

        let metrics = PositionsReducer::new(&prices).reduce(&positions);

        assert_eq!(metrics.symbols_count.get("BTC"), Some(&2));
        assert_eq!(
            metrics.symbols_count.values().sum::<u64>(),
            metrics.open_positions
        );
    }
}
