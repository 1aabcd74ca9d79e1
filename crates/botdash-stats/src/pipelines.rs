//! Pipeline leaderboard.

use std::collections::HashMap;

use botdash_core::{Pipeline, PipelineId, Trade};
use serde::Serialize;

use crate::reducer::Reducer;

/// Pipeline with the best win rate seen so far.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WinRateLeader {
    /// Winning trades over all trades of the pipeline, in `[0, 1]`.
    pub win_rate: f64,
    pub pipeline_id: Option<PipelineId>,
}

/// Pipeline with the most trades seen so far.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TradeCountLeader {
    pub total_trades: u64,
    pub pipeline_id: Option<PipelineId>,
}

/// Aggregate statistics over all pipelines.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PipelinesMetrics {
    pub total_pipelines: u64,
    pub active_pipelines: u64,
    pub best_win_rate: WinRateLeader,
    pub most_trades: TradeCountLeader,
}

#[derive(Debug, Clone, Copy, Default)]
struct TradeTally {
    trades: u64,
    wins: u64,
}

/// Folds pipelines into [`PipelinesMetrics`] using the trade history.
///
/// Trades are tallied per pipeline once at construction instead of being
/// filtered again for every pipeline. Leaders are replaced only on a strictly
/// greater value, so the first pipeline seen keeps a tie.
#[derive(Debug, Clone)]
pub struct PipelinesReducer {
    tallies: HashMap<PipelineId, TradeTally>,
}

impl PipelinesReducer {
    pub fn new<'a>(trades: impl IntoIterator<Item = &'a Trade>) -> Self {
        let mut tallies: HashMap<PipelineId, TradeTally> = HashMap::new();
        for trade in trades {
            let tally = tallies.entry(trade.pipeline_id).or_default();
            tally.trades += 1;
            if trade.is_winner() {
                tally.wins += 1;
            }
        }
        Self { tallies }
    }

    fn tally(&self, pipeline_id: PipelineId) -> TradeTally {
        self.tallies.get(&pipeline_id).copied().unwrap_or_default()
    }
}

impl Reducer for PipelinesReducer {
    type Item = Pipeline;
    type Output = PipelinesMetrics;

    fn zero(&self) -> PipelinesMetrics {
        PipelinesMetrics::default()
    }

    fn step(&self, mut acc: PipelinesMetrics, pipeline: &Pipeline) -> PipelinesMetrics {
        acc.total_pipelines += 1;
        if pipeline.active {
            acc.active_pipelines += 1;
        }

        let tally = self.tally(pipeline.id);
        let win_rate = if tally.trades == 0 {
            0.0
        } else {
            tally.wins as f64 / tally.trades as f64
        };

        if win_rate > acc.best_win_rate.win_rate {
            acc.best_win_rate = WinRateLeader {
                win_rate,
                pipeline_id: Some(pipeline.id),
            };
        }

        if tally.trades > acc.most_trades.total_trades {
            acc.most_trades = TradeCountLeader {
                total_trades: tally.trades,
                pipeline_id: Some(pipeline.id),
            };
        }

        acc
    }
}
