//! Available balance after reserving equity for idle pipelines.

use std::collections::BTreeMap;

use botdash_core::{Account, Balances, Pipeline, PipelineId, Position};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::reducer::Reducer;

/// Quote-asset balance still free to allocate, per account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AvailableBalance {
    pub live: Decimal,
    pub test: Decimal,
}

impl AvailableBalance {
    fn bucket_mut(&mut self, account: Account) -> &mut Decimal {
        match account {
            Account::Live => &mut self.live,
            Account::Test => &mut self.test,
        }
    }
}

/// Folds positions into [`AvailableBalance`].
///
/// Starts from the reported available USDT balance of each account (zero if
/// not reported). Every flat position subtracts its pipeline's current equity
/// from the account the pipeline trades on. Positions of unknown pipelines
/// are skipped. The result is for display only.
#[derive(Debug, Clone, Copy)]
pub struct AvailableBalanceReducer<'a> {
    balances: &'a Balances,
    pipelines: &'a BTreeMap<PipelineId, Pipeline>,
}

impl<'a> AvailableBalanceReducer<'a> {
    pub fn new(balances: &'a Balances, pipelines: &'a BTreeMap<PipelineId, Pipeline>) -> Self {
        Self {
            balances,
            pipelines,
        }
    }
}

impl Reducer for AvailableBalanceReducer<'_> {
    type Item = Position;
    type Output = AvailableBalance;

    fn zero(&self) -> AvailableBalance {
        AvailableBalance {
            live: self
                .balances
                .available_quote(Account::Live)
                .unwrap_or(Decimal::ZERO),
            test: self
                .balances
                .available_quote(Account::Test)
                .unwrap_or(Decimal::ZERO),
        }
    }

    fn step(&self, mut acc: AvailableBalance, position: &Position) -> AvailableBalance {
        if !position.side.is_flat() {
            return acc;
        }
        let Some(pipeline) = self.pipelines.get(&position.pipeline_id) else {
            return acc;
        };

        *acc.bucket_mut(Account::for_paper_trading(pipeline.paper_trading)) -=
            pipeline.current_equity;
        acc
    }
}
