//! Aggregation reducers for the dashboard view-model.
//!
//! Each reducer is a pure fold: a fixed zero value plus a per-element step.
//! Reducers are independent of one another and borrow only their own
//! auxiliary inputs (live prices, trades, balances), so every one of them can
//! be exercised with literal inputs.
//!
//! | Reducer | Item | Output |
//! |---|---|---|
//! | [`TradesReducer`] | `Trade` | [`TradesMetrics`] |
//! | [`PositionsReducer`] | `Position` | [`PositionsMetrics`] |
//! | [`PipelinesReducer`] | `Pipeline` | [`PipelinesMetrics`] |
//! | [`AvailableBalanceReducer`] | `Position` | [`AvailableBalance`] |

pub mod balance;
pub mod pipelines;
pub mod positions;
pub mod reducer;
pub mod trades;

pub use balance::{AvailableBalance, AvailableBalanceReducer};
pub use pipelines::{PipelinesMetrics, PipelinesReducer, TradeCountLeader, WinRateLeader};
pub use positions::{PositionsMetrics, PositionsReducer};
pub use reducer::Reducer;
pub use trades::{TradesMetrics, TradesReducer};
