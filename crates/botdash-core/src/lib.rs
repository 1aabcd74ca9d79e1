//! Core domain types for the bot dashboard.
//!
//! This crate provides the records every other crate works with:
//! - `Trade`, `Position`, `Pipeline`: normalized records keyed by id
//! - `RawTrade`, `RawPosition`, `RawPipeline`: wire records as the data API sends them
//! - `Balances`: per-account asset balances from the execution API
//! - `normalize`: conversion from wire records to sorted, typed records

pub mod balance;
pub mod error;
pub mod ids;
pub mod normalize;
pub mod pipeline;
pub mod position;
pub mod side;
pub mod trade;

pub use balance::{Account, AssetBalance, Balances, PriceMap, QUOTE_ASSET};
pub use error::{CoreError, Result};
pub use ids::{PipelineId, PositionId, TradeId};
pub use normalize::{organize_pipeline, organize_positions, organize_trades, parse_timestamp};
pub use pipeline::{Pipeline, RawPipeline};
pub use position::{Position, RawPosition};
pub use side::Side;
pub use trade::{RawTrade, Trade};
