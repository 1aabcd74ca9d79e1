//! HTTP gateway to the bot data and execution APIs.
//!
//! Two backend hosts are involved:
//! - the data API: resources, trades, pipelines, positions and the bot
//!   lifecycle mutations (start/stop/delete)
//! - the execution API: live prices and futures account balances
//!
//! [`ApiClient`] talks to both over JSON. [`DashboardApi`] is the
//! dyn-compatible seam the dashboard controller depends on, so the controller
//! can be driven by an in-memory double in tests.

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod types;

pub use client::ApiClient;
pub use config::{ApiConfig, BalanceFetchMode};
pub use error::{ApiError, ApiResult};
pub use gateway::{BoxFuture, DashboardApi};
pub use types::{
    BotActionResponse, PipelineMetricsReport, PriceResponse, Resources, StartBotRequest,
    StopBotRequest, REFERENCE_RESOURCES,
};
