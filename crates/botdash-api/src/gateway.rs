//! Gateway trait consumed by the dashboard controller.
//!
//! Abstracts the backend so the controller can be driven by:
//! - [`ApiClient`] in production
//! - an in-memory double in tests

use std::pin::Pin;

use botdash_core::{Balances, PipelineId, RawPipeline, RawPosition, RawTrade};
use rust_decimal::Decimal;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::types::{BotActionResponse, PipelineMetricsReport, Resources, StartBotRequest};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// One operation per backend resource.
pub trait DashboardApi: Send + Sync {
    fn resources<'a>(&'a self, names: &'a [String]) -> BoxFuture<'a, ApiResult<Resources>>;

    fn trades(&self, page: Option<u32>) -> BoxFuture<'_, ApiResult<Vec<RawTrade>>>;

    fn pipelines(&self, page: Option<u32>) -> BoxFuture<'_, ApiResult<Vec<RawPipeline>>>;

    fn positions(&self, page: Option<u32>) -> BoxFuture<'_, ApiResult<Vec<RawPosition>>>;

    fn pipeline_metrics(&self) -> BoxFuture<'_, ApiResult<PipelineMetricsReport>>;

    fn price<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, ApiResult<Decimal>>;

    /// `Ok(None)` when the backend reported no balance data.
    fn balances(&self) -> BoxFuture<'_, ApiResult<Option<Balances>>>;

    fn start_bot<'a>(
        &'a self,
        request: &'a StartBotRequest,
    ) -> BoxFuture<'a, ApiResult<BotActionResponse>>;

    fn stop_bot(&self, pipeline_id: PipelineId) -> BoxFuture<'_, ApiResult<BotActionResponse>>;

    fn delete_bot(&self, pipeline_id: PipelineId) -> BoxFuture<'_, ApiResult<BotActionResponse>>;
}

impl DashboardApi for ApiClient {
    fn resources<'a>(&'a self, names: &'a [String]) -> BoxFuture<'a, ApiResult<Resources>> {
        Box::pin(self.get_resources(names))
    }

    fn trades(&self, page: Option<u32>) -> BoxFuture<'_, ApiResult<Vec<RawTrade>>> {
        Box::pin(self.get_trades(page))
    }

    fn pipelines(&self, page: Option<u32>) -> BoxFuture<'_, ApiResult<Vec<RawPipeline>>> {
        Box::pin(self.get_pipelines(page))
    }

    fn positions(&self, page: Option<u32>) -> BoxFuture<'_, ApiResult<Vec<RawPosition>>> {
        Box::pin(self.get_positions(page))
    }

    fn pipeline_metrics(&self) -> BoxFuture<'_, ApiResult<PipelineMetricsReport>> {
        Box::pin(self.get_pipeline_metrics())
    }

    fn price<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, ApiResult<Decimal>> {
        Box::pin(self.get_price(symbol))
    }

    fn balances(&self) -> BoxFuture<'_, ApiResult<Option<Balances>>> {
        Box::pin(self.get_balances())
    }

    fn start_bot<'a>(
        &'a self,
        request: &'a StartBotRequest,
    ) -> BoxFuture<'a, ApiResult<BotActionResponse>> {
        Box::pin(ApiClient::start_bot(self, request))
    }

    fn stop_bot(&self, pipeline_id: PipelineId) -> BoxFuture<'_, ApiResult<BotActionResponse>> {
        Box::pin(ApiClient::stop_bot(self, pipeline_id))
    }

    fn delete_bot(&self, pipeline_id: PipelineId) -> BoxFuture<'_, ApiResult<BotActionResponse>> {
        Box::pin(ApiClient::delete_bot(self, pipeline_id))
    }
}
