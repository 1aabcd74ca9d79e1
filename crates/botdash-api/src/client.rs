//! HTTP client for the data and execution APIs.

use std::time::{Duration, Instant};

use botdash_core::{Balances, PipelineId, RawPipeline, RawPosition, RawTrade};
use botdash_telemetry::Metrics;
use reqwest::{Client, RequestBuilder, Response};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::{ApiConfig, BalanceFetchMode};
use crate::error::{ApiError, ApiResult};
use crate::types::{
    BotActionResponse, PipelineMetricsReport, PriceResponse, Resources, StartBotRequest,
    StopBotRequest,
};

/// Client for both backend hosts.
///
/// No authentication headers are attached.
pub struct ApiClient {
    /// HTTP client.
    client: Client,
    /// Data API base URL, without trailing slash.
    data_url: String,
    /// Execution API base URL, without trailing slash.
    execution_url: String,
    balance_mode: BalanceFetchMode,
}

impl ApiClient {
    /// Create a new client.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            data_url: config.data_api_url.trim_end_matches('/').to_string(),
            execution_url: config.execution_api_url.trim_end_matches('/').to_string(),
            balance_mode: config.balance_fetch_mode,
        })
    }

    fn data(&self, path: &str) -> String {
        format!("{}{}", self.data_url, path)
    }

    fn execution(&self, path: &str) -> String {
        format!("{}{}", self.execution_url, path)
    }

    /// `/{resource}` or `/{resource}/{page}`.
    fn paged(&self, resource: &str, page: Option<u32>) -> String {
        match page {
            Some(page) => self.data(&format!("/{resource}/{page}")),
            None => self.data(&format!("/{resource}")),
        }
    }

    /// Send a request, turning status >= 400 into [`ApiError::Status`].
    async fn send(&self, resource: &str, request: RequestBuilder) -> ApiResult<Response> {
        let started = Instant::now();
        let elapsed_ms = || started.elapsed().as_secs_f64() * 1000.0;

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                Metrics::api_request(resource, "transport", elapsed_ms());
                return Err(ApiError::Transport {
                    resource: resource.to_string(),
                    message: e.to_string(),
                });
            }
        };

        let status = response.status();
        if status.as_u16() >= 400 {
            Metrics::api_request(resource, "http_error", elapsed_ms());
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                resource: resource.to_string(),
                status: status.as_u16(),
                message: server_message(&body),
            });
        }

        Metrics::api_request(resource, "ok", elapsed_ms());
        debug!(resource, status = status.as_u16(), "API request succeeded");
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(resource: &str, response: Response) -> ApiResult<T> {
        response.json::<T>().await.map_err(|e| ApiError::Decode {
            resource: resource.to_string(),
            message: e.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, resource: &str, url: String) -> ApiResult<T> {
        let response = self.send(resource, self.client.get(url)).await?;
        Self::decode(resource, response).await
    }

    /// Fetch a collection answered as `{"<resource>": [...]}` or a bare array.
    async fn get_collection<T: DeserializeOwned>(
        &self,
        resource: &str,
        page: Option<u32>,
    ) -> ApiResult<Vec<T>> {
        let body: serde_json::Value = self.get_json(resource, self.paged(resource, page)).await?;
        extract_collection(resource, body)
    }

    /// `GET /resources/{csv}`.
    pub async fn get_resources(&self, names: &[String]) -> ApiResult<Resources> {
        let url = self.data(&format!("/resources/{}", names.join(",")));
        self.get_json("resources", url).await
    }

    /// `GET /trades[/{page}]`.
    pub async fn get_trades(&self, page: Option<u32>) -> ApiResult<Vec<RawTrade>> {
        self.get_collection("trades", page).await
    }

    /// `GET /pipelines[/{page}]`.
    pub async fn get_pipelines(&self, page: Option<u32>) -> ApiResult<Vec<RawPipeline>> {
        self.get_collection("pipelines", page).await
    }

    /// `GET /positions[/{page}]`.
    pub async fn get_positions(&self, page: Option<u32>) -> ApiResult<Vec<RawPosition>> {
        self.get_collection("positions", page).await
    }

    /// `GET /pipelines_metrics`.
    pub async fn get_pipeline_metrics(&self) -> ApiResult<PipelineMetricsReport> {
        self.get_json("pipeline metrics", self.data("/pipelines_metrics"))
            .await
    }

    /// `GET /prices?symbol={symbol}` on the execution API.
    pub async fn get_price(&self, symbol: &str) -> ApiResult<Decimal> {
        let request = self
            .client
            .get(self.execution("/prices"))
            .query(&[("symbol", symbol)]);
        let response = self.send("price", request).await?;
        let price: PriceResponse = Self::decode("price", response).await?;
        debug!(symbol, price = %price.price, "Price fetched");
        Ok(price.price)
    }

    /// `GET /futures_account_balance` on the execution API.
    ///
    /// In [`BalanceFetchMode::Tolerant`] an HTTP failure resolves to
    /// `Ok(None)`; transport and decode failures still raise.
    pub async fn get_balances(&self) -> ApiResult<Option<Balances>> {
        let result = self
            .get_json::<Balances>("balances", self.execution("/futures_account_balance"))
            .await;

        match (result, self.balance_mode) {
            (Ok(balances), _) => Ok(Some(balances)),
            (Err(ApiError::Status { status, message, .. }), BalanceFetchMode::Tolerant) => {
                warn!(status, %message, "Balance fetch failed, treating as no data");
                Ok(None)
            }
            (Err(e), _) => Err(e),
        }
    }

    /// `PUT /start_bot`.
    pub async fn start_bot(&self, request: &StartBotRequest) -> ApiResult<BotActionResponse> {
        request.validate()?;
        let response = self
            .send("start bot", self.client.put(self.data("/start_bot")).json(request))
            .await?;
        Self::decode("start bot", response).await
    }

    /// `PUT /stop_bot`.
    pub async fn stop_bot(&self, pipeline_id: PipelineId) -> ApiResult<BotActionResponse> {
        let body = StopBotRequest { pipeline_id };
        let response = self
            .send("stop bot", self.client.put(self.data("/stop_bot")).json(&body))
            .await?;
        Self::decode("stop bot", response).await
    }

    /// `DELETE /pipelines?pipelineId={id}`.
    pub async fn delete_bot(&self, pipeline_id: PipelineId) -> ApiResult<BotActionResponse> {
        let request = self
            .client
            .delete(self.data("/pipelines"))
            .query(&[("pipelineId", pipeline_id.value())]);
        let response = self.send("delete bot", request).await?;
        Self::decode("delete bot", response).await
    }
}

/// Pull a record list out of `{"<resource>": [...]}` or a bare array.
fn extract_collection<T: DeserializeOwned>(
    resource: &str,
    body: serde_json::Value,
) -> ApiResult<Vec<T>> {
    let list = match body {
        serde_json::Value::Array(items) => serde_json::Value::Array(items),
        serde_json::Value::Object(mut map) => {
            map.remove(resource).ok_or_else(|| ApiError::Decode {
                resource: resource.to_string(),
                message: format!("missing \"{resource}\" field"),
            })?
        }
        other => {
            return Err(ApiError::Decode {
                resource: resource.to_string(),
                message: format!("expected array or object, got {other}"),
            })
        }
    };

    serde_json::from_value(list).map_err(|e| ApiError::Decode {
        resource: resource.to_string(),
        message: e.to_string(),
    })
}

/// Prefer the `message` of an error envelope over the raw body.
fn server_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
