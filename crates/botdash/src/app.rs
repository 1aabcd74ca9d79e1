//! Application wiring.

use std::io::Write;
use std::sync::Arc;

use botdash_api::{ApiClient, BotActionResponse, DashboardApi, StartBotRequest};
use botdash_core::{PipelineId, PriceMap};
use botdash_dashboard::{
    spawn_dashboard_store, DashboardController, DashboardState, DerivedMetrics, MessageBanner,
    View,
};
use botdash_telemetry::Metrics;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::cli::Command;
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

/// Flattened view-model printed by `snapshot` and logged by `watch`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSummary {
    pub active_view: View,
    pub trades: usize,
    pub pipelines: usize,
    pub open_positions: usize,
    /// Percent of closed trades with a non-negative result.
    pub win_rate: Option<f64>,
    pub avg_trade_duration_ms: Option<f64>,
    pub positions_pnl_pct: Option<Decimal>,
    pub prices: PriceMap,
    pub metrics: DerivedMetrics,
    pub banner: Option<MessageBanner>,
}

impl ViewSummary {
    pub fn from_state(state: &DashboardState) -> Self {
        Self {
            active_view: state.ui.active_view,
            trades: state.trades.len(),
            pipelines: state.pipelines.len(),
            open_positions: state.open_positions().count(),
            win_rate: state.metrics.trades.win_rate(),
            avg_trade_duration_ms: state.metrics.trades.avg_trade_duration(),
            positions_pnl_pct: state.metrics.positions.pnl_pct(),
            prices: state.prices.clone(),
            metrics: state.metrics.clone(),
            banner: state.banner.clone().filter(MessageBanner::is_displayed),
        }
    }
}

/// Main application.
pub struct Application {
    controller: DashboardController,
    store_task: JoinHandle<()>,
}

impl Application {
    /// Create the HTTP client, the store and the controller.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let api: Arc<dyn DashboardApi> = Arc::new(ApiClient::new(&config.api)?);
        info!(
            data_api = %config.api.data_api_url,
            execution_api = %config.api.execution_api_url,
            balance_mode = ?config.api.balance_fetch_mode,
            "API client created"
        );
        Ok(Self::with_api(config, api))
    }

    /// Wire the application against any backend.
    pub fn with_api(config: AppConfig, api: Arc<dyn DashboardApi>) -> Self {
        let (handle, store_task) = spawn_dashboard_store(&config.dashboard);
        let controller = DashboardController::new(api, handle, config.dashboard);
        Self {
            controller,
            store_task,
        }
    }

    pub fn controller(&self) -> &DashboardController {
        &self.controller
    }

    /// Run one CLI command, writing its output to `out`.
    pub async fn run<W: Write>(self, command: Command, out: &mut W) -> AppResult<()> {
        match command {
            Command::Watch => self.watch().await?,
            Command::Snapshot { metrics } => {
                let summary = self.snapshot().await?;
                serde_json::to_writer_pretty(&mut *out, &summary)?;
                writeln!(out)?;
                if metrics {
                    out.write_all(Metrics::render()?.as_bytes())?;
                }
            }
            Command::StartBot(args) => {
                let response = self.start_bot(args.into_request()).await?;
                writeln!(out, "{}", response.message)?;
            }
            Command::StopBot { pipeline_id } => {
                let response = self.stop_bot(PipelineId::new(pipeline_id)).await?;
                writeln!(out, "{}", response.message)?;
            }
            Command::DeleteBot { pipeline_id } => {
                let response = self.delete_bot(PipelineId::new(pipeline_id)).await?;
                writeln!(out, "{}", response.message)?;
            }
        }
        out.flush()?;
        Ok(())
    }

    /// Mount, poll and log view-model changes until Ctrl-C.
    pub async fn watch(self) -> AppResult<()> {
        self.load().await;

        let mut updates = self.controller.handle().subscribe();
        let mut last = ViewSummary::from_state(&updates.borrow_and_update());
        log_summary(&last);

        loop {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        warn!("Dashboard store stopped");
                        break;
                    }
                    let summary = ViewSummary::from_state(&updates.borrow_and_update());
                    if summary != last {
                        log_summary(&summary);
                        last = summary;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        self.close().await;
        Ok(())
    }

    /// Mount once and return the view-model.
    pub async fn snapshot(self) -> AppResult<ViewSummary> {
        self.load().await;
        self.controller.handle().flush().await;
        let summary = ViewSummary::from_state(&self.controller.handle().snapshot());
        self.close().await;
        Ok(summary)
    }

    pub async fn start_bot(self, request: StartBotRequest) -> AppResult<BotActionResponse> {
        let result = self.controller.start_bot(request).await;
        self.finish_action("start bot", result).await
    }

    pub async fn stop_bot(self, pipeline_id: PipelineId) -> AppResult<BotActionResponse> {
        let result = self.controller.stop_bot(pipeline_id).await;
        self.finish_action("stop bot", result).await
    }

    pub async fn delete_bot(self, pipeline_id: PipelineId) -> AppResult<BotActionResponse> {
        let result = self.controller.delete_bot(pipeline_id).await;
        self.finish_action("delete bot", result).await
    }

    async fn finish_action(
        self,
        action: &'static str,
        result: botdash_api::ApiResult<BotActionResponse>,
    ) -> AppResult<BotActionResponse> {
        self.close().await;
        let response = result?;
        if !response.success {
            return Err(AppError::Rejected {
                action,
                message: response.message,
            });
        }
        Ok(response)
    }

    /// Initial load plus a first price refresh for the positions view.
    async fn load(&self) {
        let failures = self.controller.mount().await;
        for failure in &failures {
            error!(error = %failure, "Initial load incomplete");
        }

        let prices = self.controller.refresh_prices().await;
        if !prices.failed.is_empty() {
            warn!(failed = ?prices.failed, "Some prices unavailable");
        }
    }

    async fn close(self) {
        self.controller.shutdown().await;
        self.controller.handle().shutdown().await;
        if let Err(e) = self.store_task.await {
            warn!(error = %e, "Dashboard store task failed");
        }
    }
}

fn log_summary(summary: &ViewSummary) {
    info!(
        view = summary.active_view.as_str(),
        trades = summary.trades,
        pipelines = summary.pipelines,
        open_positions = summary.open_positions,
        win_rate = ?summary.win_rate,
        positions_pnl_pct = ?summary.positions_pnl_pct,
        available_balance = ?summary.metrics.available_balance,
        "Dashboard updated"
    );
    if let Some(banner) = &summary.banner {
        info!(kind = ?banner.kind, text = %banner.text, "Message");
    }
}
