//! Dashboard controller.
//!
//! Drives the backend and feeds results into the store:
//! - `mount`: initial parallel load, then trade polling
//! - `navigate`: switch views, refreshing the view's collection and prices
//! - `start_bot` / `stop_bot` / `delete_bot`: bot actions with banner feedback
//!
//! Refresh failures are logged and the previous state is kept. Bot action
//! failures are surfaced in the banner.

use std::sync::Arc;
use std::time::Duration;

use botdash_api::{ApiError, ApiResult, BotActionResponse, DashboardApi, StartBotRequest};
use botdash_core::{organize_pipeline, organize_positions, organize_trades, PipelineId, PriceMap};
use botdash_telemetry::Metrics;
use futures_util::future::join_all;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::banner::MessageKind;
use crate::config::DashboardConfig;
use crate::event::Event;
use crate::generation::ResourceKind;
use crate::store::DashboardHandle;
use crate::ui::View;

/// Outcome of a price refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceRefresh {
    pub updated: usize,
    /// Symbols whose price request failed.
    pub failed: Vec<String>,
}

/// Local change applied when a bot action succeeds.
#[derive(Debug, Clone, Copy)]
enum OnSuccess {
    UpsertReturned,
    Remove(PipelineId),
}

/// Running trade poller.
struct Poller {
    token: CancellationToken,
    task: JoinHandle<()>,
}

/// Orchestrates fetches and bot actions against a [`DashboardApi`].
///
/// Cheap to clone; clones share the store and the polling slot.
#[derive(Clone)]
pub struct DashboardController {
    api: Arc<dyn DashboardApi>,
    handle: DashboardHandle,
    config: DashboardConfig,
    poller: Arc<Mutex<Option<Poller>>>,
}

impl DashboardController {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        handle: DashboardHandle,
        config: DashboardConfig,
    ) -> Self {
        Self {
            api,
            handle,
            config,
            poller: Arc::new(Mutex::new(None)),
        }
    }

    pub fn handle(&self) -> &DashboardHandle {
        &self.handle
    }

    /// Load everything in parallel, then start polling.
    ///
    /// Returns the failed loads; each one has already been logged and the
    /// state for that resource left as it was.
    pub async fn mount(&self) -> Vec<ApiError> {
        info!("Mounting dashboard");

        let (resources, trades, pipelines, positions, balances, pipeline_metrics) = tokio::join!(
            self.refresh_resources(),
            self.refresh_trades(),
            self.refresh_pipelines(),
            self.refresh_positions(),
            self.refresh_balances(),
            self.refresh_pipeline_metrics(),
        );

        let failures: Vec<ApiError> = [
            resources,
            trades,
            pipelines,
            positions,
            balances,
            pipeline_metrics,
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();

        self.start_polling();
        failures
    }

    /// (Re)start the trade poller, replacing any running one.
    ///
    /// The first refetch happens one full interval after start.
    pub fn start_polling(&self) {
        let period = Duration::from_secs(self.config.poll_interval_secs);
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let controller = self.clone();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval.tick().await;

            loop {
                tokio::select! {
                    () = cancelled.cancelled() => {
                        debug!("Trade polling cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        Metrics::poll_tick();
                        let _ = controller.refresh_trades().await;
                    }
                }
            }
        });

        let previous = self.poller.lock().replace(Poller { token, task });
        if let Some(previous) = previous {
            previous.token.cancel();
        }
        info!(interval_secs = period.as_secs(), "Trade polling started");
    }

    pub fn is_polling(&self) -> bool {
        self.poller
            .lock()
            .as_ref()
            .map_or(false, |poller| !poller.task.is_finished())
    }

    /// Stop polling and wait for the poller to exit.
    pub async fn shutdown(&self) {
        let poller = self.poller.lock().take();
        if let Some(poller) = poller {
            poller.token.cancel();
            let _ = poller.task.await;
            info!("Trade polling stopped");
        }
    }

    /// Switch view. Collection views refetch their collection and prices.
    pub async fn navigate(&self, view: View) {
        self.handle.dispatch(Event::Navigated(view)).await;
        if !view.has_collection() {
            return;
        }

        let collection = async {
            match view {
                View::Trades => self.refresh_trades().await,
                View::Pipelines => self.refresh_pipelines().await,
                View::Positions => self.refresh_positions().await,
                View::Dashboard => Ok(()),
            }
        };
        let _ = tokio::join!(collection, self.refresh_prices());
    }

    // === Refresh paths (log and keep stale) ===

    pub async fn refresh_resources(&self) -> ApiResult<()> {
        let generation = self.handle.generations().issue(ResourceKind::Resources);
        let resources = self
            .api
            .resources(&self.config.reference_resources)
            .await
            .map_err(|e| keep_stale(ResourceKind::Resources, e))?;
        self.handle
            .dispatch(Event::ResourcesLoaded {
                generation,
                resources,
            })
            .await;
        Ok(())
    }

    /// Refetch the first trades page.
    pub async fn refresh_trades(&self) -> ApiResult<()> {
        self.fetch_trades(None).await.map(|_| ())
    }

    /// Fetch one trades page and merge it.
    ///
    /// Pages share the trades generation with the poller, so a refresh issued
    /// while the page is in flight supersedes it. Returns whether the page
    /// was merged.
    pub async fn load_trades_page(&self, page: u32) -> ApiResult<bool> {
        self.fetch_trades(Some(page)).await
    }

    async fn fetch_trades(&self, page: Option<u32>) -> ApiResult<bool> {
        let generation = self.handle.generations().issue(ResourceKind::Trades);
        let raw = self
            .api
            .trades(page)
            .await
            .map_err(|e| keep_stale(ResourceKind::Trades, e))?;
        let trades = organize_trades(raw);
        debug!(count = trades.len(), ?page, generation, "Trades fetched");
        let applied = self
            .handle
            .dispatch_acked(Event::TradesLoaded { generation, trades })
            .await;
        if !applied {
            debug!(?page, generation, "Trades response superseded");
        }
        Ok(applied)
    }

    pub async fn refresh_pipelines(&self) -> ApiResult<()> {
        let generation = self.handle.generations().issue(ResourceKind::Pipelines);
        let raw = self
            .api
            .pipelines(None)
            .await
            .map_err(|e| keep_stale(ResourceKind::Pipelines, e))?;
        let pipelines: Vec<_> = raw.into_iter().map(organize_pipeline).collect();
        debug!(count = pipelines.len(), generation, "Pipelines fetched");
        self.handle
            .dispatch(Event::PipelinesLoaded {
                generation,
                pipelines,
            })
            .await;
        Ok(())
    }

    pub async fn refresh_positions(&self) -> ApiResult<()> {
        let generation = self.handle.generations().issue(ResourceKind::Positions);
        let raw = self
            .api
            .positions(None)
            .await
            .map_err(|e| keep_stale(ResourceKind::Positions, e))?;
        let positions = organize_positions(raw);
        debug!(count = positions.len(), generation, "Positions fetched");
        self.handle
            .dispatch(Event::PositionsLoaded {
                generation,
                positions,
            })
            .await;
        Ok(())
    }

    /// `Ok` without a state change when the backend had no balance data.
    pub async fn refresh_balances(&self) -> ApiResult<()> {
        let generation = self.handle.generations().issue(ResourceKind::Balances);
        let balances = self
            .api
            .balances()
            .await
            .map_err(|e| keep_stale(ResourceKind::Balances, e))?;
        match balances {
            Some(balances) => {
                self.handle
                    .dispatch(Event::BalancesLoaded {
                        generation,
                        balances,
                    })
                    .await;
            }
            None => debug!("No balance data, keeping previous balances"),
        }
        Ok(())
    }

    pub async fn refresh_pipeline_metrics(&self) -> ApiResult<()> {
        let generation = self
            .handle
            .generations()
            .issue(ResourceKind::PipelineMetrics);
        let report = self
            .api
            .pipeline_metrics()
            .await
            .map_err(|e| keep_stale(ResourceKind::PipelineMetrics, e))?;
        self.handle
            .dispatch(Event::PipelineMetricsLoaded { generation, report })
            .await;
        Ok(())
    }

    /// Fetch the price of every known symbol in parallel.
    ///
    /// Symbols are read after everything dispatched so far has been applied.
    /// All requests run to completion; the successful ones are merged even
    /// if others fail.
    pub async fn refresh_prices(&self) -> PriceRefresh {
        self.handle.flush().await;
        let symbols = self.handle.snapshot().known_symbols();
        if symbols.is_empty() {
            return PriceRefresh::default();
        }

        let generation = self.handle.generations().issue(ResourceKind::Prices);
        let api = &self.api;
        let results = join_all(symbols.iter().map(|symbol| async move {
            (symbol, api.price(symbol).await)
        }))
        .await;

        let mut prices = PriceMap::new();
        let mut failed = Vec::new();
        for (symbol, result) in results {
            match result {
                Ok(price) => {
                    prices.insert(symbol.clone(), price);
                }
                Err(e) => {
                    warn!(%symbol, error = %e, "Price fetch failed, keeping previous price");
                    failed.push(symbol.clone());
                }
            }
        }

        let updated = prices.len();
        if updated > 0 {
            self.handle
                .dispatch(Event::PricesLoaded { generation, prices })
                .await;
        }
        debug!(updated, failed = failed.len(), "Prices refreshed");
        PriceRefresh { updated, failed }
    }

    // === Bot actions (surface in banner) ===

    /// Validate and start a new pipeline.
    pub async fn start_bot(&self, request: StartBotRequest) -> ApiResult<BotActionResponse> {
        if let Err(e) = request.validate() {
            warn!(error = %e, "Start bot request rejected");
            Metrics::bot_action("start", e.outcome());
            self.handle.show_message(e.to_string(), MessageKind::Error).await;
            return Err(e);
        }

        info!(symbol = %request.symbol, strategy = %request.strategy, "Starting bot");
        let result = self.api.start_bot(&request).await;
        self.finish_action("start", result, OnSuccess::UpsertReturned)
            .await
    }

    pub async fn stop_bot(&self, pipeline_id: PipelineId) -> ApiResult<BotActionResponse> {
        info!(%pipeline_id, "Stopping bot");
        let result = self.api.stop_bot(pipeline_id).await;
        self.finish_action("stop", result, OnSuccess::UpsertReturned)
            .await
    }

    pub async fn delete_bot(&self, pipeline_id: PipelineId) -> ApiResult<BotActionResponse> {
        info!(%pipeline_id, "Deleting bot");
        let result = self.api.delete_bot(pipeline_id).await;
        self.finish_action("delete", result, OnSuccess::Remove(pipeline_id))
            .await
    }

    async fn finish_action(
        &self,
        action: &'static str,
        result: ApiResult<BotActionResponse>,
        on_success: OnSuccess,
    ) -> ApiResult<BotActionResponse> {
        match result {
            Ok(response) if response.success => {
                let patch = match on_success {
                    OnSuccess::UpsertReturned => response
                        .pipeline
                        .clone()
                        .map(|raw| Event::PipelineUpserted(organize_pipeline(raw))),
                    OnSuccess::Remove(id) => Some(Event::PipelineRemoved(id)),
                };
                if let Some(event) = patch {
                    self.handle.dispatch(event).await;
                }

                Metrics::bot_action(action, "success");
                info!(action, message = %response.message, "Bot action succeeded");
                let text = if response.message.is_empty() {
                    format!("Bot {action} succeeded")
                } else {
                    response.message.clone()
                };
                self.handle.show_message(text, MessageKind::Success).await;
                Ok(response)
            }
            Ok(response) => {
                Metrics::bot_action(action, "rejected");
                warn!(action, message = %response.message, "Bot action rejected by server");
                let text = if response.message.is_empty() {
                    format!("Bot {action} failed")
                } else {
                    response.message.clone()
                };
                self.handle.show_message(text, MessageKind::Error).await;
                Ok(response)
            }
            Err(e) => {
                Metrics::bot_action(action, e.outcome());
                warn!(action, error = %e, "Bot action failed");
                self.handle.show_message(e.to_string(), MessageKind::Error).await;
                Err(e)
            }
        }
    }
}

fn keep_stale(kind: ResourceKind, error: ApiError) -> ApiError {
    warn!(
        resource = kind.as_str(),
        error = %error,
        "Refresh failed, keeping previous state"
    );
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::BannerPhase;
    use crate::store::spawn_dashboard_store;
    use botdash_api::{BoxFuture, PipelineMetricsReport, Resources};
    use botdash_core::{Balances, RawPipeline, RawPosition, RawTrade, Side, TradeId};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn raw_trade(id: u64, pipeline: u64) -> RawTrade {
        RawTrade {
            id: TradeId::new(id),
            pipeline_id: PipelineId::new(pipeline),
            symbol: "BTCUSDT".to_string(),
            side: Side::Long,
            amount: dec!(1),
            open_price: dec!(100),
            open_time: Some("2024-01-01T00:00:00Z".to_string()),
            close_time: Some("2024-01-01T01:00:00Z".to_string()),
            profit_loss_pct: Some(dec!(2)),
        }
    }

    fn raw_pipeline(id: u64, symbol: &str) -> RawPipeline {
        RawPipeline {
            id: PipelineId::new(id),
            symbol: symbol.to_string(),
            strategy: "MovingAverage".to_string(),
            candle_size: "1h".to_string(),
            exchange: "binance".to_string(),
            active: true,
            paper_trading: false,
            params: serde_json::Map::new(),
            number_trades: 0,
            current_equity: dec!(50),
            open_time: None,
            leverage: Some(1),
            color: None,
            allocation: None,
        }
    }

    fn raw_position(id: u64, pipeline: u64, symbol: &str) -> RawPosition {
        RawPosition {
            id: botdash_core::PositionId::new(id),
            symbol: symbol.to_string(),
            pipeline_id: PipelineId::new(pipeline),
            exchange: "binance".to_string(),
            side: Side::Long,
            amount: dec!(1),
            price: dec!(10),
            open_time: None,
            close_time: None,
            paper_trading: false,
            open: true,
        }
    }

    fn not_found(resource: &str) -> ApiError {
        ApiError::Status {
            resource: resource.to_string(),
            status: 404,
            message: "not found".to_string(),
        }
    }

    /// In-memory backend.
    #[derive(Default)]
    struct FakeApi {
        /// Trades per page; missing pages fail.
        trade_pages: HashMap<Option<u32>, Vec<RawTrade>>,
        /// Artificial latency per page.
        trade_delays: HashMap<Option<u32>, Duration>,
        pipelines: Vec<RawPipeline>,
        positions: Vec<RawPosition>,
        prices: HashMap<String, Decimal>,
        balances: Option<Balances>,
        fail_pipelines: bool,
        action_response: Option<BotActionResponse>,
        trade_calls: AtomicUsize,
        start_calls: AtomicUsize,
        deleted: Mutex<Vec<PipelineId>>,
    }

    impl FakeApi {
        fn action(&self) -> ApiResult<BotActionResponse> {
            self.action_response
                .clone()
                .ok_or_else(|| not_found("bot action"))
        }
    }

    impl DashboardApi for FakeApi {
        fn resources<'a>(&'a self, names: &'a [String]) -> BoxFuture<'a, ApiResult<Resources>> {
            Box::pin(async move {
                let mut map = serde_json::Map::new();
                for name in names {
                    map.insert(name.clone(), serde_json::json!([]));
                }
                Ok(Resources(map))
            })
        }

        fn trades(&self, page: Option<u32>) -> BoxFuture<'_, ApiResult<Vec<RawTrade>>> {
            Box::pin(async move {
                self.trade_calls.fetch_add(1, Ordering::SeqCst);
                if let Some(delay) = self.trade_delays.get(&page) {
                    tokio::time::sleep(*delay).await;
                }
                self.trade_pages
                    .get(&page)
                    .cloned()
                    .ok_or_else(|| not_found("trades"))
            })
        }

        fn pipelines(&self, _page: Option<u32>) -> BoxFuture<'_, ApiResult<Vec<RawPipeline>>> {
            Box::pin(async move {
                if self.fail_pipelines {
                    return Err(ApiError::Transport {
                        resource: "pipelines".to_string(),
                        message: "connection refused".to_string(),
                    });
                }
                Ok(self.pipelines.clone())
            })
        }

        fn positions(&self, _page: Option<u32>) -> BoxFuture<'_, ApiResult<Vec<RawPosition>>> {
            Box::pin(async move { Ok(self.positions.clone()) })
        }

        fn pipeline_metrics(&self) -> BoxFuture<'_, ApiResult<PipelineMetricsReport>> {
            Box::pin(async move { Ok(PipelineMetricsReport::default()) })
        }

        fn price<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, ApiResult<Decimal>> {
            Box::pin(async move {
                self.prices
                    .get(symbol)
                    .copied()
                    .ok_or_else(|| not_found("price"))
            })
        }

        fn balances(&self) -> BoxFuture<'_, ApiResult<Option<Balances>>> {
            Box::pin(async move { Ok(self.balances.clone()) })
        }

        fn start_bot<'a>(
            &'a self,
            _request: &'a StartBotRequest,
        ) -> BoxFuture<'a, ApiResult<BotActionResponse>> {
            Box::pin(async move {
                self.start_calls.fetch_add(1, Ordering::SeqCst);
                self.action()
            })
        }

        fn stop_bot(
            &self,
            _pipeline_id: PipelineId,
        ) -> BoxFuture<'_, ApiResult<BotActionResponse>> {
            Box::pin(async move { self.action() })
        }

        fn delete_bot(
            &self,
            pipeline_id: PipelineId,
        ) -> BoxFuture<'_, ApiResult<BotActionResponse>> {
            Box::pin(async move {
                self.deleted.lock().push(pipeline_id);
                self.action()
            })
        }
    }

    fn controller(api: FakeApi) -> (DashboardController, Arc<FakeApi>) {
        let api = Arc::new(api);
        let config = DashboardConfig::default();
        let (handle, _task) = spawn_dashboard_store(&config);
        let gateway: Arc<dyn DashboardApi> = api.clone();
        (DashboardController::new(gateway, handle, config), api)
    }

    fn populated() -> FakeApi {
        FakeApi {
            trade_pages: HashMap::from([
                (None, vec![raw_trade(1, 1), raw_trade(2, 2)]),
                (Some(2), vec![raw_trade(3, 1)]),
            ]),
            pipelines: vec![raw_pipeline(1, "BTCUSDT"), raw_pipeline(2, "ETHUSDT")],
            positions: vec![raw_position(1, 1, "BTCUSDT")],
            prices: HashMap::from([("BTCUSDT".to_string(), dec!(12))]),
            ..FakeApi::default()
        }
    }

    fn start_request() -> StartBotRequest {
        StartBotRequest {
            symbol: "SOLUSDT".to_string(),
            strategy: "MovingAverage".to_string(),
            candle_size: "1h".to_string(),
            exchanges: "binance".to_string(),
            params: serde_json::Map::new(),
            paper_trading: true,
            leverage: 1,
            color: None,
            allocation: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_loads_everything_and_starts_polling() {
        let (controller, _api) = controller(populated());

        let failures = controller.mount().await;
        controller.handle().flush().await;

        assert!(failures.is_empty());
        let state = controller.handle().snapshot();
        assert_eq!(state.trades.len(), 2);
        assert_eq!(state.pipelines.len(), 2);
        assert_eq!(state.positions.len(), 1);
        assert_eq!(state.resources.get("symbols"), Some(&serde_json::json!([])));
        assert_eq!(state.metrics.trades.number_trades, 2);
        assert_eq!(state.metrics.pipelines.total_pipelines, 2);
        assert_eq!(state.metrics.available_balance, None);
        assert!(controller.is_polling());

        controller.shutdown().await;
        assert!(!controller.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_keeps_going_when_one_fetch_fails() {
        let (controller, _api) = controller(FakeApi {
            fail_pipelines: true,
            ..populated()
        });

        let failures = controller.mount().await;
        controller.handle().flush().await;

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].outcome(), "transport");
        let state = controller.handle().snapshot();
        assert!(state.pipelines.is_empty());
        assert_eq!(state.trades.len(), 2);

        controller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_refetches_trades_each_interval_until_shutdown() {
        let (controller, api) = controller(populated());

        controller.mount().await;
        assert_eq!(api.trade_calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(api.trade_calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(api.trade_calls.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(api.trade_calls.load(Ordering::SeqCst), 3);

        controller.shutdown().await;
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(api.trade_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restarting_polling_replaces_previous_poller() {
        let (controller, api) = controller(populated());

        controller.start_polling();
        controller.start_polling();
        tokio::time::sleep(Duration::from_secs(61)).await;

        assert_eq!(api.trade_calls.load(Ordering::SeqCst), 1);
        controller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_trades_page_is_discarded() {
        let mut api = populated();
        api.trade_delays = HashMap::from([
            (None, Duration::from_millis(10)),
            (Some(2), Duration::from_millis(500)),
        ]);
        let (controller, _api) = controller(api);

        let (page, refresh) =
            tokio::join!(controller.load_trades_page(2), controller.refresh_trades());
        controller.handle().flush().await;

        assert!(!page.unwrap());
        assert!(refresh.is_ok());
        let ids: Vec<u64> = controller
            .handle()
            .snapshot()
            .trades
            .keys()
            .map(|id| id.value())
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_first_page_refresh_is_discarded() {
        let mut api = populated();
        api.trade_delays = HashMap::from([
            (None, Duration::from_millis(500)),
            (Some(2), Duration::from_millis(10)),
        ]);
        let (controller, _api) = controller(api);

        let (first, second) =
            tokio::join!(controller.refresh_trades(), controller.load_trades_page(2));
        controller.handle().flush().await;

        assert!(first.is_ok());
        assert!(second.unwrap());
        let ids: Vec<u64> = controller
            .handle()
            .snapshot()
            .trades
            .keys()
            .map(|id| id.value())
            .collect();
        assert_eq!(ids, vec![3]);
    }

    #[tokio::test]
    async fn test_load_trades_page_merges() {
        let (controller, _api) = controller(populated());

        controller.refresh_trades().await.unwrap();
        assert!(controller.load_trades_page(2).await.unwrap());
        controller.handle().flush().await;

        assert_eq!(controller.handle().snapshot().trades.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_state() {
        let (controller, _api) = controller(populated());

        controller.refresh_trades().await.unwrap();
        let err = controller.load_trades_page(9).await.unwrap_err();
        controller.handle().flush().await;

        assert_eq!(err.status(), Some(404));
        assert_eq!(controller.handle().snapshot().trades.len(), 2);
    }

    #[tokio::test]
    async fn test_price_refresh_merges_successes_despite_failures() {
        let (controller, _api) = controller(populated());

        controller.refresh_pipelines().await.unwrap();
        controller.refresh_positions().await.unwrap();
        controller.handle().flush().await;

        let outcome = controller.refresh_prices().await;
        controller.handle().flush().await;

        assert_eq!(outcome.updated, 1);
        assert_eq!(outcome.failed, vec!["ETHUSDT".to_string()]);
        let state = controller.handle().snapshot();
        assert_eq!(state.prices.get("BTCUSDT"), Some(&dec!(12)));
        assert!(!state.prices.contains_key("ETHUSDT"));
        assert_eq!(state.metrics.positions.total_equity_positions, dec!(12));
    }

    #[tokio::test]
    async fn test_price_refresh_without_symbols_sends_nothing() {
        let (controller, _api) = controller(populated());

        let outcome = controller.refresh_prices().await;

        assert_eq!(outcome, PriceRefresh::default());
        assert_eq!(
            controller
                .handle()
                .generations()
                .latest(ResourceKind::Prices),
            0
        );
    }

    #[tokio::test]
    async fn test_navigate_refreshes_collection_and_prices() {
        let (controller, _api) = controller(populated());

        controller.refresh_positions().await.unwrap();
        controller.handle().flush().await;
        controller.navigate(View::Positions).await;
        controller.handle().flush().await;

        let state = controller.handle().snapshot();
        assert_eq!(state.ui.active_view, View::Positions);
        assert_eq!(state.prices.get("BTCUSDT"), Some(&dec!(12)));
        let generations = controller.handle().generations();
        assert_eq!(generations.latest(ResourceKind::Positions), 2);
        assert_eq!(generations.latest(ResourceKind::Trades), 0);
    }

    #[tokio::test]
    async fn test_navigate_to_dashboard_fetches_nothing() {
        let (controller, api) = controller(populated());

        controller.navigate(View::Dashboard).await;
        controller.handle().flush().await;

        assert_eq!(controller.handle().snapshot().ui.active_view, View::Dashboard);
        assert_eq!(api.trade_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_bot_success_upserts_returned_pipeline() {
        let (controller, _api) = controller(FakeApi {
            action_response: Some(BotActionResponse {
                success: true,
                message: "Bot started".to_string(),
                pipeline: Some(raw_pipeline(5, "SOLUSDT")),
            }),
            ..populated()
        });

        let response = controller.start_bot(start_request()).await.unwrap();
        controller.handle().flush().await;

        assert!(response.success);
        let state = controller.handle().snapshot();
        assert!(state.pipelines.contains_key(&PipelineId::new(5)));
        let banner = state.banner.clone().unwrap();
        assert_eq!(banner.text, "Bot started");
        assert_eq!(banner.kind, MessageKind::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_bot_rejected_leaves_pipelines_unchanged() {
        let (controller, _api) = controller(FakeApi {
            action_response: Some(BotActionResponse {
                success: false,
                message: "insufficient margin".to_string(),
                pipeline: None,
            }),
            ..populated()
        });
        controller.refresh_pipelines().await.unwrap();
        controller.handle().flush().await;
        let before = controller.handle().snapshot().pipelines.clone();

        let response = controller.start_bot(start_request()).await.unwrap();
        controller.handle().flush().await;

        assert!(!response.success);
        let state = controller.handle().snapshot();
        assert_eq!(state.pipelines, before);
        let banner = state.banner.clone().unwrap();
        assert_eq!(banner.text, "insufficient margin");
        assert_eq!(banner.kind, MessageKind::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_start_request_is_not_sent() {
        let (controller, api) = controller(populated());

        let mut request = start_request();
        request.strategy = String::new();
        let err = controller.start_bot(request).await.unwrap_err();
        controller.handle().flush().await;

        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(api.start_calls.load(Ordering::SeqCst), 0);
        let banner = controller.handle().snapshot().banner.clone().unwrap();
        assert_eq!(banner.text, "Invalid bot parameters: missing strategy");
        assert_eq!(banner.kind, MessageKind::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_bot_removes_target_pipeline() {
        let (controller, api) = controller(FakeApi {
            action_response: Some(BotActionResponse {
                success: true,
                message: "Pipeline deleted".to_string(),
                pipeline: None,
            }),
            ..populated()
        });
        controller.refresh_pipelines().await.unwrap();

        controller.delete_bot(PipelineId::new(2)).await.unwrap();
        controller.handle().flush().await;

        assert_eq!(*api.deleted.lock(), vec![PipelineId::new(2)]);
        let ids: Vec<u64> = controller
            .handle()
            .snapshot()
            .pipelines
            .keys()
            .map(|id| id.value())
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_stop_surfaces_error_in_banner() {
        let (controller, _api) = controller(populated());

        let err = controller.stop_bot(PipelineId::new(1)).await.unwrap_err();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let banner = controller.handle().snapshot().banner.clone().unwrap();
        assert_eq!(banner.text, err.to_string());
        assert_eq!(banner.kind, MessageKind::Error);
        assert_eq!(banner.phase, BannerPhase::Visible);
    }
}
