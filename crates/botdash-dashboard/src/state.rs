//! Dashboard state and its transition function.

use std::collections::{BTreeMap, BTreeSet};

use botdash_api::{PipelineMetricsReport, Resources};
use botdash_core::{
    Balances, Pipeline, PipelineId, Position, PositionId, PriceMap, Trade, TradeId,
};
use botdash_stats::{
    AvailableBalance, AvailableBalanceReducer, PipelinesMetrics, PipelinesReducer,
    PositionsMetrics, PositionsReducer, Reducer, TradesMetrics, TradesReducer,
};
use serde::Serialize;

use crate::banner::{BannerPhase, MessageBanner};
use crate::event::Event;
use crate::ui::UiState;

/// Aggregates recomputed from the collections.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DerivedMetrics {
    pub trades: TradesMetrics,
    pub positions: PositionsMetrics,
    pub pipelines: PipelinesMetrics,
    /// `None` until balances have been loaded.
    pub available_balance: Option<AvailableBalance>,
}

/// Complete view-model of the dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DashboardState {
    pub trades: BTreeMap<TradeId, Trade>,
    pub pipelines: BTreeMap<PipelineId, Pipeline>,
    pub positions: BTreeMap<PositionId, Position>,
    pub balances: Option<Balances>,
    pub prices: PriceMap,
    pub resources: Resources,
    pub pipeline_metrics: PipelineMetricsReport,
    pub metrics: DerivedMetrics,
    pub ui: UiState,
    pub banner: Option<MessageBanner>,
}

/// Inputs of derived metrics touched by one transition.
#[derive(Debug, Clone, Copy, Default)]
struct Touched {
    trades: bool,
    pipelines: bool,
    positions: bool,
    balances: bool,
    prices: bool,
}

impl DashboardState {
    /// Next state after `event`.
    ///
    /// Pure: the result depends only on `self` and `event`.
    #[must_use]
    pub fn apply(&self, event: Event) -> DashboardState {
        let mut next = self.clone();
        let touched = next.absorb(event);
        next.recompute(touched);
        next
    }

    fn absorb(&mut self, event: Event) -> Touched {
        let mut touched = Touched::default();

        match event {
            Event::ResourcesLoaded { resources, .. } => {
                self.resources.merge(resources);
            }
            Event::TradesLoaded { trades, .. } => {
                self.trades.extend(trades.into_iter().map(|t| (t.id, t)));
                touched.trades = true;
            }
            Event::PipelinesLoaded { pipelines, .. } => {
                self.pipelines
                    .extend(pipelines.into_iter().map(|p| (p.id, p)));
                touched.pipelines = true;
            }
            Event::PositionsLoaded { positions, .. } => {
                self.positions
                    .extend(positions.into_iter().map(|p| (p.id, p)));
                touched.positions = true;
            }
            Event::BalancesLoaded { balances, .. } => {
                self.balances = Some(balances);
                touched.balances = true;
            }
            Event::PricesLoaded { prices, .. } => {
                self.prices.extend(prices);
                touched.prices = true;
            }
            Event::PipelineMetricsLoaded { report, .. } => {
                self.pipeline_metrics = report;
            }
            Event::PipelineUpserted(pipeline) => {
                self.pipelines.insert(pipeline.id, pipeline);
                touched.pipelines = true;
            }
            Event::PipelineRemoved(id) => {
                touched.pipelines = self.pipelines.remove(&id).is_some();
            }
            Event::Navigated(view) => {
                self.ui.active_view = view;
                self.ui.menu_open = false;
            }
            Event::MenuToggled => {
                self.ui.menu_open = !self.ui.menu_open;
            }
            Event::ModalOpened(modal) => {
                self.ui.modal = Some(modal);
            }
            Event::ModalClosed => {
                self.ui.modal = None;
            }
            Event::MessageShown { id, text, kind } => {
                self.banner = Some(MessageBanner {
                    id,
                    text,
                    kind,
                    phase: BannerPhase::Shown,
                });
            }
            Event::MessageSettled { id } => {
                self.advance_banner(id, BannerPhase::Shown, BannerPhase::Visible);
            }
            Event::MessageDismissed { id } => {
                self.advance_banner(id, BannerPhase::Visible, BannerPhase::Hidden);
            }
        }

        touched
    }

    /// Move the banner from `from` to `to` if it still shows message `id`.
    fn advance_banner(&mut self, id: u64, from: BannerPhase, to: BannerPhase) {
        if let Some(banner) = self.banner.as_mut() {
            if banner.id == id && banner.phase == from {
                banner.phase = to;
            }
        }
    }

    fn recompute(&mut self, touched: Touched) {
        if touched.trades {
            self.metrics.trades = TradesReducer.reduce(self.trades.values());
        }
        if touched.positions || touched.prices {
            self.metrics.positions =
                PositionsReducer::new(&self.prices).reduce(self.open_positions());
        }
        if touched.pipelines || touched.trades {
            self.metrics.pipelines =
                PipelinesReducer::new(self.trades.values()).reduce(self.pipelines.values());
        }
        if touched.balances || touched.positions || touched.pipelines {
            self.metrics.available_balance = self.balances.as_ref().map(|balances| {
                AvailableBalanceReducer::new(balances, &self.pipelines)
                    .reduce(self.open_positions())
            });
        }
    }

    pub fn open_positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.values().filter(|p| p.open)
    }

    /// Symbols whose live price the dashboard needs.
    pub fn known_symbols(&self) -> BTreeSet<String> {
        self.open_positions()
            .map(|p| p.symbol.clone())
            .chain(self.pipelines.values().map(|p| p.symbol.clone()))
            .collect()
    }

    /// Trades newest first, as the trades view lists them.
    pub fn trades_newest_first(&self) -> Vec<&Trade> {
        let mut trades: Vec<&Trade> = self.trades.values().collect();
        trades.sort_by(|a, b| b.open_time.cmp(&a.open_time).then(b.id.cmp(&a.id)));
        trades
    }
}
