//! State transition events.

use botdash_api::{PipelineMetricsReport, Resources};
use botdash_core::{Balances, Pipeline, PipelineId, Position, PriceMap, Trade};

use crate::banner::MessageKind;
use crate::generation::ResourceKind;
use crate::ui::{Modal, View};

/// Everything that can change a [`DashboardState`](crate::DashboardState).
///
/// Completion events of fetches carry the generation issued when the
/// request was dispatched.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ResourcesLoaded {
        generation: u64,
        resources: Resources,
    },
    TradesLoaded {
        generation: u64,
        trades: Vec<Trade>,
    },
    PipelinesLoaded {
        generation: u64,
        pipelines: Vec<Pipeline>,
    },
    PositionsLoaded {
        generation: u64,
        positions: Vec<Position>,
    },
    BalancesLoaded {
        generation: u64,
        balances: Balances,
    },
    PricesLoaded {
        generation: u64,
        prices: PriceMap,
    },
    PipelineMetricsLoaded {
        generation: u64,
        report: PipelineMetricsReport,
    },

    /// A bot action returned this pipeline.
    PipelineUpserted(Pipeline),
    /// A bot action deleted this pipeline.
    PipelineRemoved(PipelineId),

    Navigated(View),
    MenuToggled,
    ModalOpened(Modal),
    ModalClosed,

    MessageShown {
        id: u64,
        text: String,
        kind: MessageKind,
    },
    MessageSettled {
        id: u64,
    },
    MessageDismissed {
        id: u64,
    },
}

impl Event {
    /// Resource and generation of a fetch completion.
    pub fn generation(&self) -> Option<(ResourceKind, u64)> {
        match self {
            Self::ResourcesLoaded { generation, .. } => {
                Some((ResourceKind::Resources, *generation))
            }
            Self::TradesLoaded { generation, .. } => Some((ResourceKind::Trades, *generation)),
            Self::PipelinesLoaded { generation, .. } => {
                Some((ResourceKind::Pipelines, *generation))
            }
            Self::PositionsLoaded { generation, .. } => {
                Some((ResourceKind::Positions, *generation))
            }
            Self::BalancesLoaded { generation, .. } => Some((ResourceKind::Balances, *generation)),
            Self::PricesLoaded { generation, .. } => Some((ResourceKind::Prices, *generation)),
            Self::PipelineMetricsLoaded { generation, .. } => {
                Some((ResourceKind::PipelineMetrics, *generation))
            }
            _ => None,
        }
    }

    /// Metric label.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ResourcesLoaded { .. } => "resources_loaded",
            Self::TradesLoaded { .. } => "trades_loaded",
            Self::PipelinesLoaded { .. } => "pipelines_loaded",
            Self::PositionsLoaded { .. } => "positions_loaded",
            Self::BalancesLoaded { .. } => "balances_loaded",
            Self::PricesLoaded { .. } => "prices_loaded",
            Self::PipelineMetricsLoaded { .. } => "pipeline_metrics_loaded",
            Self::PipelineUpserted(_) => "pipeline_upserted",
            Self::PipelineRemoved(_) => "pipeline_removed",
            Self::Navigated(_) => "navigated",
            Self::MenuToggled => "menu_toggled",
            Self::ModalOpened(_) => "modal_opened",
            Self::ModalClosed => "modal_closed",
            Self::MessageShown { .. } => "message_shown",
            Self::MessageSettled { .. } => "message_settled",
            Self::MessageDismissed { .. } => "message_dismissed",
        }
    }
}
