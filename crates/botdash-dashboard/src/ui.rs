//! UI selection state.

use botdash_core::PipelineId;
use serde::Serialize;

/// Top-level view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Dashboard,
    Trades,
    Pipelines,
    Positions,
}

impl View {
    /// Views backed by a collection that is refetched on navigation.
    pub fn has_collection(&self) -> bool {
        !matches!(self, Self::Dashboard)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Trades => "trades",
            Self::Pipelines => "pipelines",
            Self::Positions => "positions",
        }
    }
}

/// Modal dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "pipeline_id", rename_all = "snake_case")]
pub enum Modal {
    NewBot,
    PipelineDetail(PipelineId),
    StopBot(PipelineId),
    DeleteBot(PipelineId),
}

/// Selection state of the front end.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UiState {
    pub active_view: View,
    pub menu_open: bool,
    pub modal: Option<Modal>,
}
