//! Request generations.
//!
//! Each fetch is tagged at dispatch with the next number for its resource.
//! A response is applied only if its tag is still the latest issued for that
//! resource; anything older lost the race and is discarded.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Resource a fetch refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Resources,
    Trades,
    Pipelines,
    Positions,
    Balances,
    Prices,
    PipelineMetrics,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        Self::Resources,
        Self::Trades,
        Self::Pipelines,
        Self::Positions,
        Self::Balances,
        Self::Prices,
        Self::PipelineMetrics,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resources => "resources",
            Self::Trades => "trades",
            Self::Pipelines => "pipelines",
            Self::Positions => "positions",
            Self::Balances => "balances",
            Self::Prices => "prices",
            Self::PipelineMetrics => "pipeline_metrics",
        }
    }
}

/// Latest issued generation per resource.
#[derive(Debug)]
pub struct RequestGenerations {
    latest: [AtomicU64; ResourceKind::ALL.len()],
}

impl RequestGenerations {
    pub fn new() -> Self {
        Self {
            latest: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    /// Tag a new request. Generations start at 1.
    pub fn issue(&self, kind: ResourceKind) -> u64 {
        self.latest[kind.index()].fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `generation` is still the newest request for `kind`.
    pub fn is_latest(&self, kind: ResourceKind, generation: u64) -> bool {
        self.latest[kind.index()].load(Ordering::SeqCst) == generation
    }

    pub fn latest(&self, kind: ResourceKind) -> u64 {
        self.latest[kind.index()].load(Ordering::SeqCst)
    }
}

impl Default for RequestGenerations {
    fn default() -> Self {
        Self::new()
    }
}
