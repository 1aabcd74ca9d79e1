//! Application state container for the bot dashboard.
//!
//! Provides:
//! - `DashboardState`: collections, derived metrics, UI selection and banner
//! - `Event` and `DashboardState::apply`: the pure transition function
//! - `spawn_dashboard_store`: actor owning the state, publishing snapshots
//! - `DashboardController`: fetch orchestration, polling and bot actions
//!
//! # Architecture
//!
//! ```text
//! DashboardController ──(DashboardApi)──▶ backend
//!        │
//!        │ Event (+ request generation)
//!        ▼
//! DashboardStore ──apply──▶ DashboardState ──watch──▶ consumers
//!        ▲
//!        └── BannerScheduler (settle / dismiss timer)
//! ```

pub mod banner;
pub mod config;
pub mod controller;
pub mod event;
pub mod generation;
pub mod state;
pub mod store;
pub mod ui;

pub use banner::{BannerPhase, MessageBanner, MessageKind};
pub use config::DashboardConfig;
pub use controller::{DashboardController, PriceRefresh};
pub use event::Event;
pub use generation::{RequestGenerations, ResourceKind};
pub use state::{DashboardState, DerivedMetrics};
pub use store::{spawn_dashboard_store, DashboardHandle, DashboardStore, StoreMsg};
pub use ui::{Modal, UiState, View};
