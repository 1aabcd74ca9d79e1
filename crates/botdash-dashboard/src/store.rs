//! Store actor owning the dashboard state.
//!
//! A single task applies every event, so the published snapshot has exactly
//! one writer. Consumers read snapshots through a `watch` channel and send
//! events through a [`DashboardHandle`].

use std::sync::Arc;
use std::time::Duration;

use botdash_telemetry::Metrics;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::banner::{BannerScheduler, MessageKind};
use crate::config::DashboardConfig;
use crate::event::Event;
use crate::generation::RequestGenerations;
use crate::state::DashboardState;

// ============================================================================
// StoreMsg
// ============================================================================

/// Messages for the store actor.
#[derive(Debug)]
pub enum StoreMsg {
    /// Apply an event.
    Dispatch(Event),

    /// Apply an event and reply whether it was applied or discarded as stale.
    DispatchAcked {
        event: Event,
        reply: oneshot::Sender<bool>,
    },

    /// Post a banner message and arm its dismissal timer.
    ShowMessage { text: String, kind: MessageKind },

    /// Reply once every earlier message has been applied.
    Flush(oneshot::Sender<()>),

    /// Graceful shutdown.
    Shutdown,
}

// ============================================================================
// DashboardStore
// ============================================================================

/// Store actor task.
pub struct DashboardStore {
    rx: mpsc::Receiver<StoreMsg>,
    /// Own inbox, for the banner timer. Weak so dropping every handle ends the task.
    self_tx: mpsc::WeakSender<StoreMsg>,
    state: Arc<DashboardState>,
    snapshot_tx: watch::Sender<Arc<DashboardState>>,
    generations: Arc<RequestGenerations>,
    banner: BannerScheduler,
    next_message_id: u64,
}

impl DashboardStore {
    /// Run until `Shutdown` or until every handle is dropped.
    pub async fn run(mut self) {
        debug!("DashboardStore started");

        while let Some(msg) = self.rx.recv().await {
            match msg {
                StoreMsg::Shutdown => {
                    debug!("DashboardStore shutting down");
                    break;
                }
                msg => self.handle_message(msg),
            }
        }

        self.banner.cancel();
        debug!("DashboardStore terminated");
    }

    fn handle_message(&mut self, msg: StoreMsg) {
        match msg {
            StoreMsg::Dispatch(event) => {
                self.on_event(event);
            }
            StoreMsg::DispatchAcked { event, reply } => {
                let _ = reply.send(self.on_event(event));
            }
            StoreMsg::ShowMessage { text, kind } => {
                self.next_message_id += 1;
                let id = self.next_message_id;
                self.on_event(Event::MessageShown { id, text, kind });
                self.banner.arm(id, self.self_tx.clone());
            }
            StoreMsg::Flush(reply) => {
                let _ = reply.send(());
            }
            StoreMsg::Shutdown => unreachable!("Shutdown handled in run()"),
        }
    }

    /// Apply `event` unless it answers a superseded request.
    fn on_event(&mut self, event: Event) -> bool {
        if let Some((kind, generation)) = event.generation() {
            if !self.generations.is_latest(kind, generation) {
                debug!(
                    resource = kind.as_str(),
                    generation,
                    latest = self.generations.latest(kind),
                    "Discarding stale response"
                );
                Metrics::stale_response(kind.as_str());
                return false;
            }
        }

        let name = event.name();
        let next = self.state.apply(event);
        self.state = Arc::new(next);
        self.snapshot_tx.send_replace(Arc::clone(&self.state));
        Metrics::state_transition(name);
        true
    }
}

// ============================================================================
// DashboardHandle
// ============================================================================

/// Handle for interacting with the store actor.
#[derive(Clone)]
pub struct DashboardHandle {
    tx: mpsc::Sender<StoreMsg>,
    snapshot_rx: watch::Receiver<Arc<DashboardState>>,
    generations: Arc<RequestGenerations>,
}

impl DashboardHandle {
    /// Send an event to the store. Returns `false` if the store has stopped.
    pub async fn dispatch(&self, event: Event) -> bool {
        let name = event.name();
        if self.tx.send(StoreMsg::Dispatch(event)).await.is_err() {
            warn!(event = name, "Dashboard store stopped, event dropped");
            return false;
        }
        true
    }

    /// Send an event and wait for the store to process it.
    ///
    /// Returns `true` only if the event was applied. A stale response or a
    /// stopped store gives `false`.
    pub async fn dispatch_acked(&self, event: Event) -> bool {
        let name = event.name();
        let (reply_tx, reply_rx) = oneshot::channel();
        let msg = StoreMsg::DispatchAcked {
            event,
            reply: reply_tx,
        };
        if self.tx.send(msg).await.is_err() {
            warn!(event = name, "Dashboard store stopped, event dropped");
            return false;
        }
        reply_rx.await.unwrap_or(false)
    }

    /// Latest published state.
    #[must_use]
    pub fn snapshot(&self) -> Arc<DashboardState> {
        Arc::clone(&self.snapshot_rx.borrow())
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardState>> {
        self.snapshot_rx.clone()
    }

    /// Generation counters shared with the store.
    #[must_use]
    pub fn generations(&self) -> &RequestGenerations {
        &self.generations
    }

    /// Post a banner message.
    pub async fn show_message(&self, text: impl Into<String>, kind: MessageKind) {
        let text = text.into();
        if self
            .tx
            .send(StoreMsg::ShowMessage { text, kind })
            .await
            .is_err()
        {
            warn!("Dashboard store stopped, message dropped");
        }
    }

    /// Wait until everything sent so far has been applied.
    pub async fn flush(&self) {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.tx.send(StoreMsg::Flush(reply_tx)).await.is_ok() {
            let _ = reply_rx.await;
        }
    }

    /// Stop the store.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(StoreMsg::Shutdown).await;
    }
}

// ============================================================================
// Spawn function
// ============================================================================

/// Spawn the store actor.
///
/// Returns a handle for interaction and a join handle for the task.
#[must_use]
pub fn spawn_dashboard_store(config: &DashboardConfig) -> (DashboardHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(config.channel_capacity);
    let state = Arc::new(DashboardState::default());
    let (snapshot_tx, snapshot_rx) = watch::channel(Arc::clone(&state));
    let generations = Arc::new(RequestGenerations::new());

    let store = DashboardStore {
        rx,
        self_tx: tx.downgrade(),
        state,
        snapshot_tx,
        generations: Arc::clone(&generations),
        banner: BannerScheduler::new(Duration::from_millis(config.message_dismiss_ms)),
        next_message_id: 0,
    };

    let handle = DashboardHandle {
        tx,
        snapshot_rx,
        generations,
    };

    let join_handle = tokio::spawn(store.run());

    (handle, join_handle)
}

// ============================================================================
// Tests
// ============================================================================
