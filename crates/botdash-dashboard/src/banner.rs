//! Transient message banner.
//!
//! A message goes through three phases: `Shown` when posted, `Visible` right
//! after (the front end animates between the two), and `Hidden` once the
//! dismissal delay has elapsed. There is one banner slot and one pending
//! timer; posting a new message aborts the timer of the previous one.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::event::Event;
use crate::store::StoreMsg;

/// Tone of a banner message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Success,
    Error,
    Info,
}

/// Display phase of the banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerPhase {
    Shown,
    Visible,
    Hidden,
}

/// Message currently occupying the banner slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageBanner {
    pub id: u64,
    pub text: String,
    pub kind: MessageKind,
    pub phase: BannerPhase,
}

impl MessageBanner {
    pub fn is_displayed(&self) -> bool {
        self.phase != BannerPhase::Hidden
    }
}

/// Owns the single dismissal timer.
///
/// The timer task holds only a weak sender, so it never keeps the store
/// alive on its own.
#[derive(Debug)]
pub(crate) struct BannerScheduler {
    dismiss_after: Duration,
    pending: Option<JoinHandle<()>>,
}

impl BannerScheduler {
    pub(crate) fn new(dismiss_after: Duration) -> Self {
        Self {
            dismiss_after,
            pending: None,
        }
    }

    /// Settle message `id` now and dismiss it after the configured delay.
    pub(crate) fn arm(&mut self, id: u64, tx: mpsc::WeakSender<StoreMsg>) {
        self.cancel();

        let dismiss_after = self.dismiss_after;
        self.pending = Some(tokio::spawn(async move {
            if !deliver(&tx, Event::MessageSettled { id }).await {
                return;
            }
            tokio::time::sleep(dismiss_after).await;
            deliver(&tx, Event::MessageDismissed { id }).await;
        }));
    }

    /// Abort the pending timer, if any.
    pub(crate) fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl Drop for BannerScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn deliver(tx: &mpsc::WeakSender<StoreMsg>, event: Event) -> bool {
    match tx.upgrade() {
        Some(tx) => tx.send(StoreMsg::Dispatch(event)).await.is_ok(),
        None => false,
    }
}
