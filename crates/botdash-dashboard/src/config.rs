//! Dashboard configuration.

use botdash_api::REFERENCE_RESOURCES;
use serde::{Deserialize, Serialize};

/// State container configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Trade polling interval in seconds.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Time a banner message stays visible, in milliseconds.
    #[serde(default = "default_message_dismiss_ms")]
    pub message_dismiss_ms: u64,
    /// Store inbox capacity.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    /// Reference data requested on mount.
    #[serde(default = "default_reference_resources")]
    pub reference_resources: Vec<String>,
}

fn default_poll_interval_secs() -> u64 {
    60
}

fn default_message_dismiss_ms() -> u64 {
    4200
}

fn default_channel_capacity() -> usize {
    256
}

fn default_reference_resources() -> Vec<String> {
    REFERENCE_RESOURCES.iter().map(|s| s.to_string()).collect()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            message_dismiss_ms: default_message_dismiss_ms(),
            channel_capacity: default_channel_capacity(),
            reference_resources: default_reference_resources(),
        }
    }
}
