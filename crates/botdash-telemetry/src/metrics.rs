//! Prometheus metrics for the bot dashboard.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. Registration only fails on duplicate
//! metric names, which is a programming error caught at first use.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, register_histogram_vec, Counter, CounterVec, Encoder,
    HistogramVec, TextEncoder,
};

use crate::error::{TelemetryError, TelemetryResult};

/// API requests by resource and outcome (ok/http_error/transport/decode).
pub static API_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "botdash_api_requests_total",
        "Total API requests by resource and outcome",
        &["resource", "outcome"]
    )
    .unwrap()
});

/// API request latency in milliseconds.
pub static API_LATENCY_MS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "botdash_api_latency_ms",
        "API request latency in milliseconds",
        &["resource"],
        vec![5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0]
    )
    .unwrap()
});

/// Responses discarded because a newer request for the resource was issued.
pub static STALE_RESPONSES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "botdash_stale_responses_total",
        "Responses discarded by request generation",
        &["resource"]
    )
    .unwrap()
});

/// Bot lifecycle actions by action and outcome (success/rejected/failed).
pub static BOT_ACTIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "botdash_bot_actions_total",
        "Bot lifecycle actions by action and outcome",
        &["action", "outcome"]
    )
    .unwrap()
});

/// Polling ticks.
pub static POLL_TICKS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!("botdash_poll_ticks_total", "Trade polling ticks").unwrap()
});

/// State transitions applied by event kind.
pub static STATE_TRANSITIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "botdash_state_transitions_total",
        "State transitions applied by event kind",
        &["event"]
    )
    .unwrap()
});

/// Metric recording helpers.
pub struct Metrics;

impl Metrics {
    /// Record a finished API request.
    pub fn api_request(resource: &str, outcome: &str, latency_ms: f64) {
        API_REQUESTS_TOTAL
            .with_label_values(&[resource, outcome])
            .inc();
        API_LATENCY_MS
            .with_label_values(&[resource])
            .observe(latency_ms);
    }

    /// Record a response dropped as stale.
    pub fn stale_response(resource: &str) {
        STALE_RESPONSES_TOTAL.with_label_values(&[resource]).inc();
    }

    /// Record a bot lifecycle action.
    pub fn bot_action(action: &str, outcome: &str) {
        BOT_ACTIONS_TOTAL.with_label_values(&[action, outcome]).inc();
    }

    /// Record a polling tick.
    pub fn poll_tick() {
        POLL_TICKS_TOTAL.inc();
    }

    /// Record an applied state transition.
    pub fn state_transition(event: &str) {
        STATE_TRANSITIONS_TOTAL.with_label_values(&[event]).inc();
    }

    /// Encode the default registry in the Prometheus text format.
    pub fn render() -> TelemetryResult<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&prometheus::gather(), &mut buffer)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_recorded_metrics() {
        Metrics::bot_action("start", "success");
        Metrics::stale_response("trades");

        let text = Metrics::render().unwrap();
        assert!(text.contains("botdash_bot_actions_total"));
        assert!(text.contains("botdash_stale_responses_total{resource=\"trades\"}"));
    }
}
