//! Prometheus metrics for monitoring rounds, bets and settlements.
//!
//! Metrics are exposed in Prometheus text format for scraping by monitoring systems.
//!
//! # Metrics Categories
//!
//! - **Bet Metrics**: Admitted bets, rejections by reason
//! - **Settlement Metrics**: Wins and losses, payouts, failed credits
//! - **Round Metrics**: Rounds completed, settlement duration
//! - **Event Metrics**: Player notifications by type

use amar_akbar_anthony::RoundOutcome;
use amar_akbar_anthony::events::{EventSink, NoticeStatus, OutboundEvent};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;

/// Initialize Prometheus metrics exporter.
///
/// Sets up a Prometheus scrape endpoint on the specified address.
/// Metrics will be available at `http://<addr>/metrics`.
///
/// # Arguments
///
/// - `addr`: Address to bind the metrics server to (e.g., `0.0.0.0:9090`)
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// Bet Metrics
// ============================================================================

/// Increment admitted bets counter.
pub fn bets_placed_total() {
    metrics::counter!("bets_placed_total").increment(1);
}

/// Increment rejected bets counter, labelled with the client-facing reason.
pub fn bet_rejections_total(reason: &str) {
    metrics::counter!("bet_rejections_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

// ============================================================================
// Settlement Metrics
// ============================================================================

/// Increment settled bets counter by outcome.
pub fn settlements_total(status: &str) {
    metrics::counter!("settlements_total",
        "status" => status.to_string()
    )
    .increment(1);
}

/// Increment failed credits counter.
pub fn credit_failures_total(count: usize) {
    metrics::counter!("credit_failures_total").increment(count as u64);
}

/// Record a round's total payout in minor units.
pub fn round_payout(amount: i64) {
    metrics::histogram!("round_payout_minor_units").record(amount as f64);
}

// ============================================================================
// Round Metrics
// ============================================================================

/// Record a completed round.
pub fn round_completed(outcome: &RoundOutcome, duration_ms: f64) {
    metrics::counter!("rounds_completed_total",
        "winner" => outcome.result.winner.chip().to_string()
    )
    .increment(1);
    metrics::histogram!("round_settlement_duration_ms").record(duration_ms);
    metrics::gauge!("round_bets").set(outcome.settlements.len() as f64);

    round_payout(outcome.settlements.iter().map(|s| s.total_payout).sum());
    credit_failures_total(
        outcome
            .settlements
            .iter()
            .filter(|s| s.credit.is_failed())
            .count(),
    );
}

// ============================================================================
// Event Metrics
// ============================================================================

/// Increment player notifications counter.
pub fn events_emitted_total(event: &str) {
    metrics::counter!("events_emitted_total",
        "event" => event.to_string()
    )
    .increment(1);
}

/// Event sink recording metrics for every notification it forwards
pub struct MetricsEventSink {
    inner: Arc<dyn EventSink>,
}

impl MetricsEventSink {
    pub fn new(inner: Arc<dyn EventSink>) -> Self {
        Self { inner }
    }
}

impl EventSink for MetricsEventSink {
    fn emit(&self, session_key: &str, event: OutboundEvent) {
        events_emitted_total(event.name());
        match &event {
            OutboundEvent::BetError { message, .. } => bet_rejections_total(message),
            OutboundEvent::Bet { .. } => bets_placed_total(),
            OutboundEvent::Settlement(notice) => settlements_total(match notice.status {
                NoticeStatus::Win => "win",
                NoticeStatus::Loss => "loss",
            }),
            OutboundEvent::Info { .. } => {}
        }
        self.inner.emit(session_key, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amar_akbar_anthony::events::ChannelEventSink;

    #[tokio::test]
    async fn test_metrics_sink_forwards_events() {
        let (inner, mut rx) = ChannelEventSink::channel();
        let sink = MetricsEventSink::new(Arc::new(inner));

        sink.emit("s1", OutboundEvent::bet_error("INVALID BET"));
        sink.emit("s1", OutboundEvent::bet_placed());

        assert_eq!(rx.recv().await.unwrap().event.name(), "betError");
        assert_eq!(rx.recv().await.unwrap().event.name(), "bet");
    }
}
