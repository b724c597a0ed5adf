//! Structured logging configuration.
//!
//! The library crates log through the `log` facade; the subscriber installed
//! here also captures those records, including the `failed_bets` and
//! `failed_credits` audit targets.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Settlement sweeps slower than this are logged as warnings
const SLOW_SETTLEMENT_MS: u64 = 1000;

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn,reqwest=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a completed round with structured fields
///
/// # Arguments
///
/// * `round_id` - Round identifier
/// * `winner` - Winning category chip
/// * `bets` - Number of bets settled
/// * `paid_out` - Total payout in minor units
/// * `failed_credits` - Credits needing reconciliation
/// * `duration_ms` - Time spent closing and settling
pub fn log_round_completed(
    round_id: i64,
    winner: u8,
    bets: usize,
    paid_out: i64,
    failed_credits: usize,
    duration_ms: u64,
) {
    tracing::info!(
        round_id = round_id,
        winner = winner,
        bets = bets,
        paid_out = paid_out,
        failed_credits = failed_credits,
        duration_ms = duration_ms,
        "Round completed"
    );

    if duration_ms > SLOW_SETTLEMENT_MS {
        tracing::warn!(
            round_id = round_id,
            duration_ms = duration_ms,
            "PERFORMANCE: Slow settlement"
        );
    }
}
