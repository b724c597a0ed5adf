//! Amar Akbar Anthony round server.
//!
//! Runs the round scheduler against the operator ledger webhook, with round
//! history in PostgreSQL when a database is configured.

mod config;
mod ledger;
mod logging;
mod metrics;
mod scheduler;

use std::net::SocketAddr;
use std::sync::Arc;

use amar_akbar_anthony::{
    Collaborators, GameEngine,
    db::{Database, PgRoundStore},
    events::{ChannelEventSink, EventSink},
    ledger::{CreditQueue, LedgerGateway, MemoryLedger},
    session::MemorySessionCache,
    store::{MemoryStore, RoundStore},
};
use anyhow::{Context, Error};
use config::{CreditMode, ServerConfig};
use ctrlc::set_handler;
use log::info;
use pico_args::Arguments;
use scheduler::RoundScheduler;
use tokio::sync::watch;

const HELP: &str = "\
Run the Amar Akbar Anthony round server

USAGE:
  aaa_server [OPTIONS]

OPTIONS:
  --db-url      URL        Database connection string  [default: env DATABASE_URL, in-memory history when unset]
  --ledger-url  URL        Operator service base URL   [default: env SERVICE_BASE_URL]
  --metrics     IP:PORT    Prometheus scrape address   [default: env METRICS_BIND, disabled when unset]

FLAGS:
  --demo                   Use an in-memory ledger when no operator service is configured
  -h, --help               Print help information

ENVIRONMENT:
  GAME_NAME                Game name used in ledger descriptions
  MIN_BET / MAX_BET        Per-selection stake limits (e.g., 0.10 / 1000.00)
  MAX_CASHOUT              Per-selection payout cap (e.g., 10000.00)
  LEDGER_TIMEOUT_SECS      Bound on each debit and credit call
  ROUND_BETTING_SECS       Seconds a round accepts bets
  ROUND_RESULT_SECS        Seconds between settlement and the next round
  CREDIT_MODE              direct | queued
  (See .env file for all configuration options)
";

struct Args {
    database_url: Option<String>,
    ledger_url: Option<String>,
    metrics_bind: Option<SocketAddr>,
    demo: bool,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        database_url: pargs.opt_value_from_str("--db-url")?,
        ledger_url: pargs.opt_value_from_str("--ledger-url")?,
        metrics_bind: pargs.opt_value_from_str("--metrics")?,
        demo: pargs.contains("--demo"),
    };

    logging::init();

    let config = ServerConfig::from_env(
        args.database_url,
        args.ledger_url,
        args.metrics_bind,
        args.demo,
    )?;
    config.validate()?;

    info!("Starting {} round server", config.game.name);

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(Error::msg)?;
        info!("Metrics available at http://{}/metrics", addr);
    }

    let ledger = build_ledger(&config)?;
    let (store, database) = build_store(&config).await?;

    let (channel_sink, mut events) = ChannelEventSink::channel();
    let events_sink: Arc<dyn EventSink> =
        Arc::new(metrics::MetricsEventSink::new(Arc::new(channel_sink)));

    // No transport is attached yet; drain notifications into the log
    tokio::spawn(async move {
        while let Some(routed) = events.recv().await {
            log::debug!(
                "Event {} for session {}",
                routed.event.name(),
                routed.session_key
            );
        }
    });

    let engine = GameEngine::new(
        config.game.clone(),
        Collaborators {
            ledger,
            sessions: Arc::new(MemorySessionCache::new()),
            store: store.clone(),
            events: events_sink,
        },
    )
    .map_err(Error::msg)?;

    // Catching signals for exit. The scheduler settles the live round first.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    set_handler(move || {
        let _ = shutdown_tx.send(true);
    })?;

    info!("Server is running. Press Ctrl+C to stop.");

    RoundScheduler::new(engine.clone(), store, config.schedule)
        .run(shutdown_rx)
        .await;

    info!("Shutting down server...");
    engine.shutdown().await?;
    if let Some(db) = database {
        db.close().await;
    }

    Ok(())
}

/// Build the ledger gateway for the configured operator service
fn build_ledger(config: &ServerConfig) -> Result<Arc<dyn LedgerGateway>, Error> {
    let timeout = config.game.ledger_timeout();

    let gateway: Arc<dyn LedgerGateway> = match &config.ledger.base_url {
        Some(url) => {
            info!("Using operator ledger at {}", url);
            Arc::new(
                ledger::HttpLedgerGateway::new(url, &config.game.name, timeout)
                    .context("Failed to build ledger HTTP client")?,
            )
        }
        None => {
            log::warn!("No operator service configured, using in-memory ledger");
            Arc::new(MemoryLedger::new())
        }
    };

    Ok(match config.ledger.credit_mode {
        CreditMode::Direct => gateway,
        CreditMode::Queued => {
            info!(
                "Credits queued for background dispatch (capacity {})",
                config.ledger.queue_capacity
            );
            Arc::new(CreditQueue::spawn(
                gateway,
                config.ledger.queue_capacity,
                timeout,
            ))
        }
    })
}

/// Build the round history store, connecting to the database when configured
async fn build_store(
    config: &ServerConfig,
) -> Result<(Arc<dyn RoundStore>, Option<Database>), Error> {
    let Some(db_config) = &config.database else {
        log::warn!("No database configured, round history kept in memory");
        return Ok((Arc::new(MemoryStore::new()), None));
    };

    info!("Connecting to database");
    let db = Database::new(db_config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
    db.ensure_schema()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to prepare schema: {}", e))?;
    info!("Database connected successfully");

    let store: Arc<dyn RoundStore> = Arc::new(PgRoundStore::new(db.pool().clone()));
    Ok((store, Some(db)))
}
