//! Round scheduler driving the game lifecycle on a timer.

use crate::config::ScheduleConfig;
use crate::{logging, metrics};
use amar_akbar_anthony::round::RoundError;
use amar_akbar_anthony::store::{RoundStore, RoundSummary};
use amar_akbar_anthony::{GameEngine, RoundId, RoundOutcome};
use anyhow::Context;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Opens, closes and persists rounds back to back
pub struct RoundScheduler {
    engine: GameEngine,
    store: Arc<dyn RoundStore>,
    schedule: ScheduleConfig,
}

impl RoundScheduler {
    pub fn new(engine: GameEngine, store: Arc<dyn RoundStore>, schedule: ScheduleConfig) -> Self {
        Self {
            engine,
            store,
            schedule,
        }
    }

    /// Run rounds until `shutdown` flips to `true`
    ///
    /// A round that is open when shutdown is requested is still closed and
    /// settled before returning.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        log::info!(
            "Round scheduler started ({}s betting, {}s result)",
            self.schedule.betting_secs,
            self.schedule.result_secs
        );

        let mut last_round = 0;
        while !*shutdown.borrow() {
            let round_id = next_round_id(last_round);
            last_round = round_id;
            let outcome = self.run_round(round_id, &mut shutdown).await;
            if let Err(e) = outcome {
                log::error!("Round {} failed: {:#}", round_id, e);
            }

            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep(self.schedule.result_window()) => {}
                _ = shutdown.changed() => {}
            }
        }

        log::info!("Round scheduler stopped");
    }

    /// Run one round: open, wait the betting window, close, settle, persist
    pub async fn run_round(
        &self,
        round_id: RoundId,
        shutdown: &mut watch::Receiver<bool>,
    ) -> anyhow::Result<RoundOutcome> {
        match self.engine.open_round(round_id).await {
            Ok(()) => {}
            Err(RoundError::RoundStillLive(previous)) => {
                // A previous sweep was interrupted; finish it before moving on
                log::warn!("Round {} still live, resuming its settlement", previous);
                self.engine
                    .settle_round(previous)
                    .await
                    .with_context(|| format!("resume settlement of round {}", previous))?;
                self.engine
                    .open_round(round_id)
                    .await
                    .with_context(|| format!("open round {}", round_id))?;
            }
            Err(e) => return Err(e).with_context(|| format!("open round {}", round_id)),
        }

        tokio::select! {
            _ = tokio::time::sleep(self.schedule.betting_window()) => {}
            _ = shutdown.changed() => {
                log::info!("Shutdown requested, closing round {} early", round_id);
            }
        }

        let started = Instant::now();
        let outcome = self
            .engine
            .close_round(round_id)
            .await
            .with_context(|| format!("close round {}", round_id))?;
        let elapsed = started.elapsed();

        let summary = RoundSummary {
            round_id,
            start_delay_secs: self.schedule.betting_secs,
            end_delay_secs: self.schedule.result_secs,
            result: outcome.result.clone(),
        };
        if let Err(e) = self.store.insert_round(&summary).await {
            log::error!("Failed to persist round {}: {}", round_id, e);
        }

        metrics::round_completed(&outcome, elapsed.as_secs_f64() * 1000.0);
        logging::log_round_completed(
            round_id,
            outcome.result.winner.chip(),
            outcome.settlements.len(),
            outcome.settlements.iter().map(|s| s.total_payout).sum(),
            outcome
                .settlements
                .iter()
                .filter(|s| s.credit.is_failed())
                .count(),
            elapsed.as_millis() as u64,
        );

        Ok(outcome)
    }
}

/// Round ids are the opening time in epoch milliseconds, strictly increasing
fn next_round_id(previous: RoundId) -> RoundId {
    chrono::Utc::now().timestamp_millis().max(previous + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use amar_akbar_anthony::Collaborators;
    use amar_akbar_anthony::bets::{Connection, Selection};
    use amar_akbar_anthony::events::NullEventSink;
    use amar_akbar_anthony::game::{Category, GameResult};
    use amar_akbar_anthony::ledger::MemoryLedger;
    use amar_akbar_anthony::round::GameConfig;
    use amar_akbar_anthony::session::{MemorySessionCache, PlayerSession, SessionCache};
    use amar_akbar_anthony::store::MemoryStore;
    use std::time::Duration;

    struct Fixture {
        engine: GameEngine,
        sessions: Arc<MemorySessionCache>,
        store: Arc<MemoryStore>,
    }

    fn fixture() -> Fixture {
        let sessions = Arc::new(MemorySessionCache::new());
        let store = Arc::new(MemoryStore::new());
        let engine = GameEngine::new(
            GameConfig::default(),
            Collaborators {
                ledger: Arc::new(MemoryLedger::new()),
                sessions: sessions.clone(),
                store: store.clone(),
                events: Arc::new(NullEventSink),
            },
        )
        .unwrap();
        Fixture {
            engine,
            sessions,
            store,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_round_accepts_bets_during_window() {
        let f = fixture();
        f.sessions
            .set("s1", PlayerSession::new("p1", "op1", "t", "aaa", 10_000))
            .await;

        let scheduler = RoundScheduler::new(f.engine.clone(), f.store.clone(), ScheduleConfig::default());
        let (_tx, mut rx) = watch::channel(false);

        let engine = f.engine.clone();
        let bettor = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            engine
                .place_bet(&Connection::new("s1", "10.0.0.1"), 42, vec![Selection::new(1, 1000)])
                .await
        });

        let outcome = scheduler.run_round(42, &mut rx).await.unwrap();
        assert!(bettor.await.unwrap().is_ok());
        assert_eq!(outcome.settlements.len(), 1);

        let rounds = f.store.rounds().await;
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].round_id, 42);
        assert_eq!(rounds[0].start_delay_secs, 15);
        assert_eq!(rounds[0].end_delay_secs, 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resumes_interrupted_round() {
        let f = fixture();
        f.engine.open_round(1).await.unwrap();
        f.engine
            .round()
            .close(1, GameResult::new(Category::Akbar, "8-C"))
            .await
            .unwrap();

        let scheduler = RoundScheduler::new(f.engine.clone(), f.store.clone(), ScheduleConfig::default());
        let (_tx, mut rx) = watch::channel(false);

        let outcome = scheduler.run_round(2, &mut rx).await.unwrap();
        assert_eq!(outcome.round_id, 2);
    }

    #[test]
    fn test_round_ids_increase() {
        let first = next_round_id(0);
        assert!(next_round_id(first) > first);
        assert_eq!(next_round_id(i64::MAX - 1), i64::MAX);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_on_shutdown() {
        let f = fixture();
        let scheduler = RoundScheduler::new(f.engine.clone(), f.store.clone(), ScheduleConfig::default());
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(scheduler.run(rx));
        tokio::time::sleep(Duration::from_secs(50)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        // 50s fits two full 21s cycles plus the round cut short by shutdown
        assert_eq!(f.store.rounds().await.len(), 3);
        assert!(f.engine.snapshot().await.unwrap().is_none());
    }
}
