//! Game engine wiring the round actor, admission and settlement together.

use crate::bets::{BetAdmission, BetReceipt, BetResult, Connection, Selection};
use crate::events::EventSink;
use crate::game::{GameResult, RoundId, resolve};
use crate::ledger::LedgerGateway;
use crate::round::{GameConfig, RoundActor, RoundHandle, RoundResult, RoundSnapshot};
use crate::session::SessionCache;
use crate::settlement::{SettlementEngine, SettlementRecord, SettlementResult};
use crate::store::RoundStore;
use std::sync::Arc;

/// External systems the engine talks to
#[derive(Clone)]
pub struct Collaborators {
    pub ledger: Arc<dyn LedgerGateway>,
    pub sessions: Arc<dyn SessionCache>,
    pub store: Arc<dyn RoundStore>,
    pub events: Arc<dyn EventSink>,
}

/// A closed and settled round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub round_id: RoundId,
    pub result: GameResult,
    pub settlements: Vec<SettlementRecord>,
}

/// Entry point for the round lifecycle and bet placement
#[derive(Clone)]
pub struct GameEngine {
    config: GameConfig,
    round: RoundHandle,
    admission: BetAdmission,
    settlement: SettlementEngine,
}

impl GameEngine {
    /// Spawn the round actor and build the engine
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `config` - Game configuration
    /// * `collaborators` - Ledger, session cache, store and event sink
    ///
    /// # Returns
    ///
    /// * `Result<GameEngine, String>` - Engine or configuration error
    pub fn new(config: GameConfig, collaborators: Collaborators) -> Result<Self, String> {
        config.validate()?;

        let round = RoundActor::spawn(config.clone());
        let timeout = config.ledger_timeout();

        let admission = BetAdmission::new(
            round.clone(),
            collaborators.ledger.clone(),
            collaborators.sessions.clone(),
            collaborators.store.clone(),
            collaborators.events.clone(),
            timeout,
        );
        let settlement = SettlementEngine::new(
            round.clone(),
            collaborators.ledger,
            collaborators.sessions,
            collaborators.store,
            collaborators.events,
            timeout,
            config.max_cashout,
        );

        log::info!(
            "Game engine '{}' ready (bets {}..={}, cashout cap {})",
            config.name,
            config.min_bet,
            config.max_bet,
            config.max_cashout
        );

        Ok(Self {
            config,
            round,
            admission,
            settlement,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn round(&self) -> &RoundHandle {
        &self.round
    }

    /// Open a round for bets. Fails while a previous round is still live.
    pub async fn open_round(&self, round_id: RoundId) -> RoundResult<()> {
        self.round.open(round_id).await
    }

    /// Close the round with a freshly resolved result and settle it
    pub async fn close_round(&self, round_id: RoundId) -> SettlementResult<RoundOutcome> {
        self.close_round_with(round_id, resolve()).await
    }

    /// Close the round with the given result and settle it
    pub async fn close_round_with(
        &self,
        round_id: RoundId,
        result: GameResult,
    ) -> SettlementResult<RoundOutcome> {
        let result = self.round.close(round_id, result).await?;
        let settlements = self.settlement.settle_round(round_id).await?;

        Ok(RoundOutcome {
            round_id,
            result,
            settlements,
        })
    }

    /// Settle a closed round, resuming after an interrupted sweep
    pub async fn settle_round(&self, round_id: RoundId) -> SettlementResult<Vec<SettlementRecord>> {
        self.settlement.settle_round(round_id).await
    }

    /// Place a bet on the open round
    pub async fn place_bet(
        &self,
        connection: &Connection,
        round_id: RoundId,
        selections: Vec<Selection>,
    ) -> BetResult<BetReceipt> {
        self.admission
            .place_bet(connection, round_id, selections)
            .await
    }

    pub async fn snapshot(&self) -> RoundResult<Option<RoundSnapshot>> {
        self.round.snapshot().await
    }

    /// Stop the round actor
    pub async fn shutdown(&self) -> RoundResult<()> {
        self.round.shutdown().await
    }
}
