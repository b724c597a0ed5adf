//! Round actor implementation with async message handling.

use super::{
    config::GameConfig,
    errors::{RoundError, RoundResult},
    messages::{RoundMessage, RoundSnapshot, SettlementBatch},
    state::{RoundState, RoundStatus, RoundWindow},
};
use crate::bets::{BetId, BetRecord, Selection, ValidatedBet, ValidationError, validate};
use crate::game::{GameResult, RoundId};
use tokio::sync::{mpsc, oneshot};

/// Round actor handle for sending messages
#[derive(Clone)]
pub struct RoundHandle {
    sender: mpsc::Sender<RoundMessage>,
}

impl RoundHandle {
    /// Create a new round handle
    pub fn new(sender: mpsc::Sender<RoundMessage>) -> Self {
        Self { sender }
    }

    /// Send a message to the round actor
    pub async fn send(&self, message: RoundMessage) -> RoundResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| RoundError::ActorClosed)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> RoundMessage,
    ) -> RoundResult<T> {
        let (tx, rx) = oneshot::channel();
        self.send(build(tx)).await?;
        rx.await.map_err(|_| RoundError::ActorClosed)
    }

    pub async fn open(&self, round_id: RoundId) -> RoundResult<()> {
        self.request(|response| RoundMessage::OpenRound { round_id, response })
            .await?
    }

    pub async fn reserve(
        &self,
        round_id: RoundId,
        bet_id: BetId,
        selections: Vec<Selection>,
    ) -> RoundResult<ValidatedBet> {
        self.request(|response| RoundMessage::Reserve {
            round_id,
            bet_id,
            selections,
            response,
        })
        .await?
    }

    pub async fn release(&self, round_id: RoundId, bet_id: BetId) -> RoundResult<()> {
        self.send(RoundMessage::Release { round_id, bet_id }).await
    }

    /// Returns the number of bets admitted so far
    pub async fn admit(&self, bet: BetRecord) -> RoundResult<usize> {
        self.request(|response| RoundMessage::Admit { bet, response })
            .await?
    }

    pub async fn close(&self, round_id: RoundId, result: GameResult) -> RoundResult<GameResult> {
        self.request(|response| RoundMessage::CloseRound {
            round_id,
            result,
            response,
        })
        .await?
    }

    pub async fn begin_settlement(&self, round_id: RoundId) -> RoundResult<Option<SettlementBatch>> {
        self.request(|response| RoundMessage::BeginSettlement { round_id, response })
            .await?
    }

    pub async fn checkpoint(&self, round_id: RoundId, bet_id: BetId) -> RoundResult<()> {
        self.request(|response| RoundMessage::Checkpoint {
            round_id,
            bet_id,
            response,
        })
        .await?
    }

    pub async fn finish_settlement(&self, round_id: RoundId) -> RoundResult<usize> {
        self.request(|response| RoundMessage::FinishSettlement { round_id, response })
            .await?
    }

    pub async fn snapshot(&self) -> RoundResult<Option<RoundSnapshot>> {
        self.request(|response| RoundMessage::GetSnapshot { response })
            .await
    }

    pub async fn shutdown(&self) -> RoundResult<()> {
        self.send(RoundMessage::Shutdown).await
    }
}

/// Round actor owning the single live round
pub struct RoundActor {
    /// Limits applied when validating submissions
    config: GameConfig,

    /// Live round, if any
    state: Option<RoundState>,

    /// Message inbox
    inbox: mpsc::Receiver<RoundMessage>,
}

impl RoundActor {
    /// Create a new round actor
    ///
    /// # Arguments
    ///
    /// * `config` - Game configuration
    ///
    /// # Returns
    ///
    /// * `(RoundActor, RoundHandle)` - Actor and handle for sending messages
    pub fn new(config: GameConfig) -> (Self, RoundHandle) {
        let (sender, inbox) = mpsc::channel(256);

        let actor = Self {
            config,
            state: None,
            inbox,
        };

        (actor, RoundHandle::new(sender))
    }

    /// Spawn the actor on the current runtime
    pub fn spawn(config: GameConfig) -> RoundHandle {
        let (actor, handle) = Self::new(config);
        tokio::spawn(actor.run());
        handle
    }

    /// Run the round actor event loop
    pub async fn run(mut self) {
        log::info!("Round actor starting");

        while let Some(message) = self.inbox.recv().await {
            if matches!(message, RoundMessage::Shutdown) {
                break;
            }
            self.handle_message(message);
        }

        if let Some(state) = &self.state {
            log::warn!(
                "Round actor stopped with round {} {} and {} bet(s) unsettled",
                state.round_id,
                state.status,
                state.admitted_bets.len().saturating_sub(state.settled.len())
            );
        }
        log::info!("Round actor stopped");
    }

    /// Handle a round message
    fn handle_message(&mut self, message: RoundMessage) {
        match message {
            RoundMessage::OpenRound { round_id, response } => {
                let _ = response.send(self.handle_open(round_id));
            }

            RoundMessage::Reserve {
                round_id,
                bet_id,
                selections,
                response,
            } => {
                let _ = response.send(self.handle_reserve(round_id, bet_id, &selections));
            }

            RoundMessage::Release { round_id, bet_id } => {
                if let Some(state) = self.state.as_mut()
                    && state.round_id == round_id
                {
                    state.reserved.remove(&bet_id);
                }
            }

            RoundMessage::Admit { bet, response } => {
                let _ = response.send(self.handle_admit(bet));
            }

            RoundMessage::CloseRound {
                round_id,
                result,
                response,
            } => {
                let _ = response.send(self.handle_close(round_id, result));
            }

            RoundMessage::BeginSettlement { round_id, response } => {
                let _ = response.send(self.handle_begin_settlement(round_id));
            }

            RoundMessage::Checkpoint {
                round_id,
                bet_id,
                response,
            } => {
                let result = self.live_round_mut(round_id).map(|state| {
                    state.settled.insert(bet_id);
                });
                let _ = response.send(result);
            }

            RoundMessage::FinishSettlement { round_id, response } => {
                let _ = response.send(self.handle_finish(round_id));
            }

            RoundMessage::GetSnapshot { response } => {
                let _ = response.send(self.snapshot());
            }

            RoundMessage::Shutdown => {}
        }
    }

    fn live_round_mut(&mut self, round_id: RoundId) -> RoundResult<&mut RoundState> {
        let state = self.state.as_mut().ok_or(RoundError::NoLiveRound)?;
        if state.round_id != round_id {
            return Err(RoundError::RoundMismatch {
                requested: round_id,
                current: state.round_id,
            });
        }
        Ok(state)
    }

    fn handle_open(&mut self, round_id: RoundId) -> RoundResult<()> {
        if let Some(state) = &self.state {
            return Err(RoundError::RoundStillLive(state.round_id));
        }

        self.state = Some(RoundState::new(round_id));
        log::info!("Round {} open for bets", round_id);
        Ok(())
    }

    fn handle_reserve(
        &mut self,
        round_id: RoundId,
        bet_id: BetId,
        selections: &[Selection],
    ) -> RoundResult<ValidatedBet> {
        let window = self
            .state
            .as_ref()
            .map(RoundState::window)
            .unwrap_or_else(RoundWindow::none);

        let validated = validate(selections, round_id, &window, &self.config)?;

        // validate() passed the window check, so the live round is this one
        let state = self.live_round_mut(round_id)?;
        if state.contains_bet(&bet_id) {
            return Err(ValidationError::DuplicateBet.into());
        }
        state.reserved.insert(bet_id);

        Ok(validated)
    }

    fn handle_admit(&mut self, bet: BetRecord) -> RoundResult<usize> {
        let state = self.live_round_mut(bet.round_id)?;
        state.reserved.remove(&bet.bet_id);

        if state.status != RoundStatus::Open {
            return Err(RoundError::NotOpen(state.round_id));
        }
        if state.admitted_bets.iter().any(|b| b.bet_id == bet.bet_id) {
            return Err(ValidationError::DuplicateBet.into());
        }

        log::debug!(
            "Round {}: admitted bet {} for {}",
            state.round_id,
            bet.bet_id,
            bet.total_stake
        );
        state.admitted_bets.push(bet);
        Ok(state.admitted_bets.len())
    }

    fn handle_close(&mut self, round_id: RoundId, result: GameResult) -> RoundResult<GameResult> {
        let state = self.live_round_mut(round_id)?;
        if state.status != RoundStatus::Open {
            return Err(RoundError::NotOpen(round_id));
        }

        state.status = RoundStatus::Closed;
        state.result = Some(result.clone());
        log::info!(
            "Round {} closed with {} bet(s), {} debit(s) still in flight, result {} ({})",
            round_id,
            state.admitted_bets.len(),
            state.reserved.len(),
            result.winner.chip(),
            result.card
        );
        Ok(result)
    }

    fn handle_begin_settlement(&mut self, round_id: RoundId) -> RoundResult<Option<SettlementBatch>> {
        // A round that is no longer live has already been settled
        let Some(state) = self.state.as_ref().filter(|s| s.round_id == round_id) else {
            return Ok(None);
        };

        if state.status != RoundStatus::Closed {
            return Err(RoundError::NotClosed(round_id));
        }
        let Some(result) = state.result.clone() else {
            return Err(RoundError::MissingResult(round_id));
        };

        Ok(Some(SettlementBatch {
            round_id,
            result,
            bets: state.unsettled_bets(),
        }))
    }

    fn handle_finish(&mut self, round_id: RoundId) -> RoundResult<usize> {
        let state = self.live_round_mut(round_id)?;
        if state.status != RoundStatus::Closed {
            return Err(RoundError::NotClosed(round_id));
        }

        let unsettled = state.admitted_bets.len().saturating_sub(state.settled.len());
        if unsettled > 0 {
            log::warn!(
                "Round {} finished with {} bet(s) never checkpointed",
                round_id,
                unsettled
            );
        }

        let count = state.admitted_bets.len();
        self.state = None;
        log::info!("Round {} settled and cleared ({} bet(s))", round_id, count);
        Ok(count)
    }

    fn snapshot(&self) -> Option<RoundSnapshot> {
        self.state.as_ref().map(|state| RoundSnapshot {
            round_id: state.round_id,
            status: state.status,
            bet_count: state.admitted_bets.len(),
            reserved_count: state.reserved.len(),
            settled_count: state.settled.len(),
            total_staked: state.admitted_bets.iter().map(|b| b.total_stake).sum(),
            result: state.result.clone(),
            bet_ids: state.admitted_bets.iter().map(|b| b.bet_id.clone()).collect(),
        })
    }
}
