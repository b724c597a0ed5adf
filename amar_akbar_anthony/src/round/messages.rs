//! Round actor message types.

use super::{errors::RoundResult, state::RoundStatus};
use crate::bets::{BetId, BetRecord, Selection, ValidatedBet};
use crate::game::{Amount, GameResult, RoundId};
use tokio::sync::oneshot;

/// Messages that can be sent to a RoundActor
#[derive(Debug)]
pub enum RoundMessage {
    /// Start a new betting window
    OpenRound {
        round_id: RoundId,
        response: oneshot::Sender<RoundResult<()>>,
    },

    /// Validate a submission against the live window and reserve its bet id
    Reserve {
        round_id: RoundId,
        bet_id: BetId,
        selections: Vec<Selection>,
        response: oneshot::Sender<RoundResult<ValidatedBet>>,
    },

    /// Drop a reservation whose debit did not go through
    Release { round_id: RoundId, bet_id: BetId },

    /// Append a debited bet, re-checking the round is still open
    Admit {
        bet: BetRecord,
        response: oneshot::Sender<RoundResult<usize>>,
    },

    /// Freeze the window and fix the round result
    CloseRound {
        round_id: RoundId,
        result: GameResult,
        response: oneshot::Sender<RoundResult<GameResult>>,
    },

    /// Hand the unsettled bets of a closed round to the settlement sweep
    BeginSettlement {
        round_id: RoundId,
        response: oneshot::Sender<RoundResult<Option<SettlementBatch>>>,
    },

    /// Mark one bet as processed by the sweep
    Checkpoint {
        round_id: RoundId,
        bet_id: BetId,
        response: oneshot::Sender<RoundResult<()>>,
    },

    /// Clear the round after every bet was processed
    FinishSettlement {
        round_id: RoundId,
        response: oneshot::Sender<RoundResult<usize>>,
    },

    /// Get a summary of the live round
    GetSnapshot {
        response: oneshot::Sender<Option<RoundSnapshot>>,
    },

    /// Stop the actor
    Shutdown,
}

/// Work handed to the settlement sweep.
#[derive(Debug, Clone)]
pub struct SettlementBatch {
    pub round_id: RoundId,
    pub result: GameResult,
    /// Bets not yet checkpointed, in admission order
    pub bets: Vec<BetRecord>,
}

/// Read-only view of the live round.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RoundSnapshot {
    pub round_id: RoundId,
    pub status: RoundStatus,
    pub bet_count: usize,
    pub reserved_count: usize,
    pub settled_count: usize,
    pub total_staked: Amount,
    pub result: Option<GameResult>,
    pub bet_ids: Vec<BetId>,
}
