//! Round state owned by the round actor.

use crate::bets::{BetId, BetRecord, ValidationError};
use crate::game::{GameResult, RoundId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Betting status of the live round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundStatus {
    Open,
    Closed,
}

impl std::fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundStatus::Open => write!(f, "open"),
            RoundStatus::Closed => write!(f, "closed"),
        }
    }
}

/// Acceptance window a submission is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundWindow {
    pub current: Option<(RoundId, RoundStatus)>,
}

impl RoundWindow {
    pub fn open(round_id: RoundId) -> Self {
        Self {
            current: Some((round_id, RoundStatus::Open)),
        }
    }

    pub fn none() -> Self {
        Self { current: None }
    }

    /// Accept only the current round while it is open.
    pub fn check(&self, requested: RoundId) -> Result<(), ValidationError> {
        match self.current {
            Some((round_id, RoundStatus::Open)) if round_id == requested => Ok(()),
            Some((round_id, RoundStatus::Closed)) if round_id == requested => {
                Err(ValidationError::RoundNotOpen(requested))
            }
            current => Err(ValidationError::RoundMismatch {
                requested,
                current: current.map(|(round_id, _)| round_id),
            }),
        }
    }
}

/// The single live round.
#[derive(Debug, Clone)]
pub struct RoundState {
    pub round_id: RoundId,
    pub status: RoundStatus,
    /// Append-only while open, drained only by settlement
    pub admitted_bets: Vec<BetRecord>,
    /// Fixed once at close
    pub result: Option<GameResult>,
    /// Bet ids whose debit is in flight
    pub reserved: HashSet<BetId>,
    /// Bet ids already processed by the settlement sweep
    pub settled: HashSet<BetId>,
}

impl RoundState {
    pub fn new(round_id: RoundId) -> Self {
        Self {
            round_id,
            status: RoundStatus::Open,
            admitted_bets: Vec::new(),
            result: None,
            reserved: HashSet::new(),
            settled: HashSet::new(),
        }
    }

    pub fn window(&self) -> RoundWindow {
        RoundWindow {
            current: Some((self.round_id, self.status)),
        }
    }

    pub fn contains_bet(&self, bet_id: &BetId) -> bool {
        self.reserved.contains(bet_id) || self.admitted_bets.iter().any(|b| &b.bet_id == bet_id)
    }

    /// Bets not yet checkpointed by the sweep, in admission order
    pub fn unsettled_bets(&self) -> Vec<BetRecord> {
        self.admitted_bets
            .iter()
            .filter(|bet| !self.settled.contains(&bet.bet_id))
            .cloned()
            .collect()
    }
}
