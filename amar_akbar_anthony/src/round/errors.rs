//! Round state error types.

use crate::bets::ValidationError;
use crate::game::RoundId;
use thiserror::Error;

/// Round actor errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    /// Actor task stopped
    #[error("Round actor is not running")]
    ActorClosed,

    /// A previous round has not finished settlement
    #[error("Round {0} is still live")]
    RoundStillLive(RoundId),

    /// No round is live
    #[error("No live round")]
    NoLiveRound,

    /// Request names a round other than the live one
    #[error("Round {requested} does not match live round {current}")]
    RoundMismatch { requested: RoundId, current: RoundId },

    /// Operation requires an open round
    #[error("Round {0} is not open")]
    NotOpen(RoundId),

    /// Operation requires a closed round
    #[error("Round {0} is not closed")]
    NotClosed(RoundId),

    /// Closed round has no stored result
    #[error("Round {0} has no result")]
    MissingResult(RoundId),

    /// Submission rejected by validation or the round window
    #[error("Rejected: {0}")]
    Rejected(#[from] ValidationError),
}

impl RoundError {
    /// Get a client-safe error message
    pub fn client_message(&self) -> String {
        match self {
            RoundError::ActorClosed => "Internal server error".to_string(),
            RoundError::Rejected(err) => err.to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for round operations
pub type RoundResult<T> = Result<T, RoundError>;
