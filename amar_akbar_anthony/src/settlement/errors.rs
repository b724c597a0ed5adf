//! Settlement error types.

use crate::game::RoundId;
use crate::round::RoundError;
use thiserror::Error;

/// Settlement errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    #[error("Round {0} is still open")]
    RoundNotClosed(RoundId),

    #[error("Round {0} closed without a result")]
    MissingResult(RoundId),

    #[error("Round error: {0}")]
    Round(RoundError),
}

impl From<RoundError> for SettlementError {
    fn from(err: RoundError) -> Self {
        match err {
            RoundError::NotClosed(round_id) => SettlementError::RoundNotClosed(round_id),
            RoundError::MissingResult(round_id) => SettlementError::MissingResult(round_id),
            other => SettlementError::Round(other),
        }
    }
}

impl SettlementError {
    /// Get a client-safe error message
    pub fn client_message(&self) -> String {
        match self {
            SettlementError::Round(err) => err.client_message(),
            _ => self.to_string(),
        }
    }
}

/// Result type for settlement operations
pub type SettlementResult<T> = Result<T, SettlementError>;
