//! Bet validation and admission error types.

use crate::game::{Amount, RoundId, format_amount};
use crate::ledger::LedgerError;
use thiserror::Error;

/// Reasons a submission fails validation. Nothing is debited for any of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Submission carried no selections
    #[error("No selections submitted")]
    NoSelections,

    /// Selection could not be parsed
    #[error("Malformed selection: {0}")]
    Malformed(String),

    /// Stake of zero or less
    #[error("Stake must be positive, got {}", money(.0))]
    NonPositiveStake(Amount),

    /// Stake below the configured minimum
    #[error("Stake {} below minimum {}", money(.stake), money(.min))]
    BelowMinimum { stake: Amount, min: Amount },

    /// Stake above the configured maximum
    #[error("Stake {} above maximum {}", money(.stake), money(.max))]
    AboveMaximum { stake: Amount, max: Amount },

    /// Category outside {1, 2, 3}
    #[error("Unknown category {0}")]
    UnknownCategory(u8),

    /// Bet targets a round other than the open one
    #[error("Round {requested} is not the current round")]
    RoundMismatch {
        requested: RoundId,
        current: Option<RoundId>,
    },

    /// Bet targets the current round after its window closed
    #[error("Round {0} is not accepting bets")]
    RoundNotOpen(RoundId),

    /// A bet with this id is already admitted or in flight
    #[error("Bet already placed for this round")]
    DuplicateBet,

    /// Sum of stakes overflowed
    #[error("Total stake overflow")]
    TotalOverflow,
}

/// Admission errors. All are terminal for the submission and never retried.
#[derive(Debug, Error)]
pub enum BetError {
    /// No cached session for the connection
    #[error("Session not found")]
    SessionInvalid,

    /// Validation or round-window failure
    #[error("Invalid bet: {0}")]
    InvalidBet(#[from] ValidationError),

    /// Total stake exceeds the cached balance
    #[error("Insufficient balance: available {}, required {}", money(.available), money(.required))]
    InsufficientBalance { available: Amount, required: Amount },

    /// Ledger rejected the debit, timed out or was unreachable
    #[error("Bet cancelled by upstream: {0}")]
    BetCancelledByUpstream(LedgerError),

    /// Round closed while the debit was in flight; the debit stands and needs reconciliation
    #[error("Round {round_id} closed before bet could be recorded (debit {txn_id})")]
    RoundClosed { round_id: RoundId, txn_id: String },

    /// Round actor unavailable
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BetError {
    /// Message sent to the player in a `betError` event
    pub fn client_message(&self) -> String {
        match self {
            BetError::SessionInvalid => "Invalid Player Details".to_string(),
            BetError::InvalidBet(ValidationError::DuplicateBet) => "BET ALREADY PLACED".to_string(),
            BetError::InvalidBet(_) => "INVALID BET".to_string(),
            BetError::InsufficientBalance { .. } => "INSUFFICIENT BALANCE".to_string(),
            BetError::BetCancelledByUpstream(_) => "BET CANCELLED BY UPSTREAM SERVER".to_string(),
            BetError::RoundClosed { .. } => "ROUND CLOSED, BET NOT PLACED".to_string(),
            BetError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

fn money(amount: &Amount) -> String {
    format_amount(*amount)
}

/// Result type for bet admission
pub type BetResult<T> = Result<T, BetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_messages_name_the_reason() {
        assert_eq!(
            BetError::SessionInvalid.client_message(),
            "Invalid Player Details"
        );
        assert_eq!(
            BetError::from(ValidationError::NonPositiveStake(0)).client_message(),
            "INVALID BET"
        );
        assert_eq!(
            BetError::from(ValidationError::DuplicateBet).client_message(),
            "BET ALREADY PLACED"
        );
        assert_eq!(
            BetError::InsufficientBalance {
                available: 100,
                required: 200
            }
            .client_message(),
            "INSUFFICIENT BALANCE"
        );
        assert_eq!(
            BetError::BetCancelledByUpstream(LedgerError::Rejected("no".to_string()))
                .client_message(),
            "BET CANCELLED BY UPSTREAM SERVER"
        );
    }

    #[test]
    fn test_internal_details_not_leaked() {
        let err = BetError::Internal("round actor stopped".to_string());
        assert!(!err.client_message().contains("actor"));
    }

    #[test]
    fn test_validation_display_formats_amounts() {
        let err = ValidationError::BelowMinimum {
            stake: 5,
            min: 10,
        };
        assert_eq!(err.to_string(), "Stake 0.05 below minimum 0.10");
    }
}
