//! Ledger gateway contract and request models.

use super::errors::LedgerResult;
use crate::bets::BetId;
use crate::game::{Amount, RoundId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Operator details attached to every ledger call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorContext {
    pub game_id: String,
    pub operator_id: String,
    pub token: String,
}

/// Debit of a player's stake for one bet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebitRequest {
    /// Caller-chosen transaction id, persisted with the bet
    pub txn_id: String,
    pub round_id: RoundId,
    pub bet_id: BetId,
    pub player_id: String,
    pub amount: Amount,
    pub ip: String,
    pub operator: OperatorContext,
}

/// Confirmation of a debit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebitReceipt {
    pub txn_id: String,
}

/// Credit of a winning payout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditRequest {
    pub txn_id: String,
    pub round_id: RoundId,
    pub player_id: String,
    pub amount: Amount,
    /// Transaction id of the original debit
    pub txn_ref_id: String,
    pub ip: String,
    pub operator: OperatorContext,
}

/// Account-of-record for player funds.
///
/// Implementations never hold round state. A credit may be confirmed
/// synchronously or only acknowledged for later dispatch.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Debit a stake. `Ok` only when the account-of-record accepted it.
    async fn debit(&self, request: DebitRequest) -> LedgerResult<DebitReceipt>;

    /// Credit a payout.
    async fn credit(&self, request: CreditRequest) -> LedgerResult<()>;
}

/// Fresh time-ordered transaction id
pub fn new_txn_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
