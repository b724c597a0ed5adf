//! Round store contract.

use super::{errors::StoreResult, models::RoundSummary};
use crate::bets::BetRecord;
use crate::settlement::SettlementRecord;
use async_trait::async_trait;

/// Persistence of round history
#[async_trait]
pub trait RoundStore: Send + Sync {
    /// Record a completed round
    async fn insert_round(&self, summary: &RoundSummary) -> StoreResult<()>;

    /// Record an admitted bet
    async fn insert_bet(&self, bet: &BetRecord) -> StoreResult<()>;

    /// Record the settlement of a bet
    async fn insert_settlement(&self, record: &SettlementRecord) -> StoreResult<()>;
}
