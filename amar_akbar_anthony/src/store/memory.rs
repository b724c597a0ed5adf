//! In-memory round store.

use super::{
    errors::{StoreError, StoreResult},
    models::RoundSummary,
    repository::RoundStore,
};
use crate::bets::BetRecord;
use crate::game::RoundId;
use crate::settlement::SettlementRecord;
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    rounds: Vec<RoundSummary>,
    bets: Vec<BetRecord>,
    settlements: Vec<SettlementRecord>,
}

/// Round store keeping every record in insertion order
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn rounds(&self) -> Vec<RoundSummary> {
        self.tables.read().await.rounds.clone()
    }

    pub async fn bets(&self) -> Vec<BetRecord> {
        self.tables.read().await.bets.clone()
    }

    pub async fn settlements(&self) -> Vec<SettlementRecord> {
        self.tables.read().await.settlements.clone()
    }

    /// Settlements stored for one round
    pub async fn settlements_for(&self, round_id: RoundId) -> Vec<SettlementRecord> {
        self.tables
            .read()
            .await
            .settlements
            .iter()
            .filter(|s| s.round_id == round_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RoundStore for MemoryStore {
    async fn insert_round(&self, summary: &RoundSummary) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.rounds.iter().any(|r| r.round_id == summary.round_id) {
            return Err(StoreError::Duplicate(format!("round {}", summary.round_id)));
        }
        tables.rounds.push(summary.clone());
        Ok(())
    }

    async fn insert_bet(&self, bet: &BetRecord) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.bets.iter().any(|b| b.bet_id == bet.bet_id) {
            return Err(StoreError::Duplicate(format!("bet {}", bet.bet_id)));
        }
        tables.bets.push(bet.clone());
        Ok(())
    }

    async fn insert_settlement(&self, record: &SettlementRecord) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.settlements.iter().any(|s| s.bet_id == record.bet_id) {
            return Err(StoreError::Duplicate(format!("settlement {}", record.bet_id)));
        }
        tables.settlements.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Category, GameResult};

    fn summary(round_id: RoundId) -> RoundSummary {
        RoundSummary {
            round_id,
            start_delay_secs: 15,
            end_delay_secs: 6,
            result: GameResult::new(Category::Akbar, "10-C"),
        }
    }

    #[tokio::test]
    async fn test_rounds_keep_insertion_order() {
        let store = MemoryStore::new();
        store.insert_round(&summary(2)).await.unwrap();
        store.insert_round(&summary(1)).await.unwrap();

        let ids: Vec<_> = store.rounds().await.iter().map(|r| r.round_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_duplicate_round_rejected() {
        let store = MemoryStore::new();
        store.insert_round(&summary(5)).await.unwrap();
        let err = store.insert_round(&summary(5)).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(err.client_message(), "Duplicate record: round 5");
    }
}
