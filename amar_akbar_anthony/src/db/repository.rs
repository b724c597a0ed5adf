//! PostgreSQL implementation of the round store.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::bets::BetRecord;
use crate::settlement::{CreditStatus, SettlementRecord};
use crate::store::{RoundStore, RoundSummary, StoreError, StoreResult};

/// Round store writing to the `rounds`, `bets` and `settlements` tables
#[derive(Clone)]
pub struct PgRoundStore {
    pool: PgPool,
}

impl PgRoundStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a unique-key violation to `Duplicate`, anything else to `Database`
fn insert_error(err: sqlx::Error, key: String) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate(key),
        _ => StoreError::Database(err),
    }
}

fn credit_columns(credit: &CreditStatus) -> (&'static str, Option<&str>) {
    match credit {
        CreditStatus::NotRequired => ("not_required", None),
        CreditStatus::Accepted => ("accepted", None),
        CreditStatus::Failed(reason) => ("failed", Some(reason.as_str())),
    }
}

#[async_trait]
impl RoundStore for PgRoundStore {
    async fn insert_round(&self, summary: &RoundSummary) -> StoreResult<()> {
        let result = serde_json::to_string(&summary.result)?;

        sqlx::query(
            "INSERT INTO rounds (round_id, start_delay_secs, end_delay_secs, result)
             VALUES ($1, $2, $3, $4::jsonb)",
        )
        .bind(summary.round_id)
        .bind(summary.start_delay_secs as i64)
        .bind(summary.end_delay_secs as i64)
        .bind(result)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, format!("round {}", summary.round_id)))?;

        Ok(())
    }

    async fn insert_bet(&self, bet: &BetRecord) -> StoreResult<()> {
        let selections = serde_json::to_string(&bet.selections)?;

        sqlx::query(
            "INSERT INTO bets (bet_id, round_id, user_id, operator_id, game_id, txn_id, ip,
                               total_stake, selections, placed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9::jsonb, $10)",
        )
        .bind(bet.bet_id.as_str())
        .bind(bet.round_id)
        .bind(&bet.player_id)
        .bind(&bet.operator_id)
        .bind(&bet.game_id)
        .bind(&bet.ledger_txn_id)
        .bind(&bet.origin_ip)
        .bind(bet.total_stake)
        .bind(selections)
        .bind(bet.placed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, format!("bet {}", bet.bet_id)))?;

        Ok(())
    }

    async fn insert_settlement(&self, record: &SettlementRecord) -> StoreResult<()> {
        let outcomes = serde_json::to_string(&record.outcomes)?;
        let result = serde_json::to_string(&record.result)?;
        let (credit_status, credit_reason) = credit_columns(&record.credit);

        sqlx::query(
            "INSERT INTO settlements (bet_id, round_id, user_id, operator_id, total_stake,
                                      win_amount, total_multiplier, outcomes, result,
                                      credit_status, credit_reason, settled_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8::jsonb, $9::jsonb, $10, $11, $12)",
        )
        .bind(record.bet_id.as_str())
        .bind(record.round_id)
        .bind(&record.player_id)
        .bind(&record.operator_id)
        .bind(record.total_stake)
        .bind(record.total_payout)
        .bind(record.total_multiplier)
        .bind(outcomes)
        .bind(result)
        .bind(credit_status)
        .bind(credit_reason)
        .bind(record.settled_at)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, format!("settlement {}", record.bet_id)))?;

        Ok(())
    }
}
