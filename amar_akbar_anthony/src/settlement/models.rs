//! Settlement data models.

use crate::bets::BetId;
use crate::game::{Amount, Category, GameResult, RoundId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
}

/// Settled selection, in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionOutcome {
    pub category: Category,
    pub stake: Amount,
    /// Category multiplier in hundredths, serialized as a decimal (`2.1`)
    #[serde(with = "decimal_multiplier")]
    pub multiplier: i64,
    pub payout: Amount,
    pub outcome: Outcome,
}

mod decimal_multiplier {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(hundredths: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(*hundredths as f64 / 100.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Ok((value * 100.0).round() as i64)
    }
}

/// What happened to the credit for a settled bet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum CreditStatus {
    /// Nothing won, no credit issued
    NotRequired,
    /// The gateway accepted the credit
    Accepted,
    /// The credit failed and needs reconciliation
    Failed(String),
}

impl CreditStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, CreditStatus::Failed(_))
    }
}

/// Settlement of one admitted bet. Exactly one exists per bet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub bet_id: BetId,
    pub round_id: RoundId,
    pub player_id: String,
    pub operator_id: String,
    pub total_stake: Amount,
    pub outcomes: Vec<SelectionOutcome>,
    pub total_payout: Amount,
    /// Sum of winning multipliers, in hundredths
    pub total_multiplier: i64,
    pub result: GameResult,
    pub credit: CreditStatus,
    pub settled_at: DateTime<Utc>,
}

impl SettlementRecord {
    pub fn is_win(&self) -> bool {
        self.total_payout > 0
    }
}
