//! Bet data models.

use crate::game::{Amount, Category, RoundId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::ValidationError;

/// Bet identifier derived from round, player and operator.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BetId(String);

impl BetId {
    pub fn new(round_id: RoundId, player_id: &str, operator_id: &str) -> Self {
        Self(format!("BT:{round_id}:{player_id}:{operator_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw selection as submitted by a player, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub chip: u8,
    pub stake: Amount,
}

impl Selection {
    pub fn new(chip: u8, stake: Amount) -> Self {
        Self { chip, stake }
    }
}

/// Validated selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetSelection {
    pub category: Category,
    pub stake: Amount,
}

/// One player's admitted wager for a round.
///
/// Only constructed after the ledger confirmed the debit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetRecord {
    pub bet_id: BetId,
    pub round_id: RoundId,
    pub player_id: String,
    pub operator_id: String,
    pub game_id: String,
    /// Connection that receives this bet's notifications.
    pub session_key: String,
    pub token: String,
    pub origin_ip: String,
    pub total_stake: Amount,
    pub selections: Vec<BetSelection>,
    pub ledger_txn_id: String,
    pub placed_at: DateTime<Utc>,
}

/// Connection a submission arrived on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub session_key: String,
    pub origin_ip: String,
}

impl Connection {
    pub fn new(session_key: impl Into<String>, origin_ip: impl Into<String>) -> Self {
        Self {
            session_key: session_key.into(),
            origin_ip: origin_ip.into(),
        }
    }
}

/// Acknowledgement returned for an admitted bet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetReceipt {
    pub bet_id: BetId,
    pub round_id: RoundId,
    pub total_stake: Amount,
    pub ledger_txn_id: String,
    pub balance: Amount,
}

/// Parse the wire form `"chip-stake,chip-stake"`, e.g. `"1-10.00,2-5"`.
pub fn parse_selections(input: &str) -> Result<Vec<Selection>, ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::NoSelections);
    }

    input
        .split(',')
        .map(|entry| {
            let (chip, stake) = entry
                .trim()
                .split_once('-')
                .ok_or_else(|| ValidationError::Malformed(entry.to_string()))?;
            let chip = chip
                .trim()
                .parse::<u8>()
                .map_err(|_| ValidationError::Malformed(entry.to_string()))?;
            let stake = crate::game::parse_amount(stake)
                .ok_or_else(|| ValidationError::Malformed(entry.to_string()))?;
            Ok(Selection { chip, stake })
        })
        .collect()
}
