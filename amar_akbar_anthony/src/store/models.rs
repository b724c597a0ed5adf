//! Store data models.

use crate::game::{GameResult, RoundId};
use serde::{Deserialize, Serialize};

/// One completed round as persisted by the scheduler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round_id: RoundId,
    /// Betting window length in seconds
    pub start_delay_secs: u64,
    /// Result display length in seconds
    pub end_delay_secs: u64,
    pub result: GameResult,
}
