//! Settlement module: payouts for a closed round.
//!
//! The calculator is pure. The engine drives the sweep through the round
//! actor, issues credits for winners and reports each result to its player.
//! A failed credit is recorded on its settlement and never stops the sweep.

pub mod calculator;
pub mod engine;
pub mod errors;
pub mod models;

pub use calculator::settle_bet;
pub use engine::SettlementEngine;
pub use errors::{SettlementError, SettlementResult};
pub use models::{CreditStatus, Outcome, SelectionOutcome, SettlementRecord};
