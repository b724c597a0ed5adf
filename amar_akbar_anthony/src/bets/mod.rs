//! Bets module covering wager parsing, validation and admission.
//!
//! This module implements:
//! - Wire parsing of `"chip-stake,chip-stake"` submissions
//! - Validation against limits and the round window
//! - Admission: reserve under the round actor, debit, record
//! - Client-facing rejection reasons
//!
//! A bet id is `BT:{round}:{player}:{operator}`, so a player holds at most
//! one bet per round.

pub mod admission;
pub mod errors;
pub mod models;
pub mod validator;

pub use admission::BetAdmission;
pub use errors::{BetError, BetResult, ValidationError};
pub use models::{
    BetId, BetReceipt, BetRecord, BetSelection, Connection, Selection, parse_selections,
};
pub use validator::{ValidatedBet, validate};
