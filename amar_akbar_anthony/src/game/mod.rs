//! Card game rules - outcome resolution and the payout table.
//!
//! This module holds the pure parts of a round:
//! - Categories, ranks, suits and money helpers
//! - Weighted outcome resolution (category + representative card)
//! - Fixed-odds payout multipliers and per-selection settlement math

pub mod entities;
pub mod outcome;
pub mod payout;

pub use entities::{
    Amount, Card, Category, GameResult, Rank, RoundId, Suit, format_amount, parse_amount,
};
pub use outcome::{CATEGORY_2_PROBABILITY, CATEGORY_3_PROBABILITY, resolve, resolve_with};
pub use payout::{multiplier, multiplier_value, payout_for};
