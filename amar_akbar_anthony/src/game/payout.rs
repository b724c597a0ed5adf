//! Fixed-odds payout table.
//!
//! Multipliers are expressed in hundredths so all arithmetic stays in
//! integer minor units.

use super::entities::{Amount, Category};

/// Payout multiplier for a category, in hundredths (`210` = 2.10x).
pub fn multiplier(category: Category) -> i64 {
    match category {
        Category::Amar => 210,
        Category::Akbar => 315,
        Category::Anthony => 415,
    }
}

/// Payout for one winning selection, rounded half up to the cent and capped
/// at `max_cashout`.
pub fn payout_for(category: Category, stake: Amount, max_cashout: Amount) -> Amount {
    let raw = stake.saturating_mul(multiplier(category)).saturating_add(50) / 100;
    raw.min(max_cashout)
}

/// Multiplier in hundredths as a float for display and serialization.
pub fn multiplier_value(category: Category) -> f64 {
    multiplier(category) as f64 / 100.0
}
