//! Weighted outcome resolution.
//!
//! The winning category is drawn first from fixed weights, then a card is
//! drawn uniformly from that category's ranks with a uniform suit.

use super::entities::{Card, Category, GameResult, Suit};
use rand::Rng;

/// Probability of category 3 (Anthony).
pub const CATEGORY_3_PROBABILITY: f64 = 0.235;

/// Probability of category 2 (Akbar). Category 1 takes the remainder.
pub const CATEGORY_2_PROBABILITY: f64 = 0.305;

/// Resolve a round outcome with the thread-local RNG.
pub fn resolve() -> GameResult {
    resolve_with(&mut rand::rng())
}

/// Resolve a round outcome with the supplied RNG.
pub fn resolve_with<R: Rng + ?Sized>(rng: &mut R) -> GameResult {
    let winner = draw_category(rng.random::<f64>());

    let ranks = winner.ranks();
    let rank = ranks[rng.random_range(0..ranks.len())];
    let suit = Suit::ALL[rng.random_range(0..Suit::ALL.len())];

    GameResult::from(Card(rank, suit))
}

/// Map a uniform draw in `[0, 1)` to a category.
fn draw_category(draw: f64) -> Category {
    if draw < CATEGORY_3_PROBABILITY {
        Category::Anthony
    } else if draw < CATEGORY_3_PROBABILITY + CATEGORY_2_PROBABILITY {
        Category::Akbar
    } else {
        Category::Amar
    }
}
