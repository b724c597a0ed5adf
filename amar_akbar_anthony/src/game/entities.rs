use serde::{Deserialize, Serialize};
use std::fmt;

/// Money in minor units (cents).
pub type Amount = i64;

/// Round identifier assigned by the scheduler.
pub type RoundId = i64;

/// One of the three wager targets.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Category {
    /// Amar: A through 6.
    Amar,
    /// Akbar: 7 through 10.
    Akbar,
    /// Anthony: J, Q, K.
    Anthony,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Amar, Category::Akbar, Category::Anthony];

    /// Category for a wire chip number, `None` outside {1, 2, 3}.
    pub fn from_chip(chip: u8) -> Option<Self> {
        match chip {
            1 => Some(Self::Amar),
            2 => Some(Self::Akbar),
            3 => Some(Self::Anthony),
            _ => None,
        }
    }

    pub fn chip(self) -> u8 {
        match self {
            Self::Amar => 1,
            Self::Akbar => 2,
            Self::Anthony => 3,
        }
    }

    /// Ranks that resolve to this category.
    pub fn ranks(self) -> &'static [Rank] {
        match self {
            Self::Amar => &[
                Rank::Ace,
                Rank::Two,
                Rank::Three,
                Rank::Four,
                Rank::Five,
                Rank::Six,
            ],
            Self::Akbar => &[Rank::Seven, Rank::Eight, Rank::Nine, Rank::Ten],
            Self::Anthony => &[Rank::Jack, Rank::Queen, Rank::King],
        }
    }
}

impl From<Category> for u8 {
    fn from(category: Category) -> Self {
        category.chip()
    }
}

impl TryFrom<u8> for Category {
    type Error = String;

    fn try_from(chip: u8) -> Result<Self, Self::Error> {
        Category::from_chip(chip).ok_or_else(|| format!("unknown category {chip}"))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Amar => "Amar",
            Self::Akbar => "Akbar",
            Self::Anthony => "Anthony",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    pub fn category(self) -> Category {
        match self {
            Self::Ace | Self::Two | Self::Three | Self::Four | Self::Five | Self::Six => {
                Category::Amar
            }
            Self::Seven | Self::Eight | Self::Nine | Self::Ten => Category::Akbar,
            Self::Jack | Self::Queen | Self::King => Category::Anthony,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Ace => "A",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Suit {
    Diamond,
    Heart,
    Club,
    Spade,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Diamond, Suit::Heart, Suit::Club, Suit::Spade];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Diamond => "D",
            Self::Heart => "H",
            Self::Club => "C",
            Self::Spade => "S",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Card(pub Rank, pub Suit);

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

/// Outcome of a round. The card label is informational and never affects payouts.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Category,
    pub card: String,
}

impl GameResult {
    pub fn new(winner: Category, card: impl Into<String>) -> Self {
        Self {
            winner,
            card: card.into(),
        }
    }
}

impl From<Card> for GameResult {
    fn from(card: Card) -> Self {
        Self {
            winner: card.0.category(),
            card: card.to_string(),
        }
    }
}

/// Format minor units with two decimals, e.g. `2100` -> `"21.00"`.
pub fn format_amount(amount: Amount) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Parse a decimal string into minor units.
///
/// Accepts at most two fractional digits. Returns `None` for anything else,
/// including empty input and exponents.
pub fn parse_amount(input: &str) -> Option<Amount> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if fraction.len() > 2
        || !whole.chars().all(|c| c.is_ascii_digit())
        || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };

    let amount = whole.checked_mul(100)?.checked_add(cents)?;
    Some(if negative { -amount } else { amount })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_chip_roundtrip() {
        for category in Category::ALL {
            assert_eq!(Category::from_chip(category.chip()), Some(category));
        }
        assert_eq!(Category::from_chip(0), None);
        assert_eq!(Category::from_chip(4), None);
    }

    #[test]
    fn test_rank_partition_matches_categories() {
        let mut total = 0;
        for category in Category::ALL {
            for rank in category.ranks() {
                assert_eq!(rank.category(), category);
                total += 1;
            }
        }
        assert_eq!(total, 13);
    }

    #[test]
    fn test_card_label() {
        assert_eq!(Card(Rank::Ten, Suit::Heart).to_string(), "10-H");
        assert_eq!(Card(Rank::Ace, Suit::Spade).to_string(), "A-S");
        let result = GameResult::from(Card(Rank::Queen, Suit::Club));
        assert_eq!(result.winner, Category::Anthony);
        assert_eq!(result.card, "Q-C");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("10"), Some(1000));
        assert_eq!(parse_amount("10.5"), Some(1050));
        assert_eq!(parse_amount("10.05"), Some(1005));
        assert_eq!(parse_amount(".25"), Some(25));
        assert_eq!(parse_amount("0"), Some(0));
        assert_eq!(parse_amount("-1.00"), Some(-100));
        assert_eq!(parse_amount("1.005"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("1e3"), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(2100), "21.00");
        assert_eq!(format_amount(5), "0.05");
        assert_eq!(format_amount(0), "0.00");
        assert_eq!(format_amount(-150), "-1.50");
    }

    #[test]
    fn test_category_serializes_as_chip() {
        let json = serde_json::to_string(&Category::Akbar).unwrap();
        assert_eq!(json, "2");
        let parsed: Category = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, Category::Anthony);
        assert!(serde_json::from_str::<Category>("7").is_err());
    }
}
