//! Bet validation.
//!
//! Stateless checks of a submission against the configured limits and the
//! round window. The round actor runs `validate` against its live window so
//! the round check and the reservation happen at one serialization point.

use super::{
    errors::ValidationError,
    models::{BetSelection, Selection},
};
use crate::game::{Amount, Category, RoundId};
use crate::round::{GameConfig, RoundWindow};

/// A submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBet {
    pub selections: Vec<BetSelection>,
    pub total_stake: Amount,
}

/// Validate every selection of one submission.
///
/// Any invalid selection rejects the whole submission.
pub fn validate(
    selections: &[Selection],
    round_id: RoundId,
    window: &RoundWindow,
    config: &GameConfig,
) -> Result<ValidatedBet, ValidationError> {
    if selections.is_empty() {
        return Err(ValidationError::NoSelections);
    }

    let mut validated = Vec::with_capacity(selections.len());
    let mut total_stake: Amount = 0;

    for selection in selections {
        let stake = selection.stake;
        if stake <= 0 {
            return Err(ValidationError::NonPositiveStake(stake));
        }
        if stake < config.min_bet {
            return Err(ValidationError::BelowMinimum {
                stake,
                min: config.min_bet,
            });
        }
        if stake > config.max_bet {
            return Err(ValidationError::AboveMaximum {
                stake,
                max: config.max_bet,
            });
        }

        let category = Category::from_chip(selection.chip)
            .ok_or(ValidationError::UnknownCategory(selection.chip))?;

        total_stake = total_stake
            .checked_add(stake)
            .ok_or(ValidationError::TotalOverflow)?;
        validated.push(BetSelection { category, stake });
    }

    window.check(round_id)?;

    Ok(ValidatedBet {
        selections: validated,
        total_stake,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::RoundStatus;

    fn config() -> GameConfig {
        GameConfig {
            min_bet: 100,
            max_bet: 10_000,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_valid_submission_totals_stakes() {
        let selections = [Selection::new(1, 1000), Selection::new(2, 500)];
        let bet = validate(&selections, 7, &RoundWindow::open(7), &config()).unwrap();
        assert_eq!(bet.total_stake, 1500);
        assert_eq!(bet.selections[0].category, Category::Amar);
        assert_eq!(bet.selections[1].category, Category::Akbar);
    }

    #[test]
    fn test_zero_stake_rejected() {
        let selections = [Selection::new(2, 0)];
        assert_eq!(
            validate(&selections, 7, &RoundWindow::open(7), &config()),
            Err(ValidationError::NonPositiveStake(0))
        );
    }

    #[test]
    fn test_limits_enforced() {
        let window = RoundWindow::open(7);
        assert!(matches!(
            validate(&[Selection::new(1, 99)], 7, &window, &config()),
            Err(ValidationError::BelowMinimum { .. })
        ));
        assert!(matches!(
            validate(&[Selection::new(1, 10_001)], 7, &window, &config()),
            Err(ValidationError::AboveMaximum { .. })
        ));
        assert!(validate(&[Selection::new(1, 100)], 7, &window, &config()).is_ok());
        assert!(validate(&[Selection::new(1, 10_000)], 7, &window, &config()).is_ok());
    }

    #[test]
    fn test_one_bad_selection_rejects_all() {
        let selections = [Selection::new(1, 1000), Selection::new(4, 1000)];
        assert_eq!(
            validate(&selections, 7, &RoundWindow::open(7), &config()),
            Err(ValidationError::UnknownCategory(4))
        );
    }

    #[test]
    fn test_round_window_enforced() {
        let selections = [Selection::new(1, 1000)];
        assert!(matches!(
            validate(&selections, 6, &RoundWindow::open(7), &config()),
            Err(ValidationError::RoundMismatch { .. })
        ));

        let closed = RoundWindow {
            current: Some((7, RoundStatus::Closed)),
        };
        assert_eq!(
            validate(&selections, 7, &closed, &config()),
            Err(ValidationError::RoundNotOpen(7))
        );
    }

    #[test]
    fn test_empty_submission_rejected() {
        assert_eq!(
            validate(&[], 7, &RoundWindow::open(7), &config()),
            Err(ValidationError::NoSelections)
        );
    }
}
