/// Property-based tests for validation and settlement using proptest
///
/// These tests check the payout laws for arbitrary submissions: totals add
/// up, losses pay nothing, wins never exceed the cashout cap.
use amar_akbar_anthony::bets::{BetId, BetRecord, Selection, validate};
use amar_akbar_anthony::game::{Amount, Category, GameResult, multiplier};
use amar_akbar_anthony::round::{GameConfig, RoundWindow};
use amar_akbar_anthony::settlement::{Outcome, settle_bet};
use chrono::Utc;
use proptest::prelude::*;

fn category_strategy() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::Amar),
        Just(Category::Akbar),
        Just(Category::Anthony),
    ]
}

// Stakes within the default limits
fn selections_strategy() -> impl Strategy<Value = Vec<Selection>> {
    prop::collection::vec((1u8..=3, 10i64..=100_000), 1..=6)
        .prop_map(|pairs| pairs.into_iter().map(|(c, s)| Selection::new(c, s)).collect())
}

fn record_for(selections: &[Selection]) -> BetRecord {
    let validated = validate(selections, 1, &RoundWindow::open(1), &GameConfig::default())
        .expect("strategy only yields valid selections");

    BetRecord {
        bet_id: BetId::new(1, "p", "op"),
        round_id: 1,
        player_id: "p".to_string(),
        operator_id: "op".to_string(),
        game_id: "aaa".to_string(),
        session_key: "s".to_string(),
        token: "t".to_string(),
        origin_ip: "127.0.0.1".to_string(),
        total_stake: validated.total_stake,
        selections: validated.selections,
        ledger_txn_id: "txn".to_string(),
        placed_at: Utc::now(),
    }
}

proptest! {
    #[test]
    fn test_total_stake_is_sum_of_selections(selections in selections_strategy()) {
        let bet = record_for(&selections);
        let sum: Amount = selections.iter().map(|s| s.stake).sum();
        prop_assert_eq!(bet.total_stake, sum);
        prop_assert_eq!(bet.selections.len(), selections.len());
    }

    #[test]
    fn test_total_payout_is_sum_of_wins(
        selections in selections_strategy(),
        winner in category_strategy(),
        max_cashout in 1i64..=2_000_000,
    ) {
        let bet = record_for(&selections);
        let record = settle_bet(&bet, &GameResult::new(winner, "x"), max_cashout);

        let wins: Amount = record
            .outcomes
            .iter()
            .filter(|o| o.outcome == Outcome::Win)
            .map(|o| o.payout)
            .sum();
        prop_assert_eq!(record.total_payout, wins);
        prop_assert!(record.total_payout >= 0);
    }

    #[test]
    fn test_each_outcome_follows_the_table(
        selections in selections_strategy(),
        winner in category_strategy(),
        max_cashout in 1i64..=2_000_000,
    ) {
        let bet = record_for(&selections);
        let record = settle_bet(&bet, &GameResult::new(winner, "x"), max_cashout);

        for (selection, outcome) in bet.selections.iter().zip(&record.outcomes) {
            prop_assert_eq!(selection.category, outcome.category);
            prop_assert_eq!(outcome.multiplier, multiplier(selection.category));
            if selection.category == winner {
                let uncapped = (selection.stake * multiplier(winner) + 50) / 100;
                prop_assert_eq!(outcome.payout, uncapped.min(max_cashout));
                prop_assert!(outcome.payout <= max_cashout);
            } else {
                prop_assert_eq!(outcome.outcome, Outcome::Loss);
                prop_assert_eq!(outcome.payout, 0);
            }
        }
    }

    #[test]
    fn test_unknown_category_rejects_submission(
        mut selections in selections_strategy(),
        chip in 4u8..=255,
    ) {
        selections.push(Selection::new(chip, 100));
        let result = validate(&selections, 1, &RoundWindow::open(1), &GameConfig::default());
        prop_assert!(result.is_err());
    }
}
