//! Pure payout computation for one bet.

use super::models::{CreditStatus, Outcome, SelectionOutcome, SettlementRecord};
use crate::bets::BetRecord;
use crate::game::{Amount, GameResult, multiplier, payout_for};
use chrono::Utc;

/// Settle a bet against a round result.
///
/// Selections are evaluated in submission order. A winning selection pays
/// `stake * multiplier` rounded half up and capped at `max_cashout`; a losing
/// one pays nothing but still reports its category's multiplier. The returned record carries `CreditStatus::NotRequired`
/// until a credit is attempted.
pub fn settle_bet(bet: &BetRecord, result: &GameResult, max_cashout: Amount) -> SettlementRecord {
    let outcomes: Vec<SelectionOutcome> = bet
        .selections
        .iter()
        .map(|selection| {
            if selection.category == result.winner {
                SelectionOutcome {
                    category: selection.category,
                    stake: selection.stake,
                    multiplier: multiplier(selection.category),
                    payout: payout_for(selection.category, selection.stake, max_cashout),
                    outcome: Outcome::Win,
                }
            } else {
                SelectionOutcome {
                    category: selection.category,
                    stake: selection.stake,
                    multiplier: multiplier(selection.category),
                    payout: 0,
                    outcome: Outcome::Loss,
                }
            }
        })
        .collect();

    let total_payout = outcomes
        .iter()
        .fold(0 as Amount, |acc, o| acc.saturating_add(o.payout));
    let total_multiplier = outcomes
        .iter()
        .filter(|o| o.outcome == Outcome::Win)
        .map(|o| o.multiplier)
        .sum();

    SettlementRecord {
        bet_id: bet.bet_id.clone(),
        round_id: bet.round_id,
        player_id: bet.player_id.clone(),
        operator_id: bet.operator_id.clone(),
        total_stake: bet.total_stake,
        outcomes,
        total_payout,
        total_multiplier,
        result: result.clone(),
        credit: CreditStatus::NotRequired,
        settled_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bets::{BetId, BetSelection};
    use crate::game::Category;

    fn bet(selections: &[(Category, Amount)]) -> BetRecord {
        BetRecord {
            bet_id: BetId::new(7, "p1", "op1"),
            round_id: 7,
            player_id: "p1".to_string(),
            operator_id: "op1".to_string(),
            game_id: "aaa".to_string(),
            session_key: "s1".to_string(),
            token: "tok".to_string(),
            origin_ip: "127.0.0.1".to_string(),
            total_stake: selections.iter().map(|(_, s)| s).sum(),
            selections: selections
                .iter()
                .map(|&(category, stake)| BetSelection { category, stake })
                .collect(),
            ledger_txn_id: "txn".to_string(),
            placed_at: Utc::now(),
        }
    }

    #[test]
    fn test_round_seven_example() {
        let bet = bet(&[(Category::Amar, 1000), (Category::Akbar, 500)]);
        let record = settle_bet(&bet, &GameResult::new(Category::Amar, "4-H"), 1_000_000);

        assert_eq!(record.outcomes[0].payout, 2100);
        assert_eq!(record.outcomes[0].outcome, Outcome::Win);
        assert_eq!(record.outcomes[1].payout, 0);
        assert_eq!(record.outcomes[1].outcome, Outcome::Loss);
        assert_eq!(record.outcomes[1].multiplier, 315);
        assert_eq!(record.total_payout, 2100);
        assert_eq!(record.total_multiplier, 210);
        assert_eq!(record.total_stake, 1500);
        assert!(record.is_win());
    }

    #[test]
    fn test_all_lose() {
        let bet = bet(&[(Category::Amar, 1000), (Category::Akbar, 500)]);
        let record = settle_bet(&bet, &GameResult::new(Category::Anthony, "K-S"), 1_000_000);

        assert_eq!(record.total_payout, 0);
        assert_eq!(record.total_multiplier, 0);
        let multipliers: Vec<_> = record.outcomes.iter().map(|o| o.multiplier).collect();
        assert_eq!(multipliers, vec![210, 315]);
        assert!(!record.is_win());
        assert_eq!(record.credit, CreditStatus::NotRequired);
    }

    #[test]
    fn test_order_preserved() {
        let bet = bet(&[
            (Category::Anthony, 100),
            (Category::Amar, 200),
            (Category::Akbar, 300),
        ]);
        let record = settle_bet(&bet, &GameResult::new(Category::Akbar, "9-D"), 1_000_000);
        let categories: Vec<_> = record.outcomes.iter().map(|o| o.category).collect();
        assert_eq!(
            categories,
            vec![Category::Anthony, Category::Amar, Category::Akbar]
        );
        assert_eq!(record.total_payout, 945);
    }

    #[test]
    fn test_cashout_cap_applies_per_selection() {
        let bet = bet(&[(Category::Anthony, 100_000)]);
        let record = settle_bet(&bet, &GameResult::new(Category::Anthony, "Q-C"), 300_000);
        assert_eq!(record.total_payout, 300_000);
    }
}
