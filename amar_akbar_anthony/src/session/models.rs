//! Session data models.

use crate::game::{Amount, format_amount};
use crate::ledger::OperatorContext;
use serde::{Deserialize, Serialize};

/// Context cached for a connected player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSession {
    pub player_id: String,
    pub operator_id: String,
    pub token: String,
    pub game_id: String,
    /// Last known balance in minor units
    pub balance: Amount,
}

impl PlayerSession {
    pub fn new(
        player_id: impl Into<String>,
        operator_id: impl Into<String>,
        token: impl Into<String>,
        game_id: impl Into<String>,
        balance: Amount,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            operator_id: operator_id.into(),
            token: token.into(),
            game_id: game_id.into(),
            balance,
        }
    }

    /// Operator details for ledger calls on behalf of this player
    pub fn operator_context(&self) -> OperatorContext {
        OperatorContext {
            game_id: self.game_id.clone(),
            operator_id: self.operator_id.clone(),
            token: self.token.clone(),
        }
    }

    pub fn display_balance(&self) -> String {
        format_amount(self.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_context_copies_fields() {
        let session = PlayerSession::new("p1", "op1", "tok", "aaa", 5000);
        let ctx = session.operator_context();
        assert_eq!(ctx.operator_id, "op1");
        assert_eq!(ctx.token, "tok");
        assert_eq!(ctx.game_id, "aaa");
        assert_eq!(session.display_balance(), "50.00");
    }
}
