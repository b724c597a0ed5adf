//! Game configuration models.

use crate::game::Amount;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default bound on every ledger call.
pub const DEFAULT_LEDGER_TIMEOUT: Duration = Duration::from_secs(5);

/// Wagering limits and settlement caps, all in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Game name used in ledger descriptions
    pub name: String,

    /// Minimum stake per selection (default: 0.10)
    pub min_bet: Amount,

    /// Maximum stake per selection (default: 1,000.00)
    pub max_bet: Amount,

    /// Maximum payout of a single winning selection (default: 10,000.00)
    pub max_cashout: Amount,

    /// Ledger call timeout in seconds (default: 5)
    pub ledger_timeout_secs: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            name: "Amar Akbar Anthony".to_string(),
            min_bet: 10,
            max_bet: 100_000,
            max_cashout: 1_000_000,
            ledger_timeout_secs: DEFAULT_LEDGER_TIMEOUT.as_secs(),
        }
    }
}

impl GameConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.min_bet <= 0 {
            return Err("Minimum bet must be positive".to_string());
        }

        if self.max_bet < self.min_bet {
            return Err("Maximum bet must be at least the minimum bet".to_string());
        }

        if self.max_cashout <= 0 {
            return Err("Maximum cashout must be positive".to_string());
        }

        if self.ledger_timeout_secs == 0 {
            return Err("Ledger timeout must be at least one second".to_string());
        }

        Ok(())
    }

    pub fn ledger_timeout(&self) -> Duration {
        Duration::from_secs(self.ledger_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ledger_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_inverted_limits_rejected() {
        let config = GameConfig {
            min_bet: 500,
            max_bet: 100,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = GameConfig {
            ledger_timeout_secs: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
