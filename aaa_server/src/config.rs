//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use amar_akbar_anthony::db::DatabaseConfig;
use amar_akbar_anthony::game::{Amount, parse_amount};
use amar_akbar_anthony::ledger::DEFAULT_CREDIT_QUEUE_CAPACITY;
use amar_akbar_anthony::round::GameConfig;
use std::net::SocketAddr;
use std::time::Duration;

/// Default betting window in seconds
pub const ROUND_BETTING_SECS: u64 = 15;

/// Default result display window in seconds
pub const ROUND_RESULT_SECS: u64 = 6;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Limits, cashout cap and ledger timeout
    pub game: GameConfig,
    /// Round timing
    pub schedule: ScheduleConfig,
    /// Ledger webhook configuration
    pub ledger: LedgerConfig,
    /// Database configuration; history is kept in memory when absent
    pub database: Option<DatabaseConfig>,
    /// Prometheus scrape address; metrics are disabled when absent
    pub metrics_bind: Option<SocketAddr>,
}

/// Round timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Seconds a round accepts bets
    pub betting_secs: u64,
    /// Seconds between settlement and the next round
    pub result_secs: u64,
}

impl ScheduleConfig {
    pub fn betting_window(&self) -> Duration {
        Duration::from_secs(self.betting_secs)
    }

    pub fn result_window(&self) -> Duration {
        Duration::from_secs(self.result_secs)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            betting_secs: ROUND_BETTING_SECS,
            result_secs: ROUND_RESULT_SECS,
        }
    }
}

/// How winning credits are dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditMode {
    /// Await each credit during settlement
    Direct,
    /// Queue credits for a background worker
    Queued,
}

/// Ledger webhook configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Operator service base URL; an in-memory ledger is used when absent
    pub base_url: Option<String>,
    pub credit_mode: CreditMode,
    pub queue_capacity: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            credit_mode: CreditMode::Direct,
            queue_capacity: DEFAULT_CREDIT_QUEUE_CAPACITY,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `database_url_override` - Optional database URL override (from CLI args)
    /// * `ledger_url_override` - Optional ledger base URL override (from CLI args)
    /// * `metrics_override` - Optional metrics bind address override (from CLI args)
    /// * `demo` - Allow running without an operator service
    ///
    /// # Errors
    ///
    /// Returns error if a variable is present but cannot be parsed, or if
    /// `SERVICE_BASE_URL` is missing outside demo mode
    pub fn from_env(
        database_url_override: Option<String>,
        ledger_url_override: Option<String>,
        metrics_override: Option<SocketAddr>,
        demo: bool,
    ) -> Result<Self, ConfigError> {
        let defaults = GameConfig::default();
        let game = GameConfig {
            name: std::env::var("GAME_NAME").unwrap_or(defaults.name),
            min_bet: parse_money_env("MIN_BET", defaults.min_bet)?,
            max_bet: parse_money_env("MAX_BET", defaults.max_bet)?,
            max_cashout: parse_money_env("MAX_CASHOUT", defaults.max_cashout)?,
            ledger_timeout_secs: parse_env_or("LEDGER_TIMEOUT_SECS", defaults.ledger_timeout_secs),
        };

        let schedule = ScheduleConfig {
            betting_secs: parse_env_or("ROUND_BETTING_SECS", ROUND_BETTING_SECS),
            result_secs: parse_env_or("ROUND_RESULT_SECS", ROUND_RESULT_SECS),
        };

        let credit_mode = match std::env::var("CREDIT_MODE") {
            Err(_) => CreditMode::Direct,
            Ok(v) => match v.to_lowercase().as_str() {
                "direct" => CreditMode::Direct,
                "queued" => CreditMode::Queued,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "CREDIT_MODE".to_string(),
                        reason: format!("Expected 'direct' or 'queued', got '{}'", v),
                    });
                }
            },
        };

        let base_url = ledger_url_override
            .or_else(|| std::env::var("SERVICE_BASE_URL").ok())
            .map(|url| url.trim_end_matches('/').to_string());
        if base_url.is_none() && !demo {
            return Err(ConfigError::MissingRequired {
                var: "SERVICE_BASE_URL".to_string(),
                hint: "Set the operator service URL or pass --demo for an in-memory ledger"
                    .to_string(),
            });
        }

        let ledger = LedgerConfig {
            base_url,
            credit_mode,
            queue_capacity: parse_env_or("CREDIT_QUEUE_CAPACITY", DEFAULT_CREDIT_QUEUE_CAPACITY),
        };

        let database = database_url_override
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .map(|url| {
                let defaults = DatabaseConfig::with_url(url);
                DatabaseConfig {
                    max_connections: parse_env_or("DB_MAX_CONNECTIONS", defaults.max_connections),
                    min_connections: parse_env_or("DB_MIN_CONNECTIONS", defaults.min_connections),
                    connection_timeout_secs: parse_env_or(
                        "DB_CONNECTION_TIMEOUT_SECS",
                        defaults.connection_timeout_secs,
                    ),
                    idle_timeout_secs: parse_env_or(
                        "DB_IDLE_TIMEOUT_SECS",
                        defaults.idle_timeout_secs,
                    ),
                    max_lifetime_secs: parse_env_or(
                        "DB_MAX_LIFETIME_SECS",
                        defaults.max_lifetime_secs,
                    ),
                    ..defaults
                }
            });

        let metrics_bind = match metrics_override {
            Some(addr) => Some(addr),
            None => match std::env::var("METRICS_BIND") {
                Err(_) => None,
                Ok(v) => Some(v.parse().map_err(|_| ConfigError::Invalid {
                    var: "METRICS_BIND".to_string(),
                    reason: format!("'{}' is not an IP:PORT address", v),
                })?),
            },
        };

        Ok(ServerConfig {
            game,
            schedule,
            ledger,
            database,
            metrics_bind,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game.validate().map_err(|reason| ConfigError::Invalid {
            var: "MIN_BET/MAX_BET/MAX_CASHOUT".to_string(),
            reason,
        })?;

        if self.schedule.betting_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "ROUND_BETTING_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.ledger.queue_capacity == 0 {
            return Err(ConfigError::Invalid {
                var: "CREDIT_QUEUE_CAPACITY".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if let Some(url) = &self.ledger.base_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(ConfigError::Invalid {
                var: "SERVICE_BASE_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parse a decimal money variable such as `MAX_BET=1000.00`
fn parse_money_env(key: &str, default: Amount) -> Result<Amount, ConfigError> {
    match std::env::var(key) {
        Err(_) => Ok(default),
        Ok(v) => parse_amount(&v).ok_or_else(|| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("'{}' is not an amount with at most two decimals", v),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            game: GameConfig::default(),
            schedule: ScheduleConfig::default(),
            ledger: LedgerConfig::default(),
            database: None,
            metrics_bind: None,
        }
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingRequired {
            var: "SERVICE_BASE_URL".to_string(),
            hint: "Point at the operator service".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("SERVICE_BASE_URL"));
        assert!(msg.contains("operator service"));
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = config();
        assert!(config.validate().is_ok());
        assert_eq!(config.schedule.betting_window(), Duration::from_secs(15));
        assert_eq!(config.schedule.result_window(), Duration::from_secs(6));
    }

    #[test]
    fn test_config_validation_min_above_max() {
        let mut config = config();
        config.game.min_bet = 50_000;
        config.game.max_bet = 100;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_config_validation_zero_betting_window() {
        let mut config = config();
        config.schedule.betting_secs = 0;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var, .. } if var == "ROUND_BETTING_SECS"));
    }

    #[test]
    fn test_config_validation_ledger_url_scheme() {
        let mut config = config();
        config.ledger.base_url = Some("ledger.internal".to_string());
        assert!(config.validate().is_err());

        config.ledger.base_url = Some("https://ledger.internal".to_string());
        assert!(config.validate().is_ok());
    }
}
