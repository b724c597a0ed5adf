//! Ledger error types.

use std::time::Duration;
use thiserror::Error;

/// Ledger gateway errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Account-of-record refused the operation
    #[error("Ledger rejected request: {0}")]
    Rejected(String),

    /// No answer within the bound
    #[error("Ledger request timed out after {0:?}")]
    Timeout(Duration),

    /// Transport or upstream failure
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

impl LedgerError {
    /// Get a client-safe error message
    pub fn client_message(&self) -> String {
        match self {
            // Upstream messages may carry operator internals
            LedgerError::Rejected(_) => "Ledger rejected request".to_string(),
            LedgerError::Unavailable(_) => "Ledger unavailable".to_string(),
            LedgerError::Timeout(_) => self.to_string(),
        }
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
