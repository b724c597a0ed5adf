//! Store error types.

use thiserror::Error;

/// Persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Record could not be encoded for storage
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Record with the same key already stored
    #[error("Duplicate record: {0}")]
    Duplicate(String),
}

impl StoreError {
    /// Get a client-safe error message
    pub fn client_message(&self) -> String {
        match self {
            StoreError::Database(_) | StoreError::Encoding(_) => {
                "Internal server error".to_string()
            }
            StoreError::Duplicate(_) => self.to_string(),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
