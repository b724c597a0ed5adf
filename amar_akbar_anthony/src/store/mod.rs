//! Store module: durable records of rounds, bets and settlements.
//!
//! Writes happen after the in-memory state has moved on. A failed write is
//! logged by the caller and never undoes an admission or a settlement.

pub mod errors;
pub mod memory;
pub mod models;
pub mod repository;

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use models::RoundSummary;
pub use repository::RoundStore;
