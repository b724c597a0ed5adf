//! Session module: per-connection player context and the cached balance.
//!
//! The cache is an optimization only. The ledger remains the account of
//! record and the balance shown to players may lag it.

pub mod cache;
pub mod models;

pub use cache::{MemorySessionCache, SessionCache};
pub use models::PlayerSession;
