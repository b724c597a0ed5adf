//! Ledger module: the external account-of-record for player funds.
//!
//! Gateway calls are the only place money moves. Every call is bounded by a
//! timeout and a timeout counts as failure.

pub mod errors;
pub mod gateway;
pub mod memory;
pub mod queue;
pub mod timeouts;

pub use errors::{LedgerError, LedgerResult};
pub use gateway::{
    CreditRequest, DebitReceipt, DebitRequest, LedgerGateway, OperatorContext, new_txn_id,
};
pub use memory::MemoryLedger;
pub use queue::{CreditQueue, CreditWorker, DEFAULT_CREDIT_QUEUE_CAPACITY};
pub use timeouts::with_timeout;
