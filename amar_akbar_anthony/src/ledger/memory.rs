//! In-memory ledger for local runs and tests.

use super::{
    errors::{LedgerError, LedgerResult},
    gateway::{CreditRequest, DebitReceipt, DebitRequest, LedgerGateway},
};
use crate::game::Amount;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Book {
    balances: HashMap<String, Amount>,
    debits: Vec<DebitRequest>,
    credits: Vec<CreditRequest>,
    seen_txn_ids: HashSet<String>,
}

/// Ledger keeping balances and call history in memory.
///
/// Players without an opening balance have unlimited funds. Failure modes
/// can be switched on to exercise rejection and timeout paths.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    book: Mutex<Book>,
    reject_debits: AtomicBool,
    reject_credits: AtomicBool,
    delay_ms: AtomicU64,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an opening balance for a player
    pub async fn set_balance(&self, player_id: &str, balance: Amount) {
        self.book
            .lock()
            .await
            .balances
            .insert(player_id.to_string(), balance);
    }

    pub async fn balance(&self, player_id: &str) -> Option<Amount> {
        self.book.lock().await.balances.get(player_id).copied()
    }

    pub fn reject_debits(&self, reject: bool) {
        self.reject_debits.store(reject, Ordering::SeqCst);
    }

    pub fn reject_credits(&self, reject: bool) {
        self.reject_credits.store(reject, Ordering::SeqCst);
    }

    /// Delay every call, e.g. to exceed the caller's timeout
    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub async fn debits(&self) -> Vec<DebitRequest> {
        self.book.lock().await.debits.clone()
    }

    pub async fn credits(&self) -> Vec<CreditRequest> {
        self.book.lock().await.credits.clone()
    }

    /// Number of debit calls that reached the ledger, accepted or not
    pub async fn debit_calls(&self) -> usize {
        self.book.lock().await.debits.len()
    }

    /// Number of credit calls that reached the ledger, accepted or not
    pub async fn credit_calls(&self) -> usize {
        self.book.lock().await.credits.len()
    }

    async fn simulate_latency(&self) {
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }
}

#[async_trait]
impl LedgerGateway for MemoryLedger {
    async fn debit(&self, request: DebitRequest) -> LedgerResult<DebitReceipt> {
        self.simulate_latency().await;

        let mut book = self.book.lock().await;
        book.debits.push(request.clone());

        if self.reject_debits.load(Ordering::SeqCst) {
            return Err(LedgerError::Rejected("debit declined".to_string()));
        }
        if !book.seen_txn_ids.insert(request.txn_id.clone()) {
            return Err(LedgerError::Rejected(format!(
                "duplicate transaction {}",
                request.txn_id
            )));
        }

        if let Some(balance) = book.balances.get_mut(&request.player_id) {
            if *balance < request.amount {
                return Err(LedgerError::Rejected("insufficient funds".to_string()));
            }
            *balance -= request.amount;
        }

        Ok(DebitReceipt {
            txn_id: request.txn_id,
        })
    }

    async fn credit(&self, request: CreditRequest) -> LedgerResult<()> {
        self.simulate_latency().await;

        let mut book = self.book.lock().await;
        book.credits.push(request.clone());

        if self.reject_credits.load(Ordering::SeqCst) {
            return Err(LedgerError::Rejected("credit declined".to_string()));
        }
        if !book.seen_txn_ids.insert(request.txn_id.clone()) {
            return Err(LedgerError::Rejected(format!(
                "duplicate transaction {}",
                request.txn_id
            )));
        }

        if let Some(balance) = book.balances.get_mut(&request.player_id) {
            *balance = balance.saturating_add(request.amount);
        }

        Ok(())
    }
}
