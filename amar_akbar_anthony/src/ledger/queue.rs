//! Fire-and-forget credit dispatch.

use super::{
    errors::{LedgerError, LedgerResult},
    gateway::{CreditRequest, DebitReceipt, DebitRequest, LedgerGateway},
    timeouts::with_timeout,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Default number of credits that may wait for dispatch
pub const DEFAULT_CREDIT_QUEUE_CAPACITY: usize = 1024;

/// Gateway wrapper that acknowledges credits immediately and dispatches them
/// from a background worker.
///
/// Debits are forwarded to the inner gateway unchanged. A credit returns `Ok`
/// once it is queued, so the caller records it as accepted rather than
/// confirmed.
#[derive(Clone)]
pub struct CreditQueue {
    inner: Arc<dyn LedgerGateway>,
    sender: mpsc::Sender<CreditRequest>,
}

/// Worker draining a [`CreditQueue`]
pub struct CreditWorker {
    inner: Arc<dyn LedgerGateway>,
    receiver: mpsc::Receiver<CreditRequest>,
    timeout: Duration,
}

impl CreditQueue {
    /// Create a queue and its worker
    ///
    /// # Arguments
    ///
    /// * `inner` - Gateway that performs the actual calls
    /// * `capacity` - Maximum number of pending credits
    /// * `timeout` - Bound applied to each dispatched credit
    pub fn new(
        inner: Arc<dyn LedgerGateway>,
        capacity: usize,
        timeout: Duration,
    ) -> (Self, CreditWorker) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let queue = Self {
            inner: inner.clone(),
            sender,
        };
        let worker = CreditWorker {
            inner,
            receiver,
            timeout,
        };
        (queue, worker)
    }

    /// Create a queue and run its worker on the current runtime
    pub fn spawn(inner: Arc<dyn LedgerGateway>, capacity: usize, timeout: Duration) -> Self {
        let (queue, worker) = Self::new(inner, capacity, timeout);
        tokio::spawn(worker.run());
        queue
    }
}

#[async_trait]
impl LedgerGateway for CreditQueue {
    async fn debit(&self, request: DebitRequest) -> LedgerResult<DebitReceipt> {
        self.inner.debit(request).await
    }

    async fn credit(&self, request: CreditRequest) -> LedgerResult<()> {
        self.sender
            .send(request)
            .await
            .map_err(|_| LedgerError::Unavailable("credit queue closed".to_string()))
    }
}

impl CreditWorker {
    /// Dispatch queued credits until every queue handle is dropped
    pub async fn run(mut self) {
        log::info!("Credit worker started");

        while let Some(request) = self.receiver.recv().await {
            let txn_id = request.txn_id.clone();
            let player_id = request.player_id.clone();
            let round_id = request.round_id;
            let amount = request.amount;

            match with_timeout(self.timeout, self.inner.credit(request)).await {
                Ok(()) => {
                    log::debug!("Credited {} to {} for round {}", amount, player_id, round_id);
                }
                Err(e) => {
                    log::error!(
                        target: "failed_credits",
                        "txn_id={} round_id={} player_id={} amount={} reason={}",
                        txn_id,
                        round_id,
                        player_id,
                        amount,
                        e
                    );
                }
            }
        }

        log::info!("Credit worker stopped");
    }
}
