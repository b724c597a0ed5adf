//! Settlement sweep over a closed round.

use super::{
    calculator::settle_bet,
    errors::SettlementResult,
    models::{CreditStatus, SettlementRecord},
};
use crate::bets::BetRecord;
use crate::events::{EventSink, OutboundEvent, SettlementNotice};
use crate::game::{Amount, GameResult, RoundId};
use crate::ledger::{CreditRequest, LedgerGateway, OperatorContext, new_txn_id, with_timeout};
use crate::round::RoundHandle;
use crate::session::SessionCache;
use crate::store::RoundStore;
use std::sync::Arc;
use std::time::Duration;

/// Settles every admitted bet of a closed round exactly once
#[derive(Clone)]
pub struct SettlementEngine {
    round: RoundHandle,
    ledger: Arc<dyn LedgerGateway>,
    sessions: Arc<dyn SessionCache>,
    store: Arc<dyn RoundStore>,
    events: Arc<dyn EventSink>,
    ledger_timeout: Duration,
    max_cashout: Amount,
}

impl SettlementEngine {
    pub fn new(
        round: RoundHandle,
        ledger: Arc<dyn LedgerGateway>,
        sessions: Arc<dyn SessionCache>,
        store: Arc<dyn RoundStore>,
        events: Arc<dyn EventSink>,
        ledger_timeout: Duration,
        max_cashout: Amount,
    ) -> Self {
        Self {
            round,
            ledger,
            sessions,
            store,
            events,
            ledger_timeout,
            max_cashout,
        }
    }

    /// Settle a closed round and clear it
    ///
    /// Bets are processed in admission order and checkpointed one by one, so
    /// a re-run after an interrupted sweep only sees the remaining bets. A
    /// round that is no longer live yields no records.
    ///
    /// # Returns
    ///
    /// * `SettlementResult<Vec<SettlementRecord>>` - One record per bet
    ///   settled by this call, or `RoundNotClosed` while the round is open
    pub async fn settle_round(&self, round_id: RoundId) -> SettlementResult<Vec<SettlementRecord>> {
        let Some(batch) = self.round.begin_settlement(round_id).await? else {
            log::info!("Round {} has nothing left to settle", round_id);
            return Ok(Vec::new());
        };

        let mut records = Vec::with_capacity(batch.bets.len());
        for bet in &batch.bets {
            let record = self.settle_one(bet, &batch.result).await;
            self.round.checkpoint(round_id, bet.bet_id.clone()).await?;
            records.push(record);
        }

        self.round.finish_settlement(round_id).await?;

        let paid: Amount = records.iter().map(|r| r.total_payout).sum();
        let failed = records.iter().filter(|r| r.credit.is_failed()).count();
        log::info!(
            "Round {} settled: {} bet(s), {} paid out, {} failed credit(s)",
            round_id,
            records.len(),
            paid,
            failed
        );

        Ok(records)
    }

    async fn settle_one(&self, bet: &BetRecord, result: &GameResult) -> SettlementRecord {
        let mut record = settle_bet(bet, result, self.max_cashout);

        if record.is_win() {
            record.credit = self.credit(bet, record.total_payout).await;

            if !record.credit.is_failed()
                && let Some(balance) = self
                    .sessions
                    .adjust_balance(&bet.session_key, record.total_payout)
                    .await
            {
                self.events.emit(
                    &bet.session_key,
                    OutboundEvent::info(&bet.player_id, &bet.operator_id, balance),
                );
            }
        }

        self.events.emit(
            &bet.session_key,
            OutboundEvent::Settlement(SettlementNotice::from(&record)),
        );

        if let Err(e) = self.store.insert_settlement(&record).await {
            log::error!("Failed to persist settlement {}: {}", record.bet_id, e);
        }

        record
    }

    async fn credit(&self, bet: &BetRecord, amount: Amount) -> CreditStatus {
        let request = CreditRequest {
            txn_id: new_txn_id(),
            round_id: bet.round_id,
            player_id: bet.player_id.clone(),
            amount,
            txn_ref_id: bet.ledger_txn_id.clone(),
            ip: bet.origin_ip.clone(),
            operator: OperatorContext {
                game_id: bet.game_id.clone(),
                operator_id: bet.operator_id.clone(),
                token: bet.token.clone(),
            },
        };
        let txn_id = request.txn_id.clone();

        match with_timeout(self.ledger_timeout, self.ledger.credit(request)).await {
            Ok(()) => CreditStatus::Accepted,
            Err(e) => {
                log::error!(
                    target: "failed_credits",
                    "txn_id={} txn_ref_id={} bet_id={} round_id={} amount={} reason={}",
                    txn_id,
                    bet.ledger_txn_id,
                    bet.bet_id,
                    bet.round_id,
                    amount,
                    e
                );
                CreditStatus::Failed(e.to_string())
            }
        }
    }
}
