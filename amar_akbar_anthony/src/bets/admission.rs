//! Bet admission: validate, debit, record.

use super::{
    errors::{BetError, BetResult},
    models::{BetId, BetReceipt, BetRecord, Connection, Selection},
    validator::ValidatedBet,
};
use crate::events::{EventSink, OutboundEvent};
use crate::game::RoundId;
use crate::ledger::{DebitRequest, LedgerGateway, new_txn_id, with_timeout};
use crate::round::{RoundError, RoundHandle};
use crate::session::{PlayerSession, SessionCache};
use crate::store::RoundStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// Admits one wager at a time for the live round.
///
/// A bet reaches the round only after the ledger confirmed its debit. Every
/// rejection is reported to the player as a `betError` event.
#[derive(Clone)]
pub struct BetAdmission {
    round: RoundHandle,
    ledger: Arc<dyn LedgerGateway>,
    sessions: Arc<dyn SessionCache>,
    store: Arc<dyn RoundStore>,
    events: Arc<dyn EventSink>,
    ledger_timeout: Duration,
}

impl BetAdmission {
    pub fn new(
        round: RoundHandle,
        ledger: Arc<dyn LedgerGateway>,
        sessions: Arc<dyn SessionCache>,
        store: Arc<dyn RoundStore>,
        events: Arc<dyn EventSink>,
        ledger_timeout: Duration,
    ) -> Self {
        Self {
            round,
            ledger,
            sessions,
            store,
            events,
            ledger_timeout,
        }
    }

    /// Place a bet for the player behind `connection`
    ///
    /// # Arguments
    ///
    /// * `connection` - Connection the submission arrived on
    /// * `round_id` - Round the player is betting on
    /// * `selections` - Chip and stake pairs in submission order
    ///
    /// # Returns
    ///
    /// * `BetResult<BetReceipt>` - Receipt with the new cached balance, or the
    ///   reason nothing was admitted
    pub async fn place_bet(
        &self,
        connection: &Connection,
        round_id: RoundId,
        selections: Vec<Selection>,
    ) -> BetResult<BetReceipt> {
        let result = self.admit(connection, round_id, selections).await;

        if let Err(e) = &result {
            log::warn!(
                target: "failed_bets",
                "session={} ip={} round_id={} reason={}",
                connection.session_key,
                connection.origin_ip,
                round_id,
                e
            );
            self.events.emit(
                &connection.session_key,
                OutboundEvent::bet_error(e.client_message()),
            );
        }

        result
    }

    async fn admit(
        &self,
        connection: &Connection,
        round_id: RoundId,
        selections: Vec<Selection>,
    ) -> BetResult<BetReceipt> {
        let session = self
            .sessions
            .get(&connection.session_key)
            .await
            .ok_or(BetError::SessionInvalid)?;

        let bet_id = BetId::new(round_id, &session.player_id, &session.operator_id);
        let validated = self
            .round
            .reserve(round_id, bet_id.clone(), selections)
            .await
            .map_err(|e| match e {
                RoundError::Rejected(reason) => BetError::InvalidBet(reason),
                other => BetError::Internal(other.to_string()),
            })?;

        let result = self
            .debit_and_record(connection, &session, round_id, &bet_id, validated)
            .await;

        if result.is_err() {
            // No-op when the round already dropped the reservation
            if let Err(e) = self.round.release(round_id, bet_id).await {
                log::debug!("Could not release reservation: {}", e);
            }
        }

        result
    }

    async fn debit_and_record(
        &self,
        connection: &Connection,
        session: &PlayerSession,
        round_id: RoundId,
        bet_id: &BetId,
        validated: ValidatedBet,
    ) -> BetResult<BetReceipt> {
        if validated.total_stake > session.balance {
            return Err(BetError::InsufficientBalance {
                available: session.balance,
                required: validated.total_stake,
            });
        }

        let request = DebitRequest {
            txn_id: new_txn_id(),
            round_id,
            bet_id: bet_id.clone(),
            player_id: session.player_id.clone(),
            amount: validated.total_stake,
            ip: connection.origin_ip.clone(),
            operator: session.operator_context(),
        };
        let receipt = with_timeout(self.ledger_timeout, self.ledger.debit(request))
            .await
            .map_err(BetError::BetCancelledByUpstream)?;

        let bet = BetRecord {
            bet_id: bet_id.clone(),
            round_id,
            player_id: session.player_id.clone(),
            operator_id: session.operator_id.clone(),
            game_id: session.game_id.clone(),
            session_key: connection.session_key.clone(),
            token: session.token.clone(),
            origin_ip: connection.origin_ip.clone(),
            total_stake: validated.total_stake,
            selections: validated.selections,
            ledger_txn_id: receipt.txn_id,
            placed_at: Utc::now(),
        };

        if let Err(e) = self.round.admit(bet.clone()).await {
            // The debit stands; the ledger and the round now disagree
            log::error!(
                target: "failed_bets",
                "reconciliation required: debit {} of {} for bet {} not recorded: {}",
                bet.ledger_txn_id,
                bet.total_stake,
                bet.bet_id,
                e
            );
            return Err(match e {
                RoundError::NotOpen(_)
                | RoundError::NoLiveRound
                | RoundError::RoundMismatch { .. } => BetError::RoundClosed {
                    round_id,
                    txn_id: bet.ledger_txn_id,
                },
                other => BetError::Internal(other.to_string()),
            });
        }

        let balance = self
            .sessions
            .adjust_balance(&connection.session_key, -bet.total_stake)
            .await
            .unwrap_or(session.balance - bet.total_stake);

        if let Err(e) = self.store.insert_bet(&bet).await {
            log::error!("Failed to persist bet {}: {}", bet.bet_id, e);
        }

        self.events.emit(
            &connection.session_key,
            OutboundEvent::info(&session.player_id, &session.operator_id, balance),
        );
        self.events
            .emit(&connection.session_key, OutboundEvent::bet_placed());

        log::info!(
            "Bet {} placed on round {} for {}",
            bet.bet_id,
            round_id,
            bet.total_stake
        );

        Ok(BetReceipt {
            bet_id: bet.bet_id,
            round_id,
            total_stake: bet.total_stake,
            ledger_txn_id: bet.ledger_txn_id,
            balance,
        })
    }
}
