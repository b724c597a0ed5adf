//! Notifications pushed to connected players.
//!
//! Events are routed by session key. Delivery is best effort: a sink never
//! reports failure back to admission or settlement.

use crate::game::{Amount, GameResult, RoundId, format_amount};
use crate::settlement::{SelectionOutcome, SettlementRecord};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

pub const BET_PLACED_MESSAGE: &str = "BET PLACED SUCCESSFULLY";

/// Win or loss as shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NoticeStatus {
    Win,
    Loss,
}

/// Round settlement as shown to one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementNotice {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loss_amount: Option<String>,
    pub status: NoticeStatus,
    pub round_result: GameResult,
    pub bet_results: Vec<SelectionOutcome>,
    pub round_id: RoundId,
}

impl From<&SettlementRecord> for SettlementNotice {
    fn from(record: &SettlementRecord) -> Self {
        let (message, win_amount, loss_amount, status) = if record.is_win() {
            let amount = format_amount(record.total_payout);
            (
                format!("WIN AMOUNT: {}", amount),
                Some(amount),
                None,
                NoticeStatus::Win,
            )
        } else {
            let amount = format_amount(record.total_stake);
            (
                format!("YOU LOSS {}", amount),
                None,
                Some(amount),
                NoticeStatus::Loss,
            )
        };

        Self {
            message,
            win_amount,
            loss_amount,
            status,
            round_result: record.result.clone(),
            bet_results: record.outcomes.clone(),
            round_id: record.round_id,
        }
    }
}

/// Event pushed to a player connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum OutboundEvent {
    BetError {
        message: String,
        status: bool,
    },
    Info {
        #[serde(rename = "user_id")]
        player_id: String,
        operator_id: String,
        balance: String,
    },
    Bet {
        message: String,
    },
    Settlement(SettlementNotice),
}

impl OutboundEvent {
    pub fn bet_error(message: impl Into<String>) -> Self {
        OutboundEvent::BetError {
            message: message.into(),
            status: false,
        }
    }

    pub fn info(player_id: &str, operator_id: &str, balance: Amount) -> Self {
        OutboundEvent::Info {
            player_id: player_id.to_string(),
            operator_id: operator_id.to_string(),
            balance: format_amount(balance),
        }
    }

    pub fn bet_placed() -> Self {
        OutboundEvent::Bet {
            message: BET_PLACED_MESSAGE.to_string(),
        }
    }

    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            OutboundEvent::BetError { .. } => "betError",
            OutboundEvent::Info { .. } => "info",
            OutboundEvent::Bet { .. } => "bet",
            OutboundEvent::Settlement(_) => "settlement",
        }
    }
}

/// Destination for player notifications
pub trait EventSink: Send + Sync {
    fn emit(&self, session_key: &str, event: OutboundEvent);
}

/// Event addressed to a session
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedEvent {
    pub session_key: String,
    pub event: OutboundEvent,
}

/// Sink forwarding events onto an unbounded channel for a transport to drain
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    sender: mpsc::UnboundedSender<RoutedEvent>,
}

impl ChannelEventSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RoutedEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, session_key: &str, event: OutboundEvent) {
        let routed = RoutedEvent {
            session_key: session_key.to_string(),
            event,
        };
        if self.sender.send(routed).is_err() {
            log::debug!("Event receiver dropped, discarding event for {}", session_key);
        }
    }
}

/// Sink that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn emit(&self, _session_key: &str, _event: OutboundEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bets::BetId;
    use crate::game::Category;
    use crate::settlement::{CreditStatus, Outcome};
    use chrono::Utc;

    fn record(total_payout: Amount) -> SettlementRecord {
        SettlementRecord {
            bet_id: BetId::new(7, "p1", "op1"),
            round_id: 7,
            player_id: "p1".to_string(),
            operator_id: "op1".to_string(),
            total_stake: 1500,
            outcomes: vec![SelectionOutcome {
                category: Category::Amar,
                stake: 1500,
                multiplier: 210,
                payout: total_payout,
                outcome: if total_payout > 0 { Outcome::Win } else { Outcome::Loss },
            }],
            total_payout,
            total_multiplier: 0,
            result: GameResult::new(Category::Amar, "4-H"),
            credit: CreditStatus::NotRequired,
            settled_at: Utc::now(),
        }
    }

    #[test]
    fn test_win_notice() {
        let notice = SettlementNotice::from(&record(3150));
        assert_eq!(notice.message, "WIN AMOUNT: 31.50");
        assert_eq!(notice.win_amount.as_deref(), Some("31.50"));
        assert_eq!(notice.loss_amount, None);
        assert_eq!(notice.status, NoticeStatus::Win);
    }

    #[test]
    fn test_loss_notice() {
        let notice = SettlementNotice::from(&record(0));
        assert_eq!(notice.message, "YOU LOSS 15.00");
        assert_eq!(notice.loss_amount.as_deref(), Some("15.00"));
        assert_eq!(notice.status, NoticeStatus::Loss);
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(OutboundEvent::bet_error("INVALID BET")).unwrap();
        assert_eq!(json["event"], "betError");
        assert_eq!(json["data"]["message"], "INVALID BET");
        assert_eq!(json["data"]["status"], false);

        let json = serde_json::to_value(OutboundEvent::info("p1", "op1", 2100)).unwrap();
        assert_eq!(json["event"], "info");
        assert_eq!(json["data"]["user_id"], "p1");
        assert_eq!(json["data"]["balance"], "21.00");

        let event = OutboundEvent::Settlement(SettlementNotice::from(&record(0)));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["data"]["status"], "LOSS");
        assert_eq!(json["data"]["roundId"], 7);
        assert_eq!(json["data"]["roundResult"]["winner"], 1);
        assert_eq!(json["data"]["betResults"][0]["multiplier"], 2.1);
        assert!(json["data"].get("winAmount").is_none());
    }

    #[tokio::test]
    async fn test_channel_sink_routes_by_session() {
        let (sink, mut rx) = ChannelEventSink::channel();
        sink.emit("s1", OutboundEvent::bet_placed());

        let routed = rx.recv().await.unwrap();
        assert_eq!(routed.session_key, "s1");
        assert_eq!(routed.event.name(), "bet");
    }
}
