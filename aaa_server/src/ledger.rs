//! Operator balance webhook client.
//!
//! Debits and credits are POSTed to `{base}/service/operator/user/balance/v2`
//! with the player's token in a `token` header. The operator answers with
//! `{"status": bool}`.

use amar_akbar_anthony::game::format_amount;
use amar_akbar_anthony::ledger::{
    CreditRequest, DebitReceipt, DebitRequest, LedgerError, LedgerGateway, LedgerResult,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const BALANCE_PATH: &str = "/service/operator/user/balance/v2";

const TXN_DEBIT: u8 = 0;
const TXN_CREDIT: u8 = 1;

#[derive(Debug, Serialize)]
struct WebhookBody<'a> {
    txn_id: &'a str,
    ip: &'a str,
    game_id: &'a str,
    user_id: &'a str,
    amount: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    bet_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    txn_ref_id: Option<&'a str>,
    txn_type: u8,
}

#[derive(Debug, Deserialize)]
struct WebhookResponse {
    status: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Ledger gateway backed by the operator's HTTP balance endpoint
#[derive(Clone)]
pub struct HttpLedgerGateway {
    client: reqwest::Client,
    endpoint: String,
    game_name: String,
    timeout: Duration,
}

impl HttpLedgerGateway {
    /// Create a gateway for the operator service at `base_url`
    ///
    /// # Arguments
    ///
    /// * `base_url` - Operator service base URL without trailing slash
    /// * `game_name` - Game name used in transaction descriptions
    /// * `timeout` - Per-request bound
    pub fn new(base_url: &str, game_name: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url, BALANCE_PATH),
            game_name: game_name.to_string(),
            timeout,
        })
    }

    async fn post(&self, token: &str, body: &WebhookBody<'_>) -> LedgerResult<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("token", token)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(LedgerError::Unavailable(format!("operator returned {}", status)));
        }
        if !status.is_success() {
            return Err(LedgerError::Rejected(format!("operator returned {}", status)));
        }

        let answer: WebhookResponse = response
            .json()
            .await
            .map_err(|e| self.transport_error(e))?;

        if answer.status {
            Ok(())
        } else {
            Err(LedgerError::Rejected(
                answer.message.unwrap_or_else(|| "status false".to_string()),
            ))
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> LedgerError {
        if err.is_timeout() {
            LedgerError::Timeout(self.timeout)
        } else {
            LedgerError::Unavailable(err.to_string())
        }
    }
}

#[async_trait]
impl LedgerGateway for HttpLedgerGateway {
    async fn debit(&self, request: DebitRequest) -> LedgerResult<DebitReceipt> {
        let amount = format_amount(request.amount);
        let body = WebhookBody {
            txn_id: &request.txn_id,
            ip: &request.ip,
            game_id: &request.operator.game_id,
            user_id: &request.player_id,
            description: format!(
                "{} debited for {} game for Round {}",
                amount, self.game_name, request.round_id
            ),
            amount,
            bet_id: Some(request.bet_id.as_str()),
            txn_ref_id: None,
            txn_type: TXN_DEBIT,
        };

        self.post(&request.operator.token, &body).await?;
        Ok(DebitReceipt {
            txn_id: request.txn_id,
        })
    }

    async fn credit(&self, request: CreditRequest) -> LedgerResult<()> {
        let amount = format_amount(request.amount);
        let body = WebhookBody {
            txn_id: &request.txn_id,
            ip: &request.ip,
            game_id: &request.operator.game_id,
            user_id: &request.player_id,
            description: format!(
                "{} credited for {} game for Round {}",
                amount, self.game_name, request.round_id
            ),
            amount,
            bet_id: None,
            txn_ref_id: Some(request.txn_ref_id.as_str()),
            txn_type: TXN_CREDIT,
        };

        self.post(&request.operator.token, &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amar_akbar_anthony::bets::BetId;
    use amar_akbar_anthony::ledger::OperatorContext;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    fn operator() -> OperatorContext {
        OperatorContext {
            game_id: "aaa".to_string(),
            operator_id: "op1".to_string(),
            token: "secret-token".to_string(),
        }
    }

    /// Serve one request with `reply` as JSON body and hand back the raw request
    async fn one_shot_operator(
        status_line: &'static str,
        reply: &'static str,
    ) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if buf.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }

            let response = format!(
                "{}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                reply.len(),
                reply
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = tx.send(String::from_utf8_lossy(&buf).to_string());
        });

        (format!("http://{}", addr), rx)
    }

    fn body_json(raw: &str) -> serde_json::Value {
        let (_, body) = raw.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn test_debit_posts_webhook() {
        let (base, request) = one_shot_operator("HTTP/1.1 200 OK", r#"{"status":true}"#).await;
        let gateway = HttpLedgerGateway::new(&base, "Amar Akbar Anthony", Duration::from_secs(5))
            .unwrap();

        let receipt = gateway
            .debit(DebitRequest {
                txn_id: "txn-1".to_string(),
                round_id: 7,
                bet_id: BetId::new(7, "p1", "op1"),
                player_id: "p1".to_string(),
                amount: 1500,
                ip: "10.0.0.1".to_string(),
                operator: operator(),
            })
            .await
            .unwrap();
        assert_eq!(receipt.txn_id, "txn-1");

        let raw = request.await.unwrap();
        assert!(raw.starts_with("POST /service/operator/user/balance/v2"));
        assert!(raw.to_lowercase().contains("token: secret-token"));

        let body = body_json(&raw);
        assert_eq!(body["txn_type"], 0);
        assert_eq!(body["amount"], "15.00");
        assert_eq!(body["bet_id"], "BT:7:p1:op1");
        assert_eq!(body["user_id"], "p1");
        assert_eq!(
            body["description"],
            "15.00 debited for Amar Akbar Anthony game for Round 7"
        );
        assert!(body.get("txn_ref_id").is_none());
    }

    #[tokio::test]
    async fn test_credit_references_debit() {
        let (base, request) = one_shot_operator("HTTP/1.1 200 OK", r#"{"status":true}"#).await;
        let gateway = HttpLedgerGateway::new(&base, "AAA", Duration::from_secs(5)).unwrap();

        gateway
            .credit(CreditRequest {
                txn_id: "txn-2".to_string(),
                round_id: 7,
                player_id: "p1".to_string(),
                amount: 2100,
                txn_ref_id: "txn-1".to_string(),
                ip: "10.0.0.1".to_string(),
                operator: operator(),
            })
            .await
            .unwrap();

        let body = body_json(&request.await.unwrap());
        assert_eq!(body["txn_type"], 1);
        assert_eq!(body["amount"], "21.00");
        assert_eq!(body["txn_ref_id"], "txn-1");
        assert!(body.get("bet_id").is_none());
    }

    #[tokio::test]
    async fn test_status_false_is_rejection() {
        let (base, _request) =
            one_shot_operator("HTTP/1.1 200 OK", r#"{"status":false,"message":"no funds"}"#)
                .await;
        let gateway = HttpLedgerGateway::new(&base, "AAA", Duration::from_secs(5)).unwrap();

        let err = gateway
            .credit(CreditRequest {
                txn_id: "txn-3".to_string(),
                round_id: 1,
                player_id: "p1".to_string(),
                amount: 100,
                txn_ref_id: "txn-0".to_string(),
                ip: String::new(),
                operator: operator(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, LedgerError::Rejected("no funds".to_string()));
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let (base, _request) =
            one_shot_operator("HTTP/1.1 503 Service Unavailable", r#"{}"#).await;
        let gateway = HttpLedgerGateway::new(&base, "AAA", Duration::from_secs(5)).unwrap();

        let err = gateway
            .debit(DebitRequest {
                txn_id: "txn-4".to_string(),
                round_id: 1,
                bet_id: BetId::new(1, "p1", "op1"),
                player_id: "p1".to_string(),
                amount: 100,
                ip: String::new(),
                operator: operator(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Unavailable(_)));
    }
}
