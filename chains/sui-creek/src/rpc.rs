//! Sui JSON-RPC adapter for [`ChainClient`].
//!
//! Reads use `suix_getCoins` with cursor pagination. Submission builds the
//! transaction server-side with `unsafe_moveCall`, signs locally and executes
//! with `sui_executeTransactionBlock`.

use crate::chain::{ChainClient, ChainError, Coin, MoveCall};
use crate::signer::TransactionSigner;
use anyhow::{Context, Result};
use async_trait::async_trait;
use core_logic::{with_retry, Clock, NetworkError, RetryConfig, SystemClock};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// JSON-RPC error codes some providers use for throttling
const RATE_LIMIT_CODES: [i64; 2] = [429, -32005];
const COIN_PAGE_LIMIT: u32 = 50;

#[derive(Clone)]
pub struct SuiRpcClient {
    http: Client,
    endpoint: String,
    timeout: Duration,
    retry: RetryConfig,
    clock: Arc<dyn Clock>,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoinPage {
    data: Vec<RpcCoin>,
    next_cursor: Option<String>,
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcCoin {
    coin_object_id: String,
    balance: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionBytes {
    tx_bytes: String,
}

#[derive(Debug, Deserialize)]
struct ExecutionResponse {
    digest: String,
    effects: Option<Effects>,
}

#[derive(Debug, Deserialize)]
struct Effects {
    status: ExecutionStatus,
}

#[derive(Debug, Deserialize)]
struct ExecutionStatus {
    status: String,
    error: Option<String>,
}

impl SuiRpcClient {
    pub fn new(endpoint: &str, timeout: Duration, retries: u32) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build reqwest client")?;

        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            timeout,
            retry: RetryConfig::new(retries, 500).with_max_delay(5_000),
            clock: Arc::new(SystemClock),
        })
    }

    /// Clock used for backoff between retried calls.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One JSON-RPC call with bounded retries on transient transport errors.
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, NetworkError> {
        with_retry(self.retry, self.clock.as_ref(), method, NetworkError::is_transient, || {
            self.call_once(method, params.clone())
        })
        .await
    }

    async fn call_once<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, NetworkError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(NetworkError::RateLimited {
                endpoint: self.endpoint.clone(),
            });
        }
        if !status.is_success() {
            return Err(NetworkError::HttpError {
                status_code: status.as_u16(),
                endpoint: self.endpoint.clone(),
            });
        }

        let envelope: RpcEnvelope<T> =
            response
                .json()
                .await
                .map_err(|e| NetworkError::InvalidResponse {
                    endpoint: self.endpoint.clone(),
                    reason: e.to_string(),
                })?;

        if let Some(err) = envelope.error {
            let lowered = err.message.to_lowercase();
            if RATE_LIMIT_CODES.contains(&err.code)
                || lowered.contains("rate limit")
                || lowered.contains("too many requests")
            {
                return Err(NetworkError::RateLimited {
                    endpoint: self.endpoint.clone(),
                });
            }
            return Err(NetworkError::Rpc {
                code: err.code,
                message: err.message,
                endpoint: self.endpoint.clone(),
            });
        }

        envelope.result.ok_or_else(|| NetworkError::InvalidResponse {
            endpoint: self.endpoint.clone(),
            reason: format!("{} returned neither result nor error", method),
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> NetworkError {
        if e.is_timeout() {
            NetworkError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
                endpoint: self.endpoint.clone(),
            }
        } else {
            NetworkError::Transport {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl ChainClient for SuiRpcClient {
    async fn read_owned_coins(
        &self,
        owner: &str,
        coin_type: &str,
    ) -> Result<Vec<Coin>, ChainError> {
        let mut coins = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page: CoinPage = self
                .call(
                    "suix_getCoins",
                    json!([owner, coin_type, cursor, COIN_PAGE_LIMIT]),
                )
                .await?;

            for coin in page.data {
                let balance = coin.balance.parse::<u64>().map_err(|e| {
                    NetworkError::InvalidResponse {
                        endpoint: self.endpoint.clone(),
                        reason: format!("bad balance '{}': {}", coin.balance, e),
                    }
                })?;
                coins.push(Coin {
                    object_id: coin.coin_object_id,
                    balance,
                });
            }

            match (page.has_next_page, page.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        Ok(coins)
    }

    async fn submit_call(
        &self,
        signer: &dyn TransactionSigner,
        call: &MoveCall,
        gas_budget: u64,
    ) -> Result<String, ChainError> {
        let built: TransactionBytes = self
            .call(
                "unsafe_moveCall",
                json!([
                    signer.address(),
                    call.package,
                    call.module,
                    call.function,
                    call.type_arguments,
                    call.arguments,
                    Value::Null,
                    gas_budget.to_string(),
                ]),
            )
            .await?;

        let tx_bytes = base64::Engine::decode(
            &base64::engine::general_purpose::STANDARD,
            &built.tx_bytes,
        )
        .map_err(|e| ChainError::Signing(format!("undecodable txBytes: {}", e)))?;
        let signature = signer.sign_transaction(&tx_bytes)?;

        // Not retried: a lost response would re-send an already executed tx.
        let executed: ExecutionResponse = self
            .call_once(
                "sui_executeTransactionBlock",
                json!([
                    built.tx_bytes,
                    [signature],
                    { "showEffects": true },
                    "WaitForLocalExecution",
                ]),
            )
            .await?;

        debug!("{} executed as {}", call.target(), executed.digest);

        match executed.effects {
            Some(effects) if effects.status.status != "success" => Err(ChainError::Execution {
                digest: executed.digest,
                reason: effects
                    .status
                    .error
                    .unwrap_or_else(|| effects.status.status.clone()),
            }),
            _ => Ok(executed.digest),
        }
    }
}
