//! Rate-limit aware faucet client.
//!
//! Two kinds of funding live here:
//! - the HTTP gas faucet, used by [`FaucetClient::ensure_minimum_balance`]
//!   to pass the gas gate
//! - on-chain token mints, one call per [`FaucetClient::claim_token`]
//!
//! HTTP replies are classified by [`classify`] into dispensed, rate-limited
//! or failed. Rate limits are counted apart from hard failures.

use crate::balance::BalanceReader;
use crate::chain::{ChainClient, ChainError, MoveCall};
use crate::config::{ClaimTarget, CreekConfig};
use crate::outcome::FaucetDiagnostics;
use crate::pacing::Pacer;
use crate::signer::TransactionSigner;
use crate::tokens::TokenKind;
use anyhow::Context;
use async_trait::async_trait;
use core_logic::{DelayRange, NetworkError, ProxyConfig};
use reqwest::Client;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// Raw faucet reply before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaucetHttpResponse {
    pub status: u16,
    pub body: String,
}

/// One POST to the gas faucet, optionally through an egress proxy.
#[async_trait]
pub trait FaucetTransport: Send + Sync {
    async fn post_request(
        &self,
        recipient: &str,
        proxy: Option<&ProxyConfig>,
    ) -> Result<FaucetHttpResponse, NetworkError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaucetReply {
    Dispensed,
    RateLimited,
    Failed(String),
}

impl FaucetReply {
    pub fn succeeded(&self) -> bool {
        matches!(self, FaucetReply::Dispensed)
    }

    pub fn rate_limited(&self) -> bool {
        matches!(self, FaucetReply::RateLimited)
    }

    pub fn error_detail(&self) -> Option<&str> {
        match self {
            FaucetReply::Dispensed => None,
            FaucetReply::RateLimited => Some("Rate limit"),
            FaucetReply::Failed(reason) => Some(reason.as_str()),
        }
    }
}

/// Maps a faucet HTTP reply onto [`FaucetReply`].
///
/// A 200 can still carry `status.Failure`, whose `Internal` text becomes the
/// error detail.
pub fn classify(status: u16, body: &str) -> FaucetReply {
    match status {
        429 => FaucetReply::RateLimited,
        200 => match serde_json::from_str::<Value>(body) {
            Ok(data) => match data.get("status").and_then(|s| s.get("Failure")) {
                Some(Value::String(reason)) => FaucetReply::Failed(reason.clone()),
                Some(failure) => FaucetReply::Failed(
                    failure
                        .get("Internal")
                        .and_then(Value::as_str)
                        .unwrap_or("Error")
                        .to_string(),
                ),
                None => FaucetReply::Dispensed,
            },
            Err(_) => FaucetReply::Failed("Invalid JSON".to_string()),
        },
        other => FaucetReply::Failed(format!("Status {}", other)),
    }
}

/// reqwest transport with one cached client per egress route.
///
/// Routes are keyed on the whole proxy config, so accounts sharing a gateway
/// under different credentials never share a client.
pub struct HttpFaucetTransport {
    url: String,
    timeout: Duration,
    clients: RwLock<HashMap<Option<ProxyConfig>, Client>>,
}

impl HttpFaucetTransport {
    pub fn new(url: &str, timeout: Duration) -> Self {
        Self {
            url: url.to_string(),
            timeout,
            clients: RwLock::new(HashMap::new()),
        }
    }

    async fn client_for(&self, proxy: Option<&ProxyConfig>) -> anyhow::Result<Client> {
        let key = proxy.cloned();
        {
            let clients = self.clients.read().await;
            if let Some(client) = clients.get(&key) {
                return Ok(client.clone());
            }
        }

        let mut builder = Client::builder()
            .timeout(self.timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(30));

        if let Some(proxy_config) = proxy {
            let mut route = reqwest::Proxy::all(&proxy_config.url)
                .with_context(|| format!("Failed to create proxy for URL: {}", proxy_config.url))?;
            if let (Some(username), Some(password)) =
                (&proxy_config.username, &proxy_config.password)
            {
                route = route.basic_auth(username, password);
            }
            builder = builder.proxy(route);
        }

        let client = builder.build().context("Failed to build faucet client")?;

        let mut clients = self.clients.write().await;
        clients.insert(key, client.clone());
        Ok(client)
    }
}

#[async_trait]
impl FaucetTransport for HttpFaucetTransport {
    async fn post_request(
        &self,
        recipient: &str,
        proxy: Option<&ProxyConfig>,
    ) -> Result<FaucetHttpResponse, NetworkError> {
        let client = self
            .client_for(proxy)
            .await
            .map_err(|e| NetworkError::Transport {
                endpoint: self.url.clone(),
                reason: format!("{:#}", e),
            })?;

        let response = client
            .post(&self.url)
            .json(&json!({ "FixedAmountRequest": { "recipient": recipient } }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NetworkError::Timeout {
                        timeout_ms: self.timeout.as_millis() as u64,
                        endpoint: self.url.clone(),
                    }
                } else {
                    NetworkError::Transport {
                        endpoint: self.url.clone(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status().as_u16();
        // An unreadable body is classified like malformed JSON.
        let body = response.text().await.unwrap_or_default();
        Ok(FaucetHttpResponse { status, body })
    }
}

/// Waits and budgets the faucet client applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaucetPolicy {
    pub settle_delay: Duration,
    pub backoff: DelayRange,
    pub claim_cooldown: DelayRange,
    pub gas_budget: u64,
}

impl FaucetPolicy {
    pub fn from_config(config: &CreekConfig) -> Self {
        Self {
            settle_delay: config.gas_gate.settle_delay(),
            backoff: config.gas_gate.backoff,
            claim_cooldown: config.claims.cooldown,
            gas_budget: config.claims.gas_budget,
        }
    }
}

/// Result of one gas-gate pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GasGateReport {
    pub satisfied: bool,
    pub final_balance: f64,
    pub diagnostics: FaucetDiagnostics,
    pub last_error: Option<String>,
}

impl GasGateReport {
    /// Faucet requests beyond the first.
    pub fn retry_count(&self) -> u32 {
        self.diagnostics.requests.saturating_sub(1)
    }
}

pub struct FaucetClient {
    transport: Arc<dyn FaucetTransport>,
    chain: Arc<dyn ChainClient>,
    balances: Arc<BalanceReader>,
    pacer: Pacer,
    policy: FaucetPolicy,
}

impl FaucetClient {
    pub fn new(
        transport: Arc<dyn FaucetTransport>,
        chain: Arc<dyn ChainClient>,
        balances: Arc<BalanceReader>,
        pacer: Pacer,
        policy: FaucetPolicy,
    ) -> Self {
        Self {
            transport,
            chain,
            balances,
            pacer,
            policy,
        }
    }

    /// Single faucet request. Transport errors become [`FaucetReply::Failed`].
    pub async fn request_faucet(&self, address: &str, proxy: Option<&ProxyConfig>) -> FaucetReply {
        match self.transport.post_request(address, proxy).await {
            Ok(response) => classify(response.status, &response.body),
            Err(e) => FaucetReply::Failed(e.to_string()),
        }
    }

    /// Requests native tokens until `address` holds at least `minimum`.
    ///
    /// Makes no request when the balance is already sufficient and never more
    /// than `max_attempts`. Balance is checked once more after the loop in
    /// case the last successful request settled late.
    pub async fn ensure_minimum_balance(
        &self,
        address: &str,
        proxy: Option<&ProxyConfig>,
        minimum: f64,
        max_attempts: u32,
    ) -> GasGateReport {
        info!("💧 Ensuring wallet has minimum {} SUI...", minimum);

        let mut diagnostics = FaucetDiagnostics::default();
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            let balance = self.balances.get_balance(address, TokenKind::Sui).await;
            info!("📊 Balance: {:.6} SUI ({}/{})", balance, attempt, max_attempts);

            if balance >= minimum {
                info!("✓ Balance sufficient!");
                return GasGateReport {
                    satisfied: true,
                    final_balance: balance,
                    diagnostics,
                    last_error,
                };
            }

            info!("💧 Requesting SUI faucet...");
            let reply = self.request_faucet(address, proxy).await;
            diagnostics.record(&reply);

            match reply {
                FaucetReply::Dispensed => {
                    info!("✓ Faucet success!");
                    self.pacer
                        .fixed(self.policy.settle_delay, "Balance update:")
                        .await;
                }
                FaucetReply::RateLimited => {
                    warn!("✗ Faucet rate limited");
                    last_error = Some("Rate limit".to_string());
                    self.pacer.jittered(self.policy.backoff, "Rate limit:").await;
                }
                FaucetReply::Failed(reason) => {
                    error!("✗ Faucet failed: {}", reason);
                    last_error = Some(reason);
                    if attempt < max_attempts {
                        self.pacer.jittered(self.policy.backoff, "Retry:").await;
                    }
                }
            }
        }

        let final_balance = self.balances.get_balance(address, TokenKind::Sui).await;
        let satisfied = final_balance >= minimum;
        if satisfied {
            info!("✓ Balance sufficient!");
        } else {
            error!("✗ Failed after {} attempts", max_attempts);
        }

        GasGateReport {
            satisfied,
            final_balance,
            diagnostics,
            last_error,
        }
    }

    /// One mint call against `target`. Not retried here.
    ///
    /// A success is followed by the claim cooldown; a failure returns at once.
    pub async fn claim_token(
        &self,
        signer: &dyn TransactionSigner,
        target: &ClaimTarget,
        attempt: u32,
    ) -> Result<String, ChainError> {
        info!("💰 Claim {} #{}...", target.token, attempt);

        let call = MoveCall {
            package: target.package.clone(),
            module: target.module.clone(),
            function: target.function.clone(),
            type_arguments: Vec::new(),
            arguments: vec![
                json!(target.shared_object),
                json!(target.amount.to_string()),
                json!(signer.address()),
            ],
        };

        match self
            .chain
            .submit_call(signer, &call, self.policy.gas_budget)
            .await
        {
            Ok(digest) => {
                info!(
                    "✓ SUCCESS {} claim, TX: {}...",
                    target.token,
                    digest.get(..10).unwrap_or(&digest)
                );
                self.pacer
                    .jittered(self.policy.claim_cooldown, "Next:")
                    .await;
                Ok(digest)
            }
            Err(e) => {
                error!("✗ FAILED {} claim: {}", target.token, e);
                Err(e)
            }
        }
    }
}
