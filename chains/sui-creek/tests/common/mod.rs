//! In-memory fakes for driving the engine without network or real time.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use core_logic::{
    Clock, ConfigError, DelayRange, MinimumJitter, NetworkError, ProxyConfig, WalletError,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use sui_creek::account::{AccountEntry, ImportError};
use sui_creek::config::ClaimTarget;
use sui_creek::tokens::SUI_TYPE;
use sui_creek::faucet::classify;
use sui_creek::{
    Account, AccountSource, BalanceReader, ChainClient, ChainError, Coin,
    FaucetClient, FaucetHttpResponse, FaucetPolicy, FaucetTransport, MoveCall, Pacer, TokenKind,
    TokenTypes, TransactionSigner,
};
use tokio_util::sync::CancellationToken;

pub const ONE_SUI: u64 = 1_000_000_000;

pub fn address(n: u8) -> String {
    format!("0x{}", hex_byte(n).repeat(32))
}

fn hex_byte(n: u8) -> String {
    format!("{:02x}", n)
}

pub fn rate_limited() -> ChainError {
    ChainError::Network(NetworkError::RateLimited {
        endpoint: "fake".to_string(),
    })
}

pub fn execution_failed() -> ChainError {
    ChainError::Execution {
        digest: "Dfail".to_string(),
        reason: "MoveAbort(1)".to_string(),
    }
}

// --- Chain ---

#[derive(Default)]
pub struct FakeChain {
    balances: Mutex<HashMap<(String, String), u64>>,
    read_failures: Mutex<VecDeque<ChainError>>,
    submit_results: Mutex<VecDeque<Result<String, ChainError>>>,
    submitted: Mutex<Vec<(String, MoveCall, u64)>>,
    reads: AtomicU32,
}

impl FakeChain {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_balance(&self, owner: &str, coin_type: &str, raw: u64) {
        self.balances
            .lock()
            .unwrap()
            .insert((owner.to_string(), coin_type.to_string()), raw);
    }

    pub fn credit(&self, owner: &str, coin_type: &str, raw: u64) {
        *self
            .balances
            .lock()
            .unwrap()
            .entry((owner.to_string(), coin_type.to_string()))
            .or_insert(0) += raw;
    }

    /// The next reads fail with these errors, in order.
    pub fn fail_next_reads(&self, errors: Vec<ChainError>) {
        self.read_failures.lock().unwrap().extend(errors);
    }

    /// Results for the next submissions, in order. Unscripted calls succeed.
    pub fn script_submissions(&self, results: Vec<Result<String, ChainError>>) {
        self.submit_results.lock().unwrap().extend(results);
    }

    pub fn submitted(&self) -> Vec<(String, MoveCall, u64)> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn reads(&self) -> u32 {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainClient for FakeChain {
    async fn read_owned_coins(
        &self,
        owner: &str,
        coin_type: &str,
    ) -> Result<Vec<Coin>, ChainError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.read_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        let raw = self
            .balances
            .lock()
            .unwrap()
            .get(&(owner.to_string(), coin_type.to_string()))
            .copied()
            .unwrap_or(0);
        if raw == 0 {
            return Ok(Vec::new());
        }
        Ok(vec![Coin {
            object_id: format!("0xcoin-{}", coin_type),
            balance: raw,
        }])
    }

    async fn submit_call(
        &self,
        signer: &dyn TransactionSigner,
        call: &MoveCall,
        gas_budget: u64,
    ) -> Result<String, ChainError> {
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push((signer.address().to_string(), call.clone(), gas_budget));
        let n = submitted.len();
        drop(submitted);

        self.submit_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(format!("Digest{:06}", n)))
    }
}

// --- Faucet ---

pub fn faucet_ok() -> Result<FaucetHttpResponse, NetworkError> {
    Ok(FaucetHttpResponse {
        status: 200,
        body: r#"{"status":"Success"}"#.to_string(),
    })
}

pub fn faucet_429() -> Result<FaucetHttpResponse, NetworkError> {
    Ok(FaucetHttpResponse {
        status: 429,
        body: String::new(),
    })
}

pub fn faucet_500() -> Result<FaucetHttpResponse, NetworkError> {
    Ok(FaucetHttpResponse {
        status: 500,
        body: String::new(),
    })
}

/// Scripted faucet. A dispensing reply credits `credit` raw SUI on the chain.
pub struct FakeFaucet {
    replies: Mutex<VecDeque<Result<FaucetHttpResponse, NetworkError>>>,
    fallback: Result<FaucetHttpResponse, NetworkError>,
    chain: Option<(Arc<FakeChain>, u64)>,
    requests: Mutex<Vec<(String, Option<ProxyConfig>)>>,
}

impl FakeFaucet {
    pub fn always(reply: Result<FaucetHttpResponse, NetworkError>) -> Arc<Self> {
        Self::scripted(Vec::new(), reply, None)
    }

    pub fn scripted(
        replies: Vec<Result<FaucetHttpResponse, NetworkError>>,
        fallback: Result<FaucetHttpResponse, NetworkError>,
        chain: Option<(Arc<FakeChain>, u64)>,
    ) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            fallback,
            chain,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<(String, Option<ProxyConfig>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl FaucetTransport for FakeFaucet {
    async fn post_request(
        &self,
        recipient: &str,
        proxy: Option<&ProxyConfig>,
    ) -> Result<FaucetHttpResponse, NetworkError> {
        self.requests
            .lock()
            .unwrap()
            .push((recipient.to_string(), proxy.cloned()));

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        if let (Ok(response), Some((chain, raw))) = (&reply, &self.chain) {
            if classify(response.status, &response.body).succeeded() {
                chain.credit(recipient, SUI_TYPE, *raw);
            }
        }
        reply
    }
}

// --- Time ---

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()
}

/// Virtual clock: every sleep advances `now` instantly.
///
/// With `cancel_after`, the n-th sleep of at least one hour cancels the token
/// and then never completes.
pub struct FakeClock {
    now: Mutex<DateTime<Utc>>,
    sleeps: Mutex<Vec<Duration>>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl FakeClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(epoch()),
            sleeps: Mutex::new(Vec::new()),
            cancel_after: None,
        })
    }

    pub fn cancelling_after(long_sleeps: usize, token: CancellationToken) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(epoch()),
            sleeps: Mutex::new(Vec::new()),
            cancel_after: Some((long_sleeps, token)),
        })
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    pub fn slept_secs(&self) -> Vec<u64> {
        self.sleeps().iter().map(Duration::as_secs).collect()
    }
}

#[async_trait]
impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        let long_sleeps = {
            let mut sleeps = self.sleeps.lock().unwrap();
            sleeps.push(duration);
            let mut now = self.now.lock().unwrap();
            *now += chrono::Duration::from_std(duration).unwrap();
            sleeps
                .iter()
                .filter(|d| **d >= Duration::from_secs(3600))
                .count()
        };

        if let Some((limit, token)) = &self.cancel_after {
            if duration >= Duration::from_secs(3600) && long_sleeps >= *limit {
                token.cancel();
                std::future::pending::<()>().await;
            }
        }
        tokio::task::yield_now().await;
    }
}

pub fn pacer(clock: Arc<FakeClock>) -> Pacer {
    Pacer::new(clock, Arc::new(MinimumJitter))
}

// --- Accounts ---

pub struct FakeSigner {
    address: String,
}

impl FakeSigner {
    pub fn boxed(address: &str) -> Box<dyn TransactionSigner> {
        Box::new(Self {
            address: address.to_string(),
        })
    }
}

impl TransactionSigner for FakeSigner {
    fn address(&self) -> &str {
        &self.address
    }

    fn sign_transaction(&self, _tx_bytes: &[u8]) -> Result<String, ChainError> {
        Ok("c2lnbmF0dXJl".to_string())
    }
}

pub fn account(index: usize, address: &str) -> Account {
    Account::new(index, FakeSigner::boxed(address), None)
}

/// Rebuilds the same account list on every load.
pub struct StaticSource {
    entries: Vec<Option<String>>,
    error: Option<ConfigError>,
    loads: AtomicU32,
}

impl StaticSource {
    /// `None` entries stand for keys that fail to import.
    pub fn new(entries: Vec<Option<String>>) -> Arc<Self> {
        Arc::new(Self {
            entries,
            error: None,
            loads: AtomicU32::new(0),
        })
    }

    pub fn failing(error: ConfigError) -> Arc<Self> {
        Arc::new(Self {
            entries: Vec::new(),
            error: Some(error),
            loads: AtomicU32::new(0),
        })
    }

    pub fn loads(&self) -> u32 {
        self.loads.load(Ordering::SeqCst)
    }
}

impl AccountSource for StaticSource {
    fn load(&self) -> Result<Vec<AccountEntry>, ConfigError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = &self.error {
            return Err(e.clone());
        }
        Ok(self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| match entry {
                Some(address) => Ok(account(i + 1, address)),
                None => Err(ImportError {
                    index: i + 1,
                    source: WalletError::InvalidKeyLength { length: 7 },
                }),
            })
            .collect())
    }
}

// --- Wiring ---

pub fn claim_target(token: TokenKind, count: u32) -> ClaimTarget {
    ClaimTarget {
        token,
        package: "0xfaucet".to_string(),
        module: token.symbol().to_lowercase(),
        function: "mint".to_string(),
        shared_object: format!("0xtreasury-{}", token.symbol().to_lowercase()),
        amount: 1_000,
        count,
    }
}

pub fn policy() -> FaucetPolicy {
    FaucetPolicy {
        settle_delay: Duration::from_secs(3),
        backoff: DelayRange::new(3, 10),
        claim_cooldown: DelayRange::new(10, 15),
        gas_budget: 200_000_000,
    }
}

pub fn balance_reader(chain: Arc<FakeChain>, pacer: Pacer) -> Arc<BalanceReader> {
    Arc::new(BalanceReader::new(
        chain,
        pacer,
        TokenTypes::default(),
        Duration::from_secs(30),
        9,
    ))
}

pub fn faucet_client(
    chain: Arc<FakeChain>,
    faucet: Arc<FakeFaucet>,
    clock: Arc<FakeClock>,
) -> FaucetClient {
    let pacer = pacer(clock);
    let balances = balance_reader(chain.clone(), pacer.clone());
    FaucetClient::new(faucet, chain, balances, pacer, policy())
}
