//! Result records passed up from the pipeline to the scheduler.
//!
//! Everything here is plain data: built once, never mutated after it is
//! handed back, and aggregated by value.

use crate::faucet::FaucetReply;
use crate::health::HealthFactorSnapshot;
use crate::tokens::TokenKind;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationKind {
    /// Gas-gate faucet funding of the native token
    FaucetClaimNative,
    /// On-chain mint of a faucet token
    FaucetClaimToken(TokenKind),
    HealthCheck,
    SwapUsdcToGusd,
    SwapGusdToUsdc,
    StakeXaum,
    RedeemXaum,
    LendingDeposit(TokenKind),
    LendingBorrow,
    LendingRepay,
    LendingWithdraw,
}

impl OperationKind {
    /// Counted in per-day claim totals
    pub fn is_claim(&self) -> bool {
        matches!(self, OperationKind::FaucetClaimToken(_))
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::FaucetClaimNative => write!(f, "faucet-claim-native"),
            OperationKind::FaucetClaimToken(t) => write!(f, "faucet-claim-{}", t),
            OperationKind::HealthCheck => write!(f, "health-check"),
            OperationKind::SwapUsdcToGusd => write!(f, "swap-usdc-gusd"),
            OperationKind::SwapGusdToUsdc => write!(f, "swap-gusd-usdc"),
            OperationKind::StakeXaum => write!(f, "stake-xaum"),
            OperationKind::RedeemXaum => write!(f, "redeem-xaum"),
            OperationKind::LendingDeposit(t) => write!(f, "deposit-{}", t),
            OperationKind::LendingBorrow => write!(f, "borrow"),
            OperationKind::LendingRepay => write!(f, "repay"),
            OperationKind::LendingWithdraw => write!(f, "withdraw"),
        }
    }
}

/// One attempted action.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationOutcome {
    pub kind: OperationKind,
    pub succeeded: bool,
    pub error_detail: Option<String>,
    /// Extra tries spent inside this action (faucet requests beyond the first)
    pub retry_count: u32,
    pub digest: Option<String>,
}

impl OperationOutcome {
    pub fn success(kind: OperationKind, digest: Option<String>) -> Self {
        Self {
            kind,
            succeeded: true,
            error_detail: None,
            retry_count: 0,
            digest,
        }
    }

    pub fn failure(kind: OperationKind, error: impl Into<String>) -> Self {
        Self {
            kind,
            succeeded: false,
            error_detail: Some(error.into()),
            retry_count: 0,
            digest: None,
        }
    }

    pub fn with_retries(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }
}

/// Decimal balances per tracked token. Amounts are clamped at zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenBalanceSnapshot {
    amounts: BTreeMap<TokenKind, f64>,
}

impl TokenBalanceSnapshot {
    pub fn insert(&mut self, token: TokenKind, amount: f64) {
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        self.amounts.insert(token, amount);
    }

    /// Missing tokens read as zero.
    pub fn get(&self, token: TokenKind) -> f64 {
        self.amounts.get(&token).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TokenKind, f64)> + '_ {
        self.amounts.iter().map(|(t, a)| (*t, *a))
    }
}

impl FromIterator<(TokenKind, f64)> for TokenBalanceSnapshot {
    fn from_iter<I: IntoIterator<Item = (TokenKind, f64)>>(iter: I) -> Self {
        let mut snapshot = Self::default();
        for (token, amount) in iter {
            snapshot.insert(token, amount);
        }
        snapshot
    }
}

/// Faucet request counters, rate limits kept apart from hard failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaucetDiagnostics {
    pub requests: u32,
    pub dispensed: u32,
    pub rate_limited: u32,
    pub hard_failures: u32,
}

impl FaucetDiagnostics {
    pub fn record(&mut self, reply: &FaucetReply) {
        self.requests += 1;
        match reply {
            FaucetReply::Dispensed => self.dispensed += 1,
            FaucetReply::RateLimited => self.rate_limited += 1,
            FaucetReply::Failed(_) => self.hard_failures += 1,
        }
    }

    pub fn merge(&mut self, other: &FaucetDiagnostics) {
        self.requests += other.requests;
        self.dispensed += other.dispensed;
        self.rate_limited += other.rate_limited;
        self.hard_failures += other.hard_failures;
    }
}

/// Everything one account produced during one day.
#[derive(Debug, Clone)]
pub struct AccountRunResult {
    pub wallet_index: usize,
    pub address: String,
    pub balance_before: TokenBalanceSnapshot,
    /// Unset when the run aborted at the gas gate
    pub balance_after: Option<TokenBalanceSnapshot>,
    pub outcomes: Vec<OperationOutcome>,
    pub faucet: FaucetDiagnostics,
    pub health: Option<HealthFactorSnapshot>,
    pub overall_success: bool,
    pub abort_reason: Option<String>,
}

impl AccountRunResult {
    pub fn successes(&self, kind: OperationKind) -> u32 {
        self.outcomes
            .iter()
            .filter(|o| o.kind == kind && o.succeeded)
            .count() as u32
    }

    pub fn attempts(&self, kind: OperationKind) -> u32 {
        self.outcomes.iter().filter(|o| o.kind == kind).count() as u32
    }
}

/// Aggregate of one scheduled day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayRunStats {
    pub day: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub accounts_total: usize,
    pub success_count: u32,
    pub failure_count: u32,
    /// Credentials that could not be turned into an account
    pub import_failures: u32,
    pub claim_counts: BTreeMap<OperationKind, u32>,
    pub faucet: FaucetDiagnostics,
}

impl DayRunStats {
    pub fn new(day: u32, started_at: DateTime<Utc>, accounts_total: usize) -> Self {
        Self {
            day,
            started_at,
            finished_at: None,
            accounts_total,
            success_count: 0,
            failure_count: 0,
            import_failures: 0,
            claim_counts: BTreeMap::new(),
            faucet: FaucetDiagnostics::default(),
        }
    }

    pub fn record(&mut self, result: &AccountRunResult) {
        if result.overall_success {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
        }

        for outcome in result.outcomes.iter().filter(|o| o.succeeded && o.kind.is_claim()) {
            *self.claim_counts.entry(outcome.kind).or_insert(0) += 1;
        }

        self.faucet.merge(&result.faucet);
    }

    pub fn record_import_failure(&mut self) {
        self.failure_count += 1;
        self.import_failures += 1;
    }

    pub fn finish(mut self, at: DateTime<Utc>) -> Self {
        self.finished_at = Some(at);
        self
    }

    pub fn claims(&self, kind: OperationKind) -> u32 {
        self.claim_counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at
            .map(|end| end - self.started_at)
            .unwrap_or_else(chrono::Duration::zero)
    }
}
