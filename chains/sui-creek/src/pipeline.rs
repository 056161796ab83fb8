//! Per-account procedure.
//!
//! Order of a run:
//! 1. opening balance snapshot
//! 2. gas gate (abort on failure, no closing snapshot)
//! 3. token claims, each attempt an independent outcome
//! 4. registered [`PipelineStep`]s
//! 5. closing balance snapshot and optional health snapshot
//!
//! Nothing here returns an error: every failure ends up in the
//! [`AccountRunResult`].

use crate::account::Account;
use crate::balance::BalanceReader;
use crate::config::{ClaimTarget, CreekConfig};
use crate::faucet::FaucetClient;
use crate::health::HealthFactorCalculator;
use crate::outcome::{AccountRunResult, OperationKind, OperationOutcome};
use crate::report;
use async_trait::async_trait;
use core_logic::REPORT_TARGET;
use std::sync::Arc;
use tracing::{error, info};

/// Extra on-chain work run after the claims (swaps, staking, lending).
///
/// A step's failures are recorded as outcomes and never stop the pipeline.
#[async_trait]
pub trait PipelineStep: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, account: &Account) -> Vec<OperationOutcome>;
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub min_balance: f64,
    pub max_faucet_attempts: u32,
    pub claims: Vec<ClaimTarget>,
}

impl PipelineSettings {
    pub fn from_config(config: &CreekConfig) -> Self {
        Self {
            min_balance: config.gas_gate.min_balance,
            max_faucet_attempts: config.gas_gate.max_attempts,
            claims: config.claims.targets.clone(),
        }
    }
}

pub struct WalletPipeline {
    balances: Arc<BalanceReader>,
    faucet: FaucetClient,
    settings: PipelineSettings,
    health: Option<HealthFactorCalculator>,
    steps: Vec<Box<dyn PipelineStep>>,
}

impl WalletPipeline {
    pub fn new(balances: Arc<BalanceReader>, faucet: FaucetClient, settings: PipelineSettings) -> Self {
        Self {
            balances,
            faucet,
            settings,
            health: None,
            steps: Vec::new(),
        }
    }

    /// Rates the closing balances of every completed run.
    pub fn with_health(mut self, calculator: HealthFactorCalculator) -> Self {
        self.health = Some(calculator);
        self
    }

    pub fn with_step(mut self, step: Box<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn claim_targets(&self) -> &[ClaimTarget] {
        &self.settings.claims
    }

    pub async fn process(&self, account: &Account) -> AccountRunResult {
        let address = account.address();
        let mut outcomes = Vec::new();

        let balance_before = self.balances.snapshot(address).await;
        info!(target: REPORT_TARGET, "{}", report::snapshot_line("Initial balance", &balance_before));

        info!("📍 STEP 1: Check & Get SUI Balance");
        let gate = self
            .faucet
            .ensure_minimum_balance(
                address,
                account.proxy.as_ref(),
                self.settings.min_balance,
                self.settings.max_faucet_attempts,
            )
            .await;

        let gate_outcome = if gate.satisfied {
            OperationOutcome::success(OperationKind::FaucetClaimNative, None)
        } else {
            OperationOutcome::failure(
                OperationKind::FaucetClaimNative,
                gate.last_error
                    .clone()
                    .unwrap_or_else(|| "balance below minimum".to_string()),
            )
        };
        outcomes.push(gate_outcome.with_retries(gate.retry_count()));

        if !gate.satisfied {
            error!("❌ FAILED to get SUI for wallet #{}", account.index);
            return AccountRunResult {
                wallet_index: account.index,
                address: address.to_string(),
                balance_before,
                balance_after: None,
                outcomes,
                faucet: gate.diagnostics,
                health: None,
                overall_success: false,
                abort_reason: Some(format!(
                    "gas gate: {:.6} SUI after {} faucet requests",
                    gate.final_balance, gate.diagnostics.requests
                )),
            };
        }

        for (step, target) in self.settings.claims.iter().enumerate() {
            info!("📍 STEP {}: Claim {}", step + 2, target.token);
            let kind = OperationKind::FaucetClaimToken(target.token);
            let mut claimed = 0;

            for attempt in 1..=target.count {
                let outcome = match self.faucet.claim_token(account.signer.as_ref(), target, attempt).await {
                    Ok(digest) => {
                        claimed += 1;
                        OperationOutcome::success(kind, Some(digest))
                    }
                    Err(e) => OperationOutcome::failure(kind, e.to_string()),
                };
                outcomes.push(outcome);
            }

            info!("📊 {} Claims: {}/{}", target.token, claimed, target.count);
        }

        for step in &self.steps {
            info!("📍 {}", step.name());
            outcomes.extend(step.run(account).await);
        }

        let balance_after = self.balances.snapshot(address).await;
        info!(
            target: REPORT_TARGET,
            "{}",
            report::balance_table(address, &balance_before, &balance_after)
        );

        let health = self.health.as_ref().map(|calculator| {
            let snapshot = calculator.assess(&balance_after);
            info!(target: REPORT_TARGET, "{}", report::health_snapshot(&snapshot));
            outcomes.push(OperationOutcome::success(OperationKind::HealthCheck, None));
            snapshot
        });

        info!("✅ SUCCESS wallet #{} processed", account.index);

        AccountRunResult {
            wallet_index: account.index,
            address: address.to_string(),
            balance_before,
            balance_after: Some(balance_after),
            outcomes,
            faucet: gate.diagnostics,
            health,
            overall_success: true,
            abort_reason: None,
        }
    }
}
