mod common;

use async_trait::async_trait;
use common::*;
use std::sync::Arc;
use sui_creek::config::{ClaimTarget, HealthConfig};
use sui_creek::tokens::SUI_TYPE;
use sui_creek::{
    Account, HealthFactorCalculator, OperationKind, OperationOutcome, PipelineSettings,
    PipelineStep, RiskTier, TokenKind, TokenTypes, WalletPipeline,
};

fn build(
    chain: Arc<FakeChain>,
    faucet: Arc<FakeFaucet>,
    clock: Arc<FakeClock>,
    claims: Vec<ClaimTarget>,
) -> WalletPipeline {
    let pacer = pacer(clock.clone());
    let balances = balance_reader(chain.clone(), pacer);
    WalletPipeline::new(
        balances,
        faucet_client(chain, faucet, clock),
        PipelineSettings {
            min_balance: 1.0,
            max_faucet_attempts: 3,
            claims,
        },
    )
}

#[tokio::test]
async fn test_gas_gate_failure_aborts_without_closing_snapshot() {
    let chain = FakeChain::new();
    let owner = address(1);
    let pipeline = build(
        chain.clone(),
        FakeFaucet::always(faucet_429()),
        FakeClock::new(),
        vec![claim_target(TokenKind::Xaum, 3)],
    );

    let result = pipeline.process(&account(1, &owner)).await;

    assert!(!result.overall_success);
    assert!(result.balance_after.is_none());
    assert!(result.abort_reason.is_some());
    assert!(chain.submitted().is_empty());
    assert_eq!(result.outcomes.len(), 1);

    let gate = &result.outcomes[0];
    assert_eq!(gate.kind, OperationKind::FaucetClaimNative);
    assert!(!gate.succeeded);
    assert_eq!(gate.retry_count, 2);
    assert_eq!(result.faucet.rate_limited, 3);
    assert_eq!(result.faucet.hard_failures, 0);
}

#[tokio::test]
async fn test_all_claims_failing_is_still_a_successful_run() {
    let chain = FakeChain::new();
    let owner = address(2);
    chain.set_balance(&owner, SUI_TYPE, 5 * ONE_SUI);
    chain.script_submissions(vec![
        Err(execution_failed()),
        Err(execution_failed()),
        Err(rate_limited()),
    ]);
    let pipeline = build(
        chain,
        FakeFaucet::always(faucet_429()),
        FakeClock::new(),
        vec![claim_target(TokenKind::Usdc, 3)],
    );

    let result = pipeline.process(&account(1, &owner)).await;

    assert!(result.overall_success);
    assert!(result.balance_after.is_some());
    let kind = OperationKind::FaucetClaimToken(TokenKind::Usdc);
    assert_eq!(result.attempts(kind), 3);
    assert_eq!(result.successes(kind), 0);
    assert!(result
        .outcomes
        .iter()
        .filter(|o| o.kind == kind)
        .all(|o| o.error_detail.is_some()));
}

#[tokio::test]
async fn test_claims_run_per_target_in_order() {
    let chain = FakeChain::new();
    let owner = address(3);
    chain.set_balance(&owner, SUI_TYPE, 5 * ONE_SUI);
    chain.script_submissions(vec![
        Ok("X1".to_string()),
        Err(execution_failed()),
        Ok("X3".to_string()),
    ]);
    let clock = FakeClock::new();
    let pipeline = build(
        chain.clone(),
        FakeFaucet::always(faucet_429()),
        clock.clone(),
        vec![claim_target(TokenKind::Xaum, 3), claim_target(TokenKind::Usdc, 2)],
    );

    let result = pipeline.process(&account(1, &owner)).await;

    let modules: Vec<String> = chain
        .submitted()
        .iter()
        .map(|(_, call, _)| call.module.clone())
        .collect();
    assert_eq!(modules, vec!["xaum", "xaum", "xaum", "usdc", "usdc"]);
    assert_eq!(result.successes(OperationKind::FaucetClaimToken(TokenKind::Xaum)), 2);
    assert_eq!(result.successes(OperationKind::FaucetClaimToken(TokenKind::Usdc)), 2);
    // Cooldown only after the four successful claims.
    assert_eq!(clock.slept_secs(), vec![10, 10, 10, 10]);
    assert_eq!(result.faucet.requests, 0);
}

#[tokio::test]
async fn test_balances_never_negative_and_gate_funded_by_faucet() {
    let chain = FakeChain::new();
    let owner = address(4);
    let types = TokenTypes::default();
    chain.set_balance(&owner, &types.gr, 3 * ONE_SUI);
    let faucet = FakeFaucet::scripted(Vec::new(), faucet_ok(), Some((chain.clone(), 2 * ONE_SUI)));
    let pipeline = build(chain, faucet, FakeClock::new(), Vec::new());

    let result = pipeline.process(&account(1, &owner)).await;

    assert!(result.overall_success);
    let after = result.balance_after.as_ref().unwrap();
    assert_eq!(result.balance_before.get(TokenKind::Sui), 0.0);
    assert_eq!(after.get(TokenKind::Sui), 2.0);
    assert_eq!(after.get(TokenKind::Gr), 3.0);
    for token in TokenKind::TRACKED {
        assert!(result.balance_before.get(token) >= 0.0);
        assert!(after.get(token) >= 0.0);
    }
    assert_eq!(result.faucet.dispensed, 1);
}

struct ReservedStep;

#[async_trait]
impl PipelineStep for ReservedStep {
    fn name(&self) -> &str {
        "Swap USDC to GUSD"
    }

    async fn run(&self, _account: &Account) -> Vec<OperationOutcome> {
        vec![OperationOutcome::failure(
            OperationKind::SwapUsdcToGusd,
            "pool unavailable",
        )]
    }
}

#[tokio::test]
async fn test_registered_step_failure_is_recorded_not_fatal() {
    let chain = FakeChain::new();
    let owner = address(5);
    chain.set_balance(&owner, SUI_TYPE, 5 * ONE_SUI);
    let pipeline = build(
        chain,
        FakeFaucet::always(faucet_429()),
        FakeClock::new(),
        vec![claim_target(TokenKind::Xaum, 1)],
    )
    .with_step(Box::new(ReservedStep));

    let result = pipeline.process(&account(1, &owner)).await;

    assert!(result.overall_success);
    let kinds: Vec<OperationKind> = result.outcomes.iter().map(|o| o.kind).collect();
    assert_eq!(
        kinds,
        vec![
            OperationKind::FaucetClaimNative,
            OperationKind::FaucetClaimToken(TokenKind::Xaum),
            OperationKind::SwapUsdcToGusd,
        ]
    );
}

#[tokio::test]
async fn test_health_snapshot_from_closing_balances() {
    let chain = FakeChain::new();
    let owner = address(6);
    let types = TokenTypes::default();
    chain.set_balance(&owner, SUI_TYPE, 5 * ONE_SUI);
    chain.set_balance(&owner, &types.usdc, 100 * ONE_SUI);
    let pipeline = build(
        chain,
        FakeFaucet::always(faucet_429()),
        FakeClock::new(),
        Vec::new(),
    )
    .with_health(HealthFactorCalculator::from_config(&HealthConfig::default()));

    let result = pipeline.process(&account(1, &owner)).await;

    let health = result.health.as_ref().unwrap();
    assert_eq!(health.risk_tier, RiskTier::VerySafe);
    assert_eq!(health.collateral_value, 100.0);
    assert_eq!(result.successes(OperationKind::HealthCheck), 1);
}
