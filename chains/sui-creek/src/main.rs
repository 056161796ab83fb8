use anyhow::{bail, Context, Result};
use core_logic::{
    setup_logger, shutdown_token, ProxyManager, RandomJitter, SystemClock, WalletManager,
    REPORT_TARGET,
};
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use sui_creek::config::DEFAULT_CONFIG_PATH;
use sui_creek::{
    report, BalanceReader, CreekConfig, FaucetClient, FaucetPolicy, FileAccountSource,
    HealthFactorCalculator, HttpFaucetTransport, Pacer, PipelineSettings, RunScheduler,
    ScheduleSettings, SuiRpcClient, TerminationReason, WalletPipeline,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    // Keep guard alive for file logging
    let _log_guard = setup_logger("sui_creek");

    info!("🤖 SUI CREEK - daily faucet runner (Sui testnet)");

    let config_path = env::var("CREEK_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    info!("Loading config from: {}", config_path);
    let config = CreekConfig::load(&config_path)
        .with_context(|| format!("Invalid configuration in {}", config_path))?;

    let pacer = Pacer::new(Arc::new(SystemClock), Arc::new(RandomJitter));

    let rpc = Arc::new(SuiRpcClient::new(
        &config.network.rpc_url,
        Duration::from_secs(config.network.rpc_timeout_secs),
        config.network.rpc_retries,
    )?
    .with_clock(pacer.clock().clone()));
    info!("RPC: {}", rpc.endpoint());

    let balances = Arc::new(BalanceReader::new(
        rpc.clone(),
        pacer.clone(),
        config.tokens.clone(),
        config.balances.rate_limit_cooldown(),
        config.balances.decimals,
    ));

    let transport = Arc::new(HttpFaucetTransport::new(
        &config.network.faucet_url,
        Duration::from_secs(config.network.faucet_timeout_secs),
    ));
    let faucet = FaucetClient::new(
        transport,
        rpc,
        balances.clone(),
        pacer.clone(),
        FaucetPolicy::from_config(&config),
    );

    let mut pipeline = WalletPipeline::new(balances, faucet, PipelineSettings::from_config(&config));
    if config.health.report {
        pipeline = pipeline.with_health(HealthFactorCalculator::from_config(&config.health));
    }

    let proxies = ProxyManager::load_positional(&config.files.proxies)?;
    info!(target: REPORT_TARGET, "{}", report::proxy_overview(&proxies));

    let source = Arc::new(FileAccountSource::new(
        WalletManager::new(&config.files.private_keys),
        proxies,
    ));

    let mut scheduler = RunScheduler::new(
        source,
        pipeline,
        pacer,
        ScheduleSettings {
            period: config.schedule.period(),
            account_gap: config.schedule.account_gap,
        },
    );

    info!(
        "🟢 Running once every {}h, {} claim targets",
        config.schedule.period_hours,
        config.claims.targets.len()
    );

    match scheduler.run(shutdown_token()).await {
        TerminationReason::Interrupted => {
            info!("⏹️ Bot stopped by user");
            Ok(())
        }
        reason => bail!("Scheduler terminated: {}", reason),
    }
}
