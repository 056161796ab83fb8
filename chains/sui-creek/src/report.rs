//! Report formatting.
//!
//! Pure functions over finished records. Callers log the returned text under
//! [`core_logic::REPORT_TARGET`].

use crate::config::ClaimTarget;
use crate::health::HealthFactorSnapshot;
use crate::outcome::{DayRunStats, OperationKind, TokenBalanceSnapshot};
use crate::tokens::TokenKind;
use chrono::{DateTime, Utc};
use core_logic::{ProxyConfig, ProxyMap};

const WIDTH: usize = 70;
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn heavy() -> String {
    "═".repeat(WIDTH)
}

fn light() -> String {
    "─".repeat(WIDTH)
}

/// `0x1234567890...89abcdef`
pub fn short_address(address: &str) -> String {
    match (address.get(..12), address.len().checked_sub(8).and_then(|i| address.get(i..))) {
        (Some(head), Some(tail)) if address.len() > 20 => format!("{}...{}", head, tail),
        _ => address.to_string(),
    }
}

fn decimals(token: TokenKind) -> usize {
    if token.is_native() {
        6
    } else {
        2
    }
}

/// One-line snapshot, e.g. `GR: 0.00, SUI: 1.500000, ...`
pub fn snapshot_line(label: &str, snapshot: &TokenBalanceSnapshot) -> String {
    let parts: Vec<String> = TokenKind::TRACKED
        .iter()
        .map(|&t| format!("{}: {:.*}", t, decimals(t), snapshot.get(t)))
        .collect();
    format!("✅ {}: {}", label, parts.join(", "))
}

pub fn wallet_header(index: usize, total: usize, address: &str, proxy: Option<&ProxyConfig>) -> String {
    let route = proxy
        .map(|p| p.to_string())
        .unwrap_or_else(|| "🌍 Local IP".to_string());
    [
        heavy(),
        format!("  WALLET {}/{}", index, total),
        heavy(),
        format!("  Address: {}", address),
        format!("  Proxy: {}", route),
    ]
    .join("\n")
}

pub fn balance_table(
    address: &str,
    before: &TokenBalanceSnapshot,
    after: &TokenBalanceSnapshot,
) -> String {
    let mut lines = vec![
        heavy(),
        "  💰 BALANCE TRACKING REPORT".to_string(),
        heavy(),
        format!("  Address: {}", short_address(address)),
        light(),
        format!("  {:<5} │ {:>15} │ {:>15} │ {:>12}", "Token", "Before", "After", "Change"),
        light(),
    ];

    for token in TokenKind::TRACKED {
        let (b, a) = (before.get(token), after.get(token));
        lines.push(format!(
            "  {:<5} │ {:>15.6} │ {:>15.6} │ {:>12.6}",
            token.symbol(),
            b,
            a,
            a - b
        ));
    }
    lines.push(heavy());
    lines.join("\n")
}

pub fn health_snapshot(snapshot: &HealthFactorSnapshot) -> String {
    let collateral: Vec<String> = snapshot
        .collateral
        .iter()
        .map(|p| format!("{} {:.2} (${:.2})", p.token, p.amount, p.value))
        .collect();

    [
        heavy(),
        "  📊 HEALTH FACTOR SNAPSHOT".to_string(),
        heavy(),
        format!("  Collateral: {}", collateral.join(" + ")),
        format!("  Total Collateral: ${:.2}", snapshot.collateral_value),
        format!(
            "  Borrow: {} {:.2} (${:.2})",
            snapshot.borrow.token, snapshot.borrow.amount, snapshot.borrow.value
        ),
        light(),
        format!("  Health Factor: {} {}", snapshot.ratio, snapshot.risk_tier),
        heavy(),
    ]
    .join("\n")
}

pub fn day_header(day: u32, started_at: DateTime<Utc>) -> String {
    [
        heavy(),
        format!("  📅 DAY #{} - {}", day, started_at.format("%Y-%m-%d")),
        format!("  🟢 Start: {}", started_at.format(TIME_FORMAT)),
        heavy(),
    ]
    .join("\n")
}

/// Day totals; expected claims are `accounts_total * count` per target.
pub fn day_summary(stats: &DayRunStats, targets: &[ClaimTarget]) -> String {
    let claims: Vec<String> = targets
        .iter()
        .map(|t| {
            format!(
                "{}: {}/{}",
                t.token,
                stats.claims(OperationKind::FaucetClaimToken(t.token)),
                stats.accounts_total as u32 * t.count
            )
        })
        .collect();

    let end = stats
        .finished_at
        .map(|at| at.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string());

    [
        heavy(),
        format!("  ✅ DAY #{} COMPLETED!", stats.day),
        heavy(),
        format!("  🟢 Start: {}", stats.started_at.format(TIME_FORMAT)),
        format!("  🔴 End: {}", end),
        format!("  ⏱️ Duration: {} minutes", stats.duration().num_minutes()),
        light(),
        "  📊 STATISTICS:".to_string(),
        format!(
            "    🎯 Total: {} | ✓ {} | ✗ {} (import failures: {})",
            stats.accounts_total, stats.success_count, stats.failure_count, stats.import_failures
        ),
        format!("    💰 Claims: {}", claims.join(" | ")),
        format!(
            "    💧 Faucet: {} requests | {} dispensed | {} rate-limited | {} failed",
            stats.faucet.requests,
            stats.faucet.dispensed,
            stats.faucet.rate_limited,
            stats.faucet.hard_failures
        ),
        heavy(),
    ]
    .join("\n")
}

pub fn next_run_banner(
    started_at: DateTime<Utc>,
    next_run: DateTime<Utc>,
    wait: chrono::Duration,
) -> String {
    let wait = wait.max(chrono::Duration::zero());
    [
        heavy(),
        "  ⏰ WAITING UNTIL NEXT RUN...".to_string(),
        heavy(),
        format!("  📅 Today: {}", started_at.format("%Y-%m-%d")),
        format!("  🔄 Next run: {}", next_run.format(TIME_FORMAT)),
        format!(
            "  ⏱️ Wait: {} hours {} minutes",
            wait.num_hours(),
            wait.num_minutes() % 60
        ),
        heavy(),
    ]
    .join("\n")
}

pub fn proxy_overview(proxies: &ProxyMap) -> String {
    let mut lines = vec![
        heavy(),
        format!(
            "  📋 PROXY CONFIGURATION ({} of {} slots set)",
            proxies.configured(),
            proxies.len()
        ),
        heavy(),
    ];
    if proxies.is_empty() {
        lines.push("  all wallets: LOCAL IP".to_string());
    }
    for (index, slot) in proxies.iter() {
        match slot {
            Some(proxy) => lines.push(format!("  pk{}: {}", index, proxy)),
            None => lines.push(format!("  pk{}: LOCAL IP (empty line)", index)),
        }
    }
    lines.join("\n")
}
