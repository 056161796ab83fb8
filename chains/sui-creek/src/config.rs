//! Configuration loader for sui-creek
//!
//! Every field has a default so the bot runs with no config file at all.

use crate::tokens::{TokenKind, TokenTypes};
use anyhow::{Context, Result};
use core_logic::{ConfigError, DelayRange};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Longest accepted cadence (one leap year)
pub const MAX_PERIOD_HOURS: u64 = 24 * 366;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreekConfig {
    pub network: NetworkConfig,
    pub files: FilesConfig,
    pub gas_gate: GasGateConfig,
    pub balances: BalanceConfig,
    pub claims: ClaimsConfig,
    pub schedule: ScheduleConfig,
    pub tokens: TokenTypes,
    pub health: HealthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Sui JSON-RPC endpoint
    pub rpc_url: String,
    /// Faucet gas endpoint (v2)
    pub faucet_url: String,
    pub faucet_timeout_secs: u64,
    pub rpc_timeout_secs: u64,
    /// Extra attempts for transient RPC transport errors
    pub rpc_retries: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://sui-testnet-rpc.publicnode.com".to_string(),
            faucet_url: "https://faucet.testnet.sui.io/v2/gas".to_string(),
            faucet_timeout_secs: 30,
            rpc_timeout_secs: 30,
            rpc_retries: 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub private_keys: String,
    pub proxies: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            private_keys: "privatekey.txt".to_string(),
            proxies: "proxy.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GasGateConfig {
    /// Minimum SUI needed before any transaction is attempted
    pub min_balance: f64,
    pub max_attempts: u32,
    pub settle_delay_secs: u64,
    pub backoff: DelayRange,
}

impl Default for GasGateConfig {
    fn default() -> Self {
        Self {
            min_balance: 1.0,
            max_attempts: 50,
            settle_delay_secs: 3,
            backoff: DelayRange::new(3, 10),
        }
    }
}

impl GasGateConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    pub rate_limit_cooldown_secs: u64,
    pub decimals: u32,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            rate_limit_cooldown_secs: 30,
            decimals: 9,
        }
    }
}

impl BalanceConfig {
    pub fn rate_limit_cooldown(&self) -> Duration {
        Duration::from_secs(self.rate_limit_cooldown_secs)
    }
}

/// One faucet mint entry point.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClaimTarget {
    pub token: TokenKind,
    pub package: String,
    pub module: String,
    #[serde(default = "default_mint_function")]
    pub function: String,
    /// Shared treasury object passed as the first argument
    pub shared_object: String,
    /// Raw amount argument, in base units
    pub amount: u64,
    /// Independent attempts per account per day
    #[serde(default = "default_claim_count")]
    pub count: u32,
}

fn default_mint_function() -> String {
    "mint".to_string()
}

fn default_claim_count() -> u32 {
    3
}

const FAUCET_PACKAGE: &str = "0xa03cb0b29e92c6fa9bfb7b9c57ffdba5e23810f20885b4390f724553d32efb8b";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClaimsConfig {
    pub gas_budget: u64,
    /// Wait after a successful claim before the next one
    pub cooldown: DelayRange,
    pub targets: Vec<ClaimTarget>,
}

impl Default for ClaimsConfig {
    fn default() -> Self {
        Self {
            gas_budget: 200_000_000,
            cooldown: DelayRange::new(10, 15),
            targets: vec![
                ClaimTarget {
                    token: TokenKind::Xaum,
                    package: FAUCET_PACKAGE.to_string(),
                    module: "coin_xaum".to_string(),
                    function: default_mint_function(),
                    shared_object:
                        "0x66984752afbd878aaee450c70142747bb31fca2bb63f0a083d75c361da39adb1"
                            .to_string(),
                    amount: 1_000_000_000,
                    count: default_claim_count(),
                },
                ClaimTarget {
                    token: TokenKind::Usdc,
                    package: FAUCET_PACKAGE.to_string(),
                    module: "usdc".to_string(),
                    function: default_mint_function(),
                    shared_object:
                        "0x77153159c4e3933658293a46187c30ef68a8f98aa48b0ce76ffb0e6d20c0776b"
                            .to_string(),
                    amount: 10_000_000_000,
                    count: default_claim_count(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Cadence, measured from one day's start to the next
    pub period_hours: u64,
    /// Gap between two accounts of the same day
    pub account_gap: DelayRange,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            period_hours: 24,
            account_gap: DelayRange::new(30, 60),
        }
    }
}

impl ScheduleConfig {
    /// Clamped to [`MAX_PERIOD_HOURS`].
    pub fn period(&self) -> chrono::Duration {
        chrono::Duration::hours(self.period_hours.min(MAX_PERIOD_HOURS) as i64)
    }
}

/// Static unit prices in USD. Placeholders, not oracle data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PriceTable {
    pub gr: f64,
    pub sui: f64,
    pub usdc: f64,
    pub gusd: f64,
    pub xaum: f64,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            gr: 150.5,
            sui: 3.18,
            usdc: 1.0,
            gusd: 1.05,
            xaum: 0.0,
        }
    }
}

impl PriceTable {
    pub fn price(&self, token: TokenKind) -> f64 {
        match token {
            TokenKind::Gr => self.gr,
            TokenKind::Sui => self.sui,
            TokenKind::Usdc => self.usdc,
            TokenKind::Gusd => self.gusd,
            TokenKind::Xaum => self.xaum,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Compute a health snapshot from the closing balances of each account
    pub report: bool,
    pub collateral: Vec<TokenKind>,
    pub borrow: TokenKind,
    pub prices: PriceTable,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            report: true,
            collateral: vec![TokenKind::Gr, TokenKind::Usdc],
            borrow: TokenKind::Gusd,
            prices: PriceTable::default(),
        }
    }
}

impl CreekConfig {
    /// Loads a TOML file; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            Self::from_toml(&content)?
        } else {
            info!("{} not found, using built-in defaults", path.display());
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config TOML")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gas_gate.backoff.validate("gas_gate.backoff")?;
        self.claims.cooldown.validate("claims.cooldown")?;
        self.schedule.account_gap.validate("schedule.account_gap")?;

        if self.gas_gate.max_attempts == 0 {
            return Err(invalid("gas_gate.max_attempts", "must be at least 1"));
        }
        if !(self.gas_gate.min_balance > 0.0) {
            return Err(invalid("gas_gate.min_balance", "must be positive"));
        }
        if self.schedule.period_hours == 0 {
            return Err(invalid("schedule.period_hours", "must be at least 1"));
        }
        if self.schedule.period_hours > MAX_PERIOD_HOURS {
            return Err(invalid(
                "schedule.period_hours",
                &format!("must be at most {}", MAX_PERIOD_HOURS),
            ));
        }
        if self.network.rpc_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "network.rpc_url".to_string(),
            });
        }
        if self.network.faucet_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "network.faucet_url".to_string(),
            });
        }
        if let Some(target) = self.claims.targets.iter().find(|t| t.token.is_native()) {
            return Err(invalid(
                "claims.targets",
                &format!("{} is funded by the gas faucet, not a mint call", target.token),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_setup() {
        let config = CreekConfig::default();
        assert_eq!(config.gas_gate.min_balance, 1.0);
        assert_eq!(config.gas_gate.max_attempts, 50);
        assert_eq!(config.claims.gas_budget, 200_000_000);
        assert_eq!(config.claims.targets.len(), 2);
        assert_eq!(config.claims.targets[0].token, TokenKind::Xaum);
        assert_eq!(config.schedule.period_hours, 24);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CreekConfig::from_toml(
            r#"
            [gas_gate]
            min_balance = 2.5

            [schedule]
            account_gap = { min_secs = 1, max_secs = 2 }

            [[claims.targets]]
            token = "USDC"
            package = "0xabc"
            module = "usdc"
            shared_object = "0xdef"
            amount = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.gas_gate.min_balance, 2.5);
        assert_eq!(config.gas_gate.max_attempts, 50);
        assert_eq!(config.schedule.account_gap, DelayRange::new(1, 2));
        assert_eq!(config.claims.targets.len(), 1);
        assert_eq!(config.claims.targets[0].function, "mint");
        assert_eq!(config.claims.targets[0].count, 3);
        assert_eq!(config.network.faucet_timeout_secs, 30);
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let shipped = CreekConfig::from_toml(include_str!("../config/config.toml")).unwrap();
        let defaults = CreekConfig::default();
        assert!(shipped.validate().is_ok());
        assert_eq!(shipped.claims.targets, defaults.claims.targets);
        assert_eq!(shipped.health.prices, defaults.health.prices);
        assert_eq!(shipped.tokens, defaults.tokens);
        assert_eq!(shipped.schedule.account_gap, defaults.schedule.account_gap);
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let mut config = CreekConfig::default();
        config.claims.cooldown = DelayRange::new(15, 10);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_period() {
        let config = CreekConfig::from_toml("[schedule]\nperiod_hours = 100000000000000").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field.as_str() == "schedule.period_hours"
        ));
        assert_eq!(config.schedule.period(), chrono::Duration::hours(24 * 366));
    }

    #[test]
    fn test_validate_rejects_native_claim_target() {
        let mut config = CreekConfig::default();
        config.claims.targets[0].token = TokenKind::Sui;
        assert!(config.validate().is_err());
    }
}
