//! Balance reads. Failures never propagate: an unreadable balance counts as zero.

use crate::chain::{ChainClient, ChainError};
use crate::outcome::TokenBalanceSnapshot;
use crate::pacing::Pacer;
use crate::tokens::{TokenKind, TokenTypes};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, warn};

pub struct BalanceReader {
    chain: Arc<dyn ChainClient>,
    pacer: Pacer,
    tokens: TokenTypes,
    rate_limit_cooldown: Duration,
    unit: f64,
}

impl BalanceReader {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        pacer: Pacer,
        tokens: TokenTypes,
        rate_limit_cooldown: Duration,
        decimals: u32,
    ) -> Self {
        Self {
            chain,
            pacer,
            tokens,
            rate_limit_cooldown,
            unit: 10f64.powi(decimals as i32),
        }
    }

    /// Decimal balance of `token` held by `address`.
    ///
    /// A rate-limited read is retried once after the cooldown; any remaining
    /// failure is logged and reported as `0.0`.
    pub async fn get_balance(&self, address: &str, token: TokenKind) -> f64 {
        match self.read_raw(address, token).await {
            Ok(raw) => raw as f64 / self.unit,
            Err(e) => {
                error!("Error getting {} balance for {}: {}", token, address, e);
                0.0
            }
        }
    }

    /// Balances of every tracked token, in report order.
    pub async fn snapshot(&self, address: &str) -> TokenBalanceSnapshot {
        let mut snapshot = TokenBalanceSnapshot::default();
        for token in TokenKind::TRACKED {
            let amount = self.get_balance(address, token).await;
            snapshot.insert(token, amount);
        }
        snapshot
    }

    async fn read_raw(&self, address: &str, token: TokenKind) -> Result<u128, ChainError> {
        let coin_type = self.tokens.type_tag(token);

        let coins = match self.chain.read_owned_coins(address, coin_type).await {
            Err(e) if e.is_rate_limited() => {
                warn!("⚠️ Rate limited reading {} balance", token);
                self.pacer
                    .fixed(self.rate_limit_cooldown, "Rate limit cooldown:")
                    .await;
                self.chain.read_owned_coins(address, coin_type).await?
            }
            other => other?,
        };

        Ok(coins.iter().map(|c| c.balance as u128).sum())
    }
}
