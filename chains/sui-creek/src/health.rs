//! Collateral / borrow health factor from balances and static prices.
//!
//! Read-only: a snapshot never triggers a repay or deposit.

use crate::balance::BalanceReader;
use crate::config::{HealthConfig, PriceTable};
use crate::outcome::TokenBalanceSnapshot;
use crate::tokens::TokenKind;
use std::fmt;

const CRITICAL_BELOW: f64 = 1.5;
const WARNING_BELOW: f64 = 2.0;
const SAFE_BELOW: f64 = 10.0;

/// Collateral value over borrow value; `Infinite` when nothing is borrowed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ratio {
    Finite(f64),
    Infinite,
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Finite(r) => write!(f, "{:.2}", r),
            Ratio::Infinite => write!(f, "∞"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskTier {
    VerySafe,
    Safe,
    Warning,
    Critical,
}

impl RiskTier {
    pub fn from_ratio(ratio: Ratio) -> Self {
        match ratio {
            Ratio::Infinite => RiskTier::VerySafe,
            Ratio::Finite(r) if r < CRITICAL_BELOW => RiskTier::Critical,
            Ratio::Finite(r) if r < WARNING_BELOW => RiskTier::Warning,
            Ratio::Finite(r) if r < SAFE_BELOW => RiskTier::Safe,
            Ratio::Finite(_) => RiskTier::VerySafe,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::VerySafe => write!(f, "✅ VERY SAFE"),
            RiskTier::Safe => write!(f, "✅ SAFE"),
            RiskTier::Warning => write!(f, "⚠️ WARNING"),
            RiskTier::Critical => write!(f, "🚨 CRITICAL!"),
        }
    }
}

/// Amount and USD value of one token position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub token: TokenKind,
    pub amount: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthFactorSnapshot {
    pub collateral: Vec<Position>,
    pub borrow: Position,
    pub collateral_value: f64,
    pub borrow_value: f64,
    pub ratio: Ratio,
    pub risk_tier: RiskTier,
}

pub struct HealthFactorCalculator {
    collateral: Vec<TokenKind>,
    borrow: TokenKind,
    prices: PriceTable,
}

impl HealthFactorCalculator {
    pub fn new(collateral: Vec<TokenKind>, borrow: TokenKind, prices: PriceTable) -> Self {
        Self {
            collateral,
            borrow,
            prices,
        }
    }

    pub fn from_config(config: &HealthConfig) -> Self {
        Self::new(config.collateral.clone(), config.borrow, config.prices.clone())
    }

    /// Reads the collateral and borrow balances of `address` and rates them.
    pub async fn compute(&self, reader: &BalanceReader, address: &str) -> HealthFactorSnapshot {
        let mut balances = TokenBalanceSnapshot::default();
        for token in self.collateral.iter().copied().chain([self.borrow]) {
            balances.insert(token, reader.get_balance(address, token).await);
        }
        self.assess(&balances)
    }

    /// Rates balances that were already read.
    pub fn assess(&self, balances: &TokenBalanceSnapshot) -> HealthFactorSnapshot {
        let collateral: Vec<Position> = self
            .collateral
            .iter()
            .map(|&token| self.position(token, balances))
            .collect();
        let borrow = self.position(self.borrow, balances);

        let collateral_value: f64 = collateral.iter().map(|p| p.value).sum();
        let borrow_value = borrow.value;

        let ratio = if borrow_value > 0.0 {
            Ratio::Finite(collateral_value / borrow_value)
        } else {
            Ratio::Infinite
        };

        HealthFactorSnapshot {
            collateral,
            borrow,
            collateral_value,
            borrow_value,
            ratio,
            risk_tier: RiskTier::from_ratio(ratio),
        }
    }

    fn position(&self, token: TokenKind, balances: &TokenBalanceSnapshot) -> Position {
        let amount = balances.get(token);
        Position {
            token,
            amount,
            value: amount * self.prices.price(token),
        }
    }
}
