//! Tracked tokens and their on-chain type tags.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const SUI_TYPE: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000002::sui::SUI";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenKind {
    /// Collateral token of the lending market
    Gr,
    /// Native gas token
    Sui,
    /// Faucet stable token
    Usdc,
    /// Borrowable stable token
    Gusd,
    /// Gold-proxy faucet token
    Xaum,
}

impl TokenKind {
    /// Order used for snapshots and report tables.
    pub const TRACKED: [TokenKind; 5] = [
        TokenKind::Gr,
        TokenKind::Sui,
        TokenKind::Usdc,
        TokenKind::Gusd,
        TokenKind::Xaum,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            TokenKind::Gr => "GR",
            TokenKind::Sui => "SUI",
            TokenKind::Usdc => "USDC",
            TokenKind::Gusd => "GUSD",
            TokenKind::Xaum => "XAUM",
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, TokenKind::Sui)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Fully qualified Move coin types per token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenTypes {
    pub sui: String,
    pub gr: String,
    pub usdc: String,
    pub gusd: String,
    pub xaum: String,
}

impl Default for TokenTypes {
    fn default() -> Self {
        Self {
            sui: SUI_TYPE.to_string(),
            gr: "0x5504354cf3dcbaf64201989bc734e97c1d89bba5c7f01ff2704c43192cc2717c::coin_gr::COIN_GR"
                .to_string(),
            usdc: "0xa03cb0b29e92c6fa9bfb7b9c57ffdba5e23810f20885b4390f724553d32efb8b::usdc::USDC"
                .to_string(),
            gusd: "0x5434351f2dcae30c0c4b97420475c5edc966b02fd7d0bbe19ea2220d2f623586::coin_gusd::COIN_GUSD"
                .to_string(),
            xaum: "0xa03cb0b29e92c6fa9bfb7b9c57ffdba5e23810f20885b4390f724553d32efb8b::coin_xaum::COIN_XAUM"
                .to_string(),
        }
    }
}

impl TokenTypes {
    pub fn type_tag(&self, token: TokenKind) -> &str {
        match token {
            TokenKind::Sui => &self.sui,
            TokenKind::Gr => &self.gr,
            TokenKind::Usdc => &self.usdc,
            TokenKind::Gusd => &self.gusd,
            TokenKind::Xaum => &self.xaum,
        }
    }
}
