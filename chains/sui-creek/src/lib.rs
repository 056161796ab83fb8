//! Sui Creek - Daily multi-account faucet runner for the Sui testnet
//!
//! Turns a file of private keys into a once-a-day run per account: fund gas
//! from the HTTP faucet, mint faucet tokens on chain, snapshot balances and
//! report a health factor. Accounts are processed one at a time with
//! randomized gaps so shared faucets and RPC providers are not burst.
//!
//! # Architecture
//!
//! - **[`BalanceReader`]**: coin balance reads, rate-limit aware, never fatal
//! - **[`FaucetClient`]**: HTTP gas faucet plus on-chain token mints
//! - **[`HealthFactorCalculator`]**: collateral / borrow ratio from static prices
//! - **[`WalletPipeline`]**: ordered per-account procedure producing an
//!   [`AccountRunResult`]
//! - **[`RunScheduler`]**: day loop anchored to each day's start time
//!
//! The chain boundary is the [`ChainClient`] trait ([`SuiRpcClient`] over
//! JSON-RPC) and signing sits behind [`TransactionSigner`] ([`SuiKeypair`]).
//! Every wait goes through a [`Pacer`] built on injectable clock and jitter
//! policies, so the whole loop runs under test without real sleeps.
//!
//! # Quick Start
//!
//! ```bash
//! # privatekey.txt: one suiprivkey / base64 / hex secret per line
//! # proxy.txt: optional, line N is the proxy for key N
//! cargo run -p sui-creek
//! ```
//!
//! # Configuration
//!
//! Loaded from `config/config.toml` (override with `CREEK_CONFIG`). Every
//! field has a default; see the [`config`] module.

pub mod account;
pub mod balance;
pub mod chain;
pub mod config;
pub mod faucet;
pub mod health;
pub mod outcome;
pub mod pacing;
pub mod pipeline;
pub mod report;
pub mod rpc;
pub mod scheduler;
pub mod signer;
pub mod tokens;

pub use account::{Account, AccountSource, FileAccountSource, ImportError};
pub use balance::BalanceReader;
pub use chain::{ChainClient, ChainError, Coin, MoveCall};
pub use config::CreekConfig;
pub use faucet::{
    FaucetClient, FaucetHttpResponse, FaucetPolicy, FaucetReply, FaucetTransport, GasGateReport,
    HttpFaucetTransport,
};
pub use health::{HealthFactorCalculator, HealthFactorSnapshot, Ratio, RiskTier};
pub use outcome::{
    AccountRunResult, DayRunStats, FaucetDiagnostics, OperationKind, OperationOutcome,
    TokenBalanceSnapshot,
};
pub use pacing::Pacer;
pub use pipeline::{PipelineSettings, PipelineStep, WalletPipeline};
pub use rpc::SuiRpcClient;
pub use scheduler::{DayOutcome, RunScheduler, ScheduleSettings, SchedulerState, TerminationReason};
pub use signer::{SuiKeypair, TransactionSigner};
pub use tokens::{TokenKind, TokenTypes};
