//! # Core Logic - Shared Utilities for Testnet Automation
//!
//! This crate provides chain-agnostic building blocks used by the chain
//! crates: typed errors, credential and proxy loading, logging, retry and
//! timing abstractions.
//!
//! ## Modules
//!
//! - [`config`] - Shared configuration types (proxies, delay windows)
//! - [`error`] - Typed error handling with thiserror
//! - [`traits`] - Clock and jitter seams
//! - [`utils`] - Logger, wallet/proxy files, retry, shutdown

pub mod config;
pub mod error;
pub mod traits;
pub(crate) mod utils;

pub use config::{DelayRange, ProxyConfig};
pub use error::{ConfigError, NetworkError, WalletError};
pub use traits::{Clock, JitterPolicy};

pub use utils::{
    setup_logger, shutdown_token, MinimumJitter, ProxyManager, ProxyMap, RandomJitter, RawSecret,
    SystemClock, WalletManager, REPORT_TARGET,
};

pub use utils::{with_retry, RetryConfig};
