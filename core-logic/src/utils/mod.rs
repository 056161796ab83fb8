//! # Utilities Module
//!
//! Internal utility modules for the core-logic crate.
//! These modules are marked as `pub(crate)` to enforce API boundaries.

pub(crate) mod logger;
pub(crate) mod proxy_manager;
pub(crate) mod retry;
pub(crate) mod shutdown;
pub(crate) mod timing;
pub(crate) mod wallet_manager;

// Selective exports - only public utilities
pub use logger::{setup_logger, REPORT_TARGET};
pub use proxy_manager::{ProxyManager, ProxyMap};
pub use retry::{with_retry, RetryConfig};
pub use shutdown::shutdown_token;
pub use timing::{MinimumJitter, RandomJitter, SystemClock};
pub use wallet_manager::{RawSecret, WalletManager};
