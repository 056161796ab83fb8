//! # Core Error Types
//!
//! Centralized error definitions for the core-logic crate.
//! All errors implement `std::error::Error` and `std::fmt::Display`.

use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing required configuration field: '{field}'")]
    MissingField { field: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error reading {path}: {msg}")]
    IoError { path: String, msg: String },

    #[error("No credentials found in {path}")]
    NoCredentials { path: String },
}

/// Key parsing errors raised while turning a raw secret into an account
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WalletError {
    #[error("Invalid private key format: {reason}")]
    InvalidKeyFormat { reason: String },

    #[error("Private key has wrong length: expected 32 bytes, got {length}")]
    InvalidKeyLength { length: usize },

    #[error("Unsupported signature scheme flag: {flag:#04x}")]
    UnsupportedScheme { flag: u8 },
}

/// Network and RPC-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Request timeout after {timeout_ms}ms to {endpoint}")]
    Timeout { timeout_ms: u64, endpoint: String },

    #[error("Rate limited by {endpoint}")]
    RateLimited { endpoint: String },

    #[error("Connection failed to {endpoint}: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("HTTP error {status_code} from {endpoint}")]
    HttpError { status_code: u16, endpoint: String },

    #[error("RPC error {code} from {endpoint}: {message}")]
    Rpc {
        code: i64,
        message: String,
        endpoint: String,
    },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },
}

impl NetworkError {
    /// Upstream throttling, either HTTP 429 or a provider rate-limit code.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, NetworkError::RateLimited { .. })
    }

    /// Timeouts, dropped connections and 5xx responses.
    pub fn is_transient(&self) -> bool {
        match self {
            NetworkError::Timeout { .. } | NetworkError::Transport { .. } => true,
            NetworkError::HttpError { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}
