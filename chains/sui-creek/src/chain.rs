//! Chain boundary: coin reads and Move call submission.

use crate::signer::TransactionSigner;
use async_trait::async_trait;
use core_logic::NetworkError;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("Transaction {digest} failed: {reason}")]
    Execution { digest: String, reason: String },

    #[error("Signing failed: {0}")]
    Signing(String),
}

impl ChainError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ChainError::Network(e) if e.is_rate_limited())
    }
}

/// One owned coin object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coin {
    pub object_id: String,
    /// Balance in base units
    pub balance: u64,
}

/// A single Move entry-point invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveCall {
    pub package: String,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    /// Pure values and object ids in JSON-RPC form
    pub arguments: Vec<Value>,
}

impl MoveCall {
    /// `package::module::function`
    pub fn target(&self) -> String {
        format!("{}::{}::{}", self.package, self.module, self.function)
    }
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// All coin objects of `coin_type` owned by `owner`.
    async fn read_owned_coins(&self, owner: &str, coin_type: &str)
        -> Result<Vec<Coin>, ChainError>;

    /// Signs and executes `call`, returning the transaction digest.
    async fn submit_call(
        &self,
        signer: &dyn TransactionSigner,
        call: &MoveCall,
        gas_budget: u64,
    ) -> Result<String, ChainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_detection() {
        let limited = ChainError::from(NetworkError::RateLimited {
            endpoint: "rpc".to_string(),
        });
        assert!(limited.is_rate_limited());

        let failed = ChainError::Execution {
            digest: "abc".to_string(),
            reason: "MoveAbort".to_string(),
        };
        assert!(!failed.is_rate_limited());
    }

    #[test]
    fn test_call_target() {
        let call = MoveCall {
            package: "0x1".to_string(),
            module: "usdc".to_string(),
            function: "mint".to_string(),
            type_arguments: vec![],
            arguments: vec![],
        };
        assert_eq!(call.target(), "0x1::usdc::mint");
    }
}
