//! Accounts built from raw credentials and the positional proxy map.

use crate::signer::{SuiKeypair, TransactionSigner};
use core_logic::{ConfigError, ProxyConfig, ProxyMap, WalletError, WalletManager};
use std::fmt;
use thiserror::Error;

/// One managed identity. Owns its signer exclusively.
pub struct Account {
    /// 1-based position in the credential file
    pub index: usize,
    pub signer: Box<dyn TransactionSigner>,
    pub proxy: Option<ProxyConfig>,
}

impl Account {
    pub fn new(
        index: usize,
        signer: Box<dyn TransactionSigner>,
        proxy: Option<ProxyConfig>,
    ) -> Self {
        Self {
            index,
            signer,
            proxy,
        }
    }

    pub fn address(&self) -> &str {
        self.signer.address()
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("index", &self.index)
            .field("address", &self.address())
            .field("proxy", &self.proxy.as_ref().map(|p| p.to_string()))
            .finish()
    }
}

/// A credential line that could not be turned into an account.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to import wallet #{index}: {source}")]
pub struct ImportError {
    pub index: usize,
    pub source: WalletError,
}

pub type AccountEntry = Result<Account, ImportError>;

/// Supplies the day's accounts in credential order.
pub trait AccountSource: Send + Sync {
    /// An empty list, [`ConfigError::NoCredentials`] and
    /// [`ConfigError::FileNotFound`] all mean there is nothing to run.
    fn load(&self) -> Result<Vec<AccountEntry>, ConfigError>;
}

/// Reads `privatekey.txt`-style files and pairs each key with its proxy slot.
pub struct FileAccountSource {
    wallets: WalletManager,
    proxies: ProxyMap,
}

impl FileAccountSource {
    pub fn new(wallets: WalletManager, proxies: ProxyMap) -> Self {
        Self { wallets, proxies }
    }
}

impl AccountSource for FileAccountSource {
    fn load(&self) -> Result<Vec<AccountEntry>, ConfigError> {
        let secrets = self.wallets.load_secrets()?;
        if secrets.is_empty() {
            return Err(ConfigError::NoCredentials {
                path: self.wallets.path().display().to_string(),
            });
        }

        Ok(secrets
            .iter()
            .map(|secret| {
                let keypair =
                    SuiKeypair::from_secret(secret.expose()).map_err(|source| ImportError {
                        index: secret.index,
                        source,
                    })?;
                Ok(Account::new(
                    secret.index,
                    Box::new(keypair),
                    self.proxies.for_wallet(secret.index).cloned(),
                ))
            })
            .collect())
    }
}
