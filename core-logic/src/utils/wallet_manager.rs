use crate::error::ConfigError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// A raw secret key line, wiped from memory on drop.
#[derive(Clone)]
pub struct RawSecret {
    /// 1-based line position among the accepted secrets
    pub index: usize,
    secret: Zeroizing<String>,
}

impl RawSecret {
    pub fn new(index: usize, secret: impl Into<String>) -> Self {
        Self {
            index,
            secret: Zeroizing::new(secret.into()),
        }
    }

    pub fn expose(&self) -> &str {
        self.secret.as_str()
    }
}

impl fmt::Debug for RawSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawSecret")
            .field("index", &self.index)
            .field("secret", &"***REDACTED***")
            .finish()
    }
}

/// Reads the plain-text credential file, one secret per line.
#[derive(Debug, Clone)]
pub struct WalletManager {
    path: PathBuf,
}

impl WalletManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads secrets in file order. Blank and `#` lines are skipped.
    ///
    /// The file is re-read on every call so edits take effect at the next run.
    pub fn load_secrets(&self) -> Result<Vec<RawSecret>, ConfigError> {
        let display = self.path.display().to_string();
        if !self.path.exists() {
            return Err(ConfigError::FileNotFound { path: display });
        }

        let content = Zeroizing::new(fs::read_to_string(&self.path).map_err(|e| {
            ConfigError::IoError {
                path: display.clone(),
                msg: e.to_string(),
            }
        })?);

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .enumerate()
            .map(|(i, line)| RawSecret::new(i + 1, line))
            .collect())
    }
}
