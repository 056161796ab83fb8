use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl fmt::Display for ProxyConfig {
    /// Credentials are never printed, only the endpoint.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.username {
            Some(user) => write!(f, "{} (user: {})", self.url, user),
            None => write!(f, "{}", self.url),
        }
    }
}

/// Inclusive range of whole seconds used for randomized waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_secs: u64,
    pub max_secs: u64,
}

impl DelayRange {
    pub const fn new(min_secs: u64, max_secs: u64) -> Self {
        Self { min_secs, max_secs }
    }

    pub fn validate(&self, field: &str) -> Result<(), ConfigError> {
        if self.min_secs > self.max_secs {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                reason: format!(
                    "min_secs ({}) is greater than max_secs ({})",
                    self.min_secs, self.max_secs
                ),
            });
        }
        Ok(())
    }
}

impl fmt::Display for DelayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}s", self.min_secs, self.max_secs)
    }
}
