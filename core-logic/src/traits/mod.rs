use crate::config::DelayRange;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Source of wall-clock time and suspension.
///
/// Everything that waits goes through a `Clock` so schedulers can be driven
/// without real sleeps.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current wall-clock time
    fn now(&self) -> DateTime<Utc>;

    /// Suspend the caller for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Picks the concrete wait for a randomized delay window.
pub trait JitterPolicy: Send + Sync {
    fn pick(&self, range: DelayRange) -> Duration;
}
