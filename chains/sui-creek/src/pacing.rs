//! Waits between network operations.

use core_logic::{Clock, DelayRange, JitterPolicy};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Clock plus jitter policy; every deliberate wait goes through here.
#[derive(Clone)]
pub struct Pacer {
    clock: Arc<dyn Clock>,
    jitter: Arc<dyn JitterPolicy>,
}

impl Pacer {
    pub fn new(clock: Arc<dyn Clock>, jitter: Arc<dyn JitterPolicy>) -> Self {
        Self { clock, jitter }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Waits a randomized duration picked from `range`.
    pub async fn jittered(&self, range: DelayRange, label: &str) -> Duration {
        let wait = self.jitter.pick(range);
        self.fixed(wait, label).await;
        wait
    }

    pub async fn fixed(&self, wait: Duration, label: &str) {
        if wait.is_zero() {
            return;
        }
        info!("⏳ {} {}s...", label, wait.as_secs());
        self.clock.sleep(wait).await;
    }
}
