use crate::config::DelayRange;
use crate::traits::{Clock, JitterPolicy};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use std::time::Duration;

/// Real time backed by tokio timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Uniform whole-second pick from an inclusive range.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl JitterPolicy for RandomJitter {
    fn pick(&self, range: DelayRange) -> Duration {
        if range.min_secs >= range.max_secs {
            return Duration::from_secs(range.min_secs);
        }
        let secs = rand::thread_rng().gen_range(range.min_secs..=range.max_secs);
        Duration::from_secs(secs)
    }
}

/// Always waits the lower bound. Keeps runs deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimumJitter;

impl JitterPolicy for MinimumJitter {
    fn pick(&self, range: DelayRange) -> Duration {
        Duration::from_secs(range.min_secs)
    }
}
