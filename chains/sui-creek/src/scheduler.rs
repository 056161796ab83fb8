//! Daily run loop.
//!
//! `Idle -> RunningDay -> Sleeping -> RunningDay -> ...` until the account
//! source runs dry or the cancellation token fires. The next day is anchored
//! to the previous day's start, so long runs shorten the sleep instead of
//! shifting the schedule.

use crate::account::AccountSource;
use crate::outcome::DayRunStats;
use crate::pacing::Pacer;
use crate::pipeline::WalletPipeline;
use crate::report;
use chrono::{DateTime, Utc};
use core_logic::{ConfigError, DelayRange, REPORT_TARGET};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerState {
    Idle,
    RunningDay { day: u32 },
    Sleeping { day: u32, until: DateTime<Utc> },
    Terminated(TerminationReason),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TerminationReason {
    /// Credential file missing or empty
    NoCredentials,
    CredentialLoadFailed(ConfigError),
    /// Stopped by the cancellation token; the in-flight day is discarded
    Interrupted,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::NoCredentials => write!(f, "no private keys found"),
            TerminationReason::CredentialLoadFailed(e) => write!(f, "{}", e),
            TerminationReason::Interrupted => write!(f, "interrupted"),
        }
    }
}

/// Result of a single day.
#[derive(Debug, Clone, PartialEq)]
pub enum DayOutcome {
    Completed(DayRunStats),
    NoAccounts,
    LoadFailed(ConfigError),
}

#[derive(Debug, Clone, Copy)]
pub struct ScheduleSettings {
    pub period: chrono::Duration,
    pub account_gap: DelayRange,
}

pub struct RunScheduler {
    source: Arc<dyn AccountSource>,
    pipeline: WalletPipeline,
    pacer: Pacer,
    settings: ScheduleSettings,
    state: SchedulerState,
    days_completed: u32,
}

impl RunScheduler {
    pub fn new(
        source: Arc<dyn AccountSource>,
        pipeline: WalletPipeline,
        pacer: Pacer,
        settings: ScheduleSettings,
    ) -> Self {
        Self {
            source,
            pipeline,
            pacer,
            settings,
            state: SchedulerState::Idle,
            days_completed: 0,
        }
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn days_completed(&self) -> u32 {
        self.days_completed
    }

    fn transition(&mut self, next: SchedulerState) {
        debug!("Scheduler {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn terminate(&mut self, reason: TerminationReason) -> TerminationReason {
        self.transition(SchedulerState::Terminated(reason.clone()));
        reason
    }

    /// Runs days until termination.
    pub async fn run(&mut self, cancel: CancellationToken) -> TerminationReason {
        let mut day = 1;

        loop {
            self.transition(SchedulerState::RunningDay { day });

            let outcome = tokio::select! {
                _ = cancel.cancelled() => None,
                outcome = self.run_day(day) => Some(outcome),
            };

            let stats = match outcome {
                None => {
                    warn!("⏹️ Stopped during day #{}, partial statistics discarded", day);
                    return self.terminate(TerminationReason::Interrupted);
                }
                Some(DayOutcome::NoAccounts) => {
                    error!("❌ No private keys found!");
                    return self.terminate(TerminationReason::NoCredentials);
                }
                Some(DayOutcome::LoadFailed(e)) => {
                    error!("❌ Failed to load private keys: {}", e);
                    return self.terminate(TerminationReason::CredentialLoadFailed(e));
                }
                Some(DayOutcome::Completed(stats)) => stats,
            };

            info!(
                target: REPORT_TARGET,
                "{}",
                report::day_summary(&stats, self.pipeline.claim_targets())
            );
            self.days_completed += 1;

            let next_run = stats.started_at + self.settings.period;
            let wait = next_run - self.pacer.clock().now();
            info!(
                target: REPORT_TARGET,
                "{}",
                report::next_run_banner(stats.started_at, next_run, wait)
            );

            self.transition(SchedulerState::Sleeping {
                day,
                until: next_run,
            });

            // Negative waits (overrun days) start the next day immediately.
            let wait = wait.to_std().unwrap_or(Duration::ZERO);
            let label = format!("Waiting until {}:", next_run.format("%Y-%m-%d %H:%M:%S"));
            let interrupted = tokio::select! {
                _ = cancel.cancelled() => true,
                _ = self.pacer.fixed(wait, &label) => false,
            };
            if interrupted {
                warn!("⏹️ Stopped while sleeping after day #{}", day);
                return self.terminate(TerminationReason::Interrupted);
            }

            day += 1;
        }
    }

    /// Loads the day's accounts and processes them in order.
    pub async fn run_day(&self, day: u32) -> DayOutcome {
        let started_at = self.pacer.clock().now();
        info!(target: REPORT_TARGET, "{}", report::day_header(day, started_at));

        let entries = match self.source.load() {
            Ok(entries) if entries.is_empty() => return DayOutcome::NoAccounts,
            Ok(entries) => entries,
            Err(ConfigError::FileNotFound { path }) => {
                error!("❌ File {} not found!", path);
                return DayOutcome::NoAccounts;
            }
            Err(ConfigError::NoCredentials { .. }) => return DayOutcome::NoAccounts,
            Err(e) => return DayOutcome::LoadFailed(e),
        };

        let total = entries.len();
        let mut stats = DayRunStats::new(day, started_at, total);
        info!("🔄 Processing {} wallets...", total);

        for (position, entry) in entries.iter().enumerate() {
            let account = match entry {
                Ok(account) => account,
                Err(e) => {
                    error!("❌ {}", e);
                    stats.record_import_failure();
                    continue;
                }
            };

            info!(
                target: REPORT_TARGET,
                "{}",
                report::wallet_header(account.index, total, account.address(), account.proxy.as_ref())
            );
            let result = self.pipeline.process(account).await;
            stats.record(&result);

            if position + 1 < total {
                self.pacer
                    .jittered(self.settings.account_gap, "Next wallet:")
                    .await;
            }
        }

        DayOutcome::Completed(stats.finish(self.pacer.clock().now()))
    }
}
