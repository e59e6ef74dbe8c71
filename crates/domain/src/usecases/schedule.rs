//! Scheduling use case - single-run and continuous execution of posting cycles

use std::future::Future;
use tokio::time::{Duration, Instant, sleep};

use crate::{
    model::CycleOutcome,
    usecases::cycle::{CycleError, CycleRunner},
};

/// Configuration for continuous mode
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Time between cycle starts
    pub period: Duration,
    /// How often the timer is checked
    pub poll_interval: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(2 * 60 * 60),
            poll_interval: Duration::from_secs(60),
        }
    }
}

/// Fires once per period, measured from the end of the previous run
#[derive(Debug, Clone)]
pub struct PeriodicTimer {
    period: Duration,
    last_fired: Option<Instant>,
}

impl PeriodicTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_fired: None,
        }
    }

    /// Whether a run is pending at `now`
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_fired {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.period,
        }
    }

    pub fn mark_fired(&mut self, at: Instant) {
        self.last_fired = Some(at);
    }

    /// When the next run becomes due; `None` before the first run or when the
    /// deadline is past what `Instant` can represent
    pub fn next_due(&self) -> Option<Instant> {
        self.last_fired.and_then(|last| last.checked_add(self.period))
    }
}

/// Drives a [`CycleRunner`] in single-run or continuous mode
pub struct Scheduler {
    config: ScheduleConfig,
}

impl Scheduler {
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config }
    }

    /// Run exactly one cycle and hand its result back to the caller
    pub async fn run_single<R: CycleRunner + ?Sized>(
        &self,
        runner: &R,
    ) -> Result<CycleOutcome, CycleError> {
        tracing::info!("Running single posting cycle");
        runner.run_cycle().await
    }

    /// Run one cycle immediately, then again each period until `shutdown` resolves.
    ///
    /// Failed cycles are logged and never stop the loop. Returns the number of
    /// cycles started.
    pub async fn run_continuous<R, S>(&self, runner: &R, shutdown: S) -> u64
    where
        R: CycleRunner + ?Sized,
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut timer = PeriodicTimer::new(self.config.period);
        let mut started = 0u64;

        tracing::info!(
            period_secs = self.config.period.as_secs(),
            poll_interval_secs = self.config.poll_interval.as_secs(),
            "Starting continuous posting"
        );

        loop {
            if timer.is_due(Instant::now()) {
                started += 1;
                tokio::select! {
                    result = runner.run_cycle() => log_cycle_result(started, result),
                    _ = &mut shutdown => {
                        tracing::info!("Shutdown requested during cycle");
                        break;
                    }
                }
                timer.mark_fired(Instant::now());
                if let Some(next) = timer.next_due() {
                    let wait = next.saturating_duration_since(Instant::now());
                    tracing::info!(next_in_secs = wait.as_secs(), "Next cycle scheduled");
                }
            }

            tokio::select! {
                _ = sleep(self.config.poll_interval) => {}
                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received");
                    break;
                }
            }
        }

        started
    }
}

fn log_cycle_result(cycle: u64, result: Result<CycleOutcome, CycleError>) {
    match result {
        Ok(CycleOutcome::Posted {
            receipt, source, ..
        }) => {
            tracing::info!(cycle = cycle, post_id = %receipt.id, source = %source, "Cycle complete");
        }
        Ok(CycleOutcome::Skipped { reason }) => {
            tracing::info!(cycle = cycle, reason = %reason, "Cycle skipped");
        }
        Err(e) => {
            tracing::error!(cycle = cycle, error = %e, "Cycle failed, will retry next period");
        }
    }
}
