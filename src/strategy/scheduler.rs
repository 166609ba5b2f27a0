//! Periodic and on-demand refresh driving.
//!
//! # Responsibilities
//! - Run a reload cycle at start-up and then once per interval
//! - Run a reload cycle when explicitly requested, restarting the countdown
//! - Stop on the shutdown signal
//!
//! # Design Decisions
//! - A single task owns the timer, so two cycles never overlap from here;
//!   `ReloadCycle` additionally serializes direct callers
//! - Requests that arrive while a cycle is running collapse into one
//!   follow-up cycle (a `Notify` holds at most one permit)
//! - A cycle that has started always finishes before shutdown is observed
//! - Intervals longer than `MAX_SLEEP` wait `MAX_SLEEP`; the deadline
//!   arithmetic never overflows

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Notify};
use tokio::time::{self, Instant};

use crate::strategy::cycle::ReloadCycle;

/// Longest single wait between periodic cycles (30 years).
pub const MAX_SLEEP: Duration = Duration::from_secs(86_400 * 365 * 30);

fn deadline_after(interval: Duration) -> Instant {
    Instant::now() + interval.min(MAX_SLEEP)
}

/// Cloneable handle for requesting an on-demand reload.
#[derive(Debug, Clone, Default)]
pub struct ReloadTrigger {
    notify: Arc<Notify>,
}

impl ReloadTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire-and-forget reload request.
    pub fn request(&self) {
        self.notify.notify_one();
    }
}

/// Background driver for reload cycles.
#[derive(Debug)]
pub struct RefreshScheduler {
    cycle: Arc<ReloadCycle>,
    interval: Duration,
    trigger: ReloadTrigger,
}

impl RefreshScheduler {
    pub fn new(cycle: Arc<ReloadCycle>, interval: Duration, trigger: ReloadTrigger) -> Self {
        Self {
            cycle,
            interval,
            trigger,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Drive cycles until `shutdown` fires (or its sender is dropped).
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Refresh scheduler starting"
        );
        if self.interval > MAX_SLEEP {
            tracing::warn!(
                interval_secs = self.interval.as_secs(),
                max_secs = MAX_SLEEP.as_secs(),
                "Refresh interval too long, periodic cycles capped"
            );
        }

        // first cycle immediately
        let sleep = time::sleep_until(Instant::now());
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                biased;

                _ = shutdown.recv() => {
                    tracing::info!("Refresh scheduler received shutdown signal, exiting loop");
                    break;
                }
                _ = self.trigger.notify.notified() => {
                    tracing::debug!("On-demand refresh requested");
                }
                _ = &mut sleep => {
                    tracing::debug!("Periodic refresh due");
                }
            }

            let outcome = self.cycle.run().await;
            tracing::trace!(?outcome, "Refresh cycle finished");

            sleep.as_mut().reset(deadline_after(self.interval));
        }
    }
}
