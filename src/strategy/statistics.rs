//! Strategy that sticks to the server with the best probe success ratio.

use std::sync::Arc;
use std::time::Duration;

use crate::config::StrategyConfig;
use crate::roster::{CandidateServer, RosterProvider};
use crate::statistics::StatisticsLoader;
use crate::strategy::cycle::{CycleOutcome, ReloadCycle};
use crate::strategy::scheduler::{RefreshScheduler, ReloadTrigger};
use crate::strategy::state::{SelectionSnapshot, StrategyState};
use crate::strategy::{CallerContext, Strategy};

/// Chooses by offline availability statistics and caches the choice for
/// one refresh interval.
#[derive(Debug, Clone)]
pub struct StatisticsStrategy {
    cycle: Arc<ReloadCycle>,
    trigger: ReloadTrigger,
}

impl StatisticsStrategy {
    pub const ID: &'static str = "com.shadowsocks.strategy.scbs";
    pub const NAME: &'static str = "Simply Choose By Statistics";

    /// Build the strategy and the scheduler that keeps it fresh.
    ///
    /// Nothing is selected until the scheduler is spawned or
    /// [`reload_now`](Self::reload_now) is awaited.
    pub fn new(
        loader: StatisticsLoader,
        roster: Arc<dyn RosterProvider>,
        interval: Duration,
    ) -> (Self, RefreshScheduler) {
        let state = Arc::new(StrategyState::new());
        let cycle = Arc::new(ReloadCycle::new(loader, roster, state));
        let trigger = ReloadTrigger::new();

        let scheduler = RefreshScheduler::new(cycle.clone(), interval, trigger.clone());
        (Self { cycle, trigger }, scheduler)
    }

    pub fn from_config(
        config: &StrategyConfig,
        roster: Arc<dyn RosterProvider>,
    ) -> (Self, RefreshScheduler) {
        Self::new(
            StatisticsLoader::from_config(&config.statistics),
            roster,
            Duration::from_secs(config.refresh.interval_secs),
        )
    }

    /// Cached selection; never waits for a reload.
    pub fn current_server(&self) -> Option<Arc<CandidateServer>> {
        self.cycle.state().current_server()
    }

    pub fn snapshot(&self) -> Arc<SelectionSnapshot> {
        self.cycle.state().snapshot()
    }

    /// Ask the scheduler for a reload and reset its countdown.
    pub fn request_reload(&self) {
        self.trigger.request();
    }

    /// Run a reload cycle on the caller's task and wait for it.
    pub async fn reload_now(&self) -> CycleOutcome {
        self.cycle.run().await
    }
}

impl Strategy for StatisticsStrategy {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn get_server(&self, ctx: &CallerContext) -> Option<Arc<CandidateServer>> {
        let server = self.current_server();
        match &server {
            Some(s) => tracing::trace!(caller = ?ctx.caller, server = %s, "Serving server by statistics"),
            None => tracing::debug!(caller = ?ctx.caller, "No server selected by statistics yet"),
        }
        server
    }

    fn reload_servers(&self) {
        tracing::debug!("Roster changed, requesting reload");
        self.request_reload();
    }

    fn report_failure(&self, server: &CandidateServer) {
        tracing::debug!(server = %server, "Failure reported");
    }

    // TODO: fold live read/write/latency signal into the score next to the probe log.
    fn report_read(&self, server: &CandidateServer) {
        tracing::trace!(server = %server, "Read reported");
    }

    fn report_write(&self, server: &CandidateServer) {
        tracing::trace!(server = %server, "Write reported");
    }

    fn report_latency(&self, server: &CandidateServer, latency: Duration) {
        tracing::trace!(server = %server, latency_ms = latency.as_millis() as u64, "Latency reported");
    }
}
