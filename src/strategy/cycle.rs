//! One reload cycle: load → aggregate → select → publish.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use crate::error::SelectError;
use crate::observability::metrics;
use crate::roster::{CandidateServer, RosterProvider};
use crate::statistics::StatisticsLoader;
use crate::strategy::score::score;
use crate::strategy::selector::select;
use crate::strategy::state::StrategyState;

/// What a finished cycle did to the shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A server was selected. `changed` is false when it is the same one.
    Selected {
        server: Arc<CandidateServer>,
        changed: bool,
    },
    /// Nothing could be selected; the previous snapshot was kept whole.
    Retained(SelectError),
    /// The log could not be loaded; nothing was changed.
    LoadFailed,
}

impl CycleOutcome {
    fn label(&self) -> &'static str {
        match self {
            CycleOutcome::Selected { .. } => "selected",
            CycleOutcome::Retained(SelectError::EmptyCandidateSet) => "empty_roster",
            CycleOutcome::Retained(SelectError::NoUsableStatistics) => "no_statistics",
            CycleOutcome::LoadFailed => "load_failed",
        }
    }
}

/// Runs reload cycles against one loader, roster and state.
///
/// Cycles are single-flight: concurrent callers of `run` queue on an async
/// mutex and execute one after another, never interleaved.
pub struct ReloadCycle {
    loader: StatisticsLoader,
    roster: Arc<dyn RosterProvider>,
    state: Arc<StrategyState>,
    guard: Mutex<()>,
}

impl fmt::Debug for ReloadCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadCycle")
            .field("loader", &self.loader)
            .field("state", &self.state)
            .finish()
    }
}

impl ReloadCycle {
    pub fn new(
        loader: StatisticsLoader,
        roster: Arc<dyn RosterProvider>,
        state: Arc<StrategyState>,
    ) -> Self {
        Self {
            loader,
            roster,
            state,
            guard: Mutex::new(()),
        }
    }

    pub fn state(&self) -> &Arc<StrategyState> {
        &self.state
    }

    /// Run one cycle to completion.
    pub async fn run(&self) -> CycleOutcome {
        let _guard = self.guard.lock().await;
        let start = Instant::now();
        tracing::debug!("Reloading statistics and choosing a server");

        let outcome = self.run_locked().await;
        metrics::record_reload_cycle(outcome.label(), start);
        outcome
    }

    async fn run_locked(&self) -> CycleOutcome {
        let aggregates = match self.loader.load().await {
            Ok(map) => Arc::new(map),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load statistics, keeping previous data");
                return CycleOutcome::LoadFailed;
            }
        };
        metrics::record_servers_loaded(aggregates.len());

        // borrowed for this cycle only
        let roster = self.roster.servers();
        for server in &roster {
            let name = server.friendly_name();
            if let Some(s) = aggregates.get(&name).and_then(score) {
                metrics::record_server_score(&name, s.value());
            }
        }

        let previous = self.state.current_server();
        match select(&roster, &aggregates) {
            Ok(selection) => {
                let server = selection.server.clone();
                let changed = previous.as_ref() != Some(&server);
                match &previous {
                    None => tracing::info!(
                        server = %server,
                        score = %selection.score,
                        "Chosen best server"
                    ),
                    Some(old) if changed => tracing::info!(
                        from = %old,
                        to = %server,
                        score = %selection.score,
                        "Switched best server"
                    ),
                    Some(_) => tracing::debug!(
                        server = %server,
                        score = %selection.score,
                        "Kept best server"
                    ),
                }
                self.state.publish_selection(aggregates, selection);
                CycleOutcome::Selected { server, changed }
            }
            Err(e) => {
                tracing::info!(
                    reason = %e,
                    current = ?previous.as_deref().map(CandidateServer::friendly_name),
                    "Keeping previous server selection"
                );
                CycleOutcome::Retained(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MalformedRowPolicy;
    use crate::roster::SharedRoster;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Index,ServerName,Status,RoundtripTime\n";

    fn write_log(file: &NamedTempFile, rows: &str) {
        let mut content = String::from(HEADER);
        content.push_str(rows);
        std::fs::write(file.path(), content).unwrap();
    }

    fn setup(policy: MalformedRowPolicy) -> (NamedTempFile, Arc<SharedRoster>, ReloadCycle) {
        let file = NamedTempFile::new().unwrap();
        let roster = Arc::new(SharedRoster::new(vec![
            CandidateServer::new("a", 1),
            CandidateServer::new("b", 2),
        ]));
        let cycle = ReloadCycle::new(
            StatisticsLoader::new(file.path(), policy),
            roster.clone(),
            Arc::new(StrategyState::new()),
        );
        (file, roster, cycle)
    }

    #[tokio::test]
    async fn test_selects_and_switches() {
        let (file, _roster, cycle) = setup(MalformedRowPolicy::Abort);
        write_log(&file, "1,a:1,Success,10\n2,b:2,TimedOut,10\n");

        let outcome = cycle.run().await;
        assert!(matches!(outcome, CycleOutcome::Selected { changed: true, .. }));
        assert_eq!(cycle.state().current_server().unwrap().host, "a");

        write_log(&file, "1,a:1,TimedOut,10\n2,b:2,Success,10\n");
        cycle.run().await;
        assert_eq!(cycle.state().current_server().unwrap().host, "b");

        let outcome = cycle.run().await;
        assert!(matches!(outcome, CycleOutcome::Selected { changed: false, .. }));
    }

    #[tokio::test]
    async fn test_load_failure_changes_nothing() {
        let (file, _roster, cycle) = setup(MalformedRowPolicy::Abort);
        write_log(&file, "1,a:1,Success,10\n");
        cycle.run().await;
        let before = cycle.state().snapshot();

        write_log(&file, "1,a:1,Success,10\n2,b:2,Success,oops\n");
        assert_eq!(cycle.run().await, CycleOutcome::LoadFailed);

        let after = cycle.state().snapshot();
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[tokio::test]
    async fn test_no_statistics_leaves_snapshot_untouched() {
        let (file, _roster, cycle) = setup(MalformedRowPolicy::Skip);
        write_log(&file, "1,a:1,Success,10\n");
        cycle.run().await;
        let before = cycle.state().snapshot();

        write_log(&file, "1,zz:9,Success,10\n");
        assert_eq!(
            cycle.run().await,
            CycleOutcome::Retained(SelectError::NoUsableStatistics)
        );

        let after = cycle.state().snapshot();
        assert!(Arc::ptr_eq(&before, &after));
        assert!(after.aggregates.contains_key("a:1"));
        assert!(!after.aggregates.contains_key("zz:9"));
    }

    #[tokio::test]
    async fn test_empty_roster_stays_unset() {
        let (file, roster, cycle) = setup(MalformedRowPolicy::Skip);
        roster.replace(Vec::new());
        write_log(&file, "1,a:1,Success,10\n");

        assert_eq!(
            cycle.run().await,
            CycleOutcome::Retained(SelectError::EmptyCandidateSet)
        );
        assert!(cycle.state().current_server().is_none());
    }

    #[tokio::test]
    async fn test_missing_log_is_not_fatal() {
        let (file, _roster, cycle) = setup(MalformedRowPolicy::Skip);
        let path = file.path().to_path_buf();
        drop(file);
        assert!(!path.exists());

        assert_eq!(cycle.run().await, CycleOutcome::LoadFailed);
        assert!(cycle.state().current_server().is_none());
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(CycleOutcome::LoadFailed.label(), "load_failed");
        assert_eq!(
            CycleOutcome::Retained(SelectError::EmptyCandidateSet).label(),
            "empty_roster"
        );
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_cycle_is_shareable() {
        assert_send_sync::<ReloadCycle>();
    }
}
