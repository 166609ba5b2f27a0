//! Shared selection state.
//!
//! # Responsibilities
//! - Hold the current server, its score, the aggregates it was chosen from
//!   and the time of the last successful selection
//! - Serve readers without locks or waiting on a reload
//!
//! # Design Decisions
//! - Every field lives in one immutable `SelectionSnapshot`; a reload swaps
//!   the whole snapshot, so readers see either the old or the new one in full
//! - Once a server has been selected it is never cleared, only replaced
//! - Aggregates are only published alongside a selection made from them
//! - Writers are serialized by the reload cycle guard

use std::sync::Arc;
use std::time::SystemTime;

use arc_swap::ArcSwap;

use crate::roster::CandidateServer;
use crate::statistics::AggregateMap;
use crate::strategy::score::Score;
use crate::strategy::selector::Selection;

/// Immutable view of the strategy at one point in time.
#[derive(Debug, Clone, Default)]
pub struct SelectionSnapshot {
    pub current_server: Option<Arc<CandidateServer>>,
    pub score: Option<Score>,
    /// When `current_server` was last (re)selected.
    pub last_refresh_at: Option<SystemTime>,
    /// Aggregates `current_server` was chosen from.
    pub aggregates: Arc<AggregateMap>,
    /// Bumped on every publish.
    pub generation: u64,
}

impl SelectionSnapshot {
    pub fn is_selected(&self) -> bool {
        self.current_server.is_some()
    }
}

/// Concurrently readable holder of the current `SelectionSnapshot`.
#[derive(Debug, Default)]
pub struct StrategyState {
    snapshot: ArcSwap<SelectionSnapshot>,
}

impl StrategyState {
    /// Start in the unset state: no server, no statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached selection. Never blocks.
    pub fn current_server(&self) -> Option<Arc<CandidateServer>> {
        self.snapshot.load().current_server.clone()
    }

    /// The full current snapshot.
    pub fn snapshot(&self) -> Arc<SelectionSnapshot> {
        self.snapshot.load_full()
    }

    /// Publish fresh aggregates together with a new selection.
    pub(crate) fn publish_selection(
        &self,
        aggregates: Arc<AggregateMap>,
        selection: Selection,
    ) -> Arc<SelectionSnapshot> {
        let prev = self.snapshot.load();
        let next = Arc::new(SelectionSnapshot {
            current_server: Some(selection.server),
            score: Some(selection.score),
            last_refresh_at: Some(SystemTime::now()),
            aggregates,
            generation: prev.generation + 1,
        });
        self.snapshot.store(next.clone());
        next
    }

}
