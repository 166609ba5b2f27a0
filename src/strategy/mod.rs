//! Server selection strategies.
//!
//! # Data Flow
//! ```text
//! RefreshScheduler (timer | ReloadTrigger)
//!     → cycle.rs (single-flight)
//!         → StatisticsLoader::load
//!         → selector.rs (roster × aggregates, scored by score.rs)
//!         → state.rs (swap snapshot)
//!
//! Connection handlers
//!     → Strategy::get_server → state.rs (lock-free read)
//! ```
//!
//! # Design Decisions
//! - Readers never wait for a reload; they get the last good selection
//! - A failed or empty cycle keeps the previous selection
//! - Transport feedback hooks are part of the trait but only logged by
//!   the statistics strategy

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::roster::CandidateServer;

pub mod cycle;
pub mod scheduler;
pub mod score;
pub mod selector;
pub mod state;
pub mod statistics;

pub use cycle::{CycleOutcome, ReloadCycle};
pub use scheduler::{RefreshScheduler, ReloadTrigger};
pub use score::Score;
pub use selector::Selection;
pub use state::{SelectionSnapshot, StrategyState};
pub use statistics::StatisticsStrategy;

/// Transport asking for a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerType {
    Tcp,
    Udp,
}

/// Context passed along with a server request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerContext {
    pub caller: CallerType,
    pub local_addr: Option<SocketAddr>,
}

impl CallerContext {
    pub fn tcp(local_addr: Option<SocketAddr>) -> Self {
        Self {
            caller: CallerType::Tcp,
            local_addr,
        }
    }

    pub fn udp(local_addr: Option<SocketAddr>) -> Self {
        Self {
            caller: CallerType::Udp,
            local_addr,
        }
    }
}

/// Interface a hosting framework uses to drive a selection strategy.
pub trait Strategy: Send + Sync {
    /// Stable identifier.
    fn id(&self) -> &'static str;

    /// Display name.
    fn name(&self) -> &str;

    /// Server to use for a new connection, if one has been chosen.
    fn get_server(&self, ctx: &CallerContext) -> Option<Arc<CandidateServer>>;

    /// The roster changed; re-evaluate soon.
    fn reload_servers(&self);

    fn report_failure(&self, server: &CandidateServer);

    fn report_read(&self, server: &CandidateServer);

    fn report_write(&self, server: &CandidateServer);

    fn report_latency(&self, server: &CandidateServer, latency: Duration);
}
