//! Adaptive upstream server selection driven by availability statistics.
//!
//! A [`StatisticsStrategy`] reads the probe log written by an external
//! availability monitor, scores every roster server by its probe success
//! ratio and caches the best one until the next refresh.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod roster;
pub mod statistics;
pub mod strategy;

pub use config::StrategyConfig;
pub use lifecycle::Shutdown;
pub use roster::{CandidateServer, RosterProvider, SharedRoster};
pub use strategy::{StatisticsStrategy, Strategy};
