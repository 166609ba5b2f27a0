//! Error types for the statistics strategy.
//!
//! None of these are fatal to the strategy itself: the reload cycle logs
//! them and keeps serving the last known good selection.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn the probe log into a fresh aggregate map.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The probe log is missing or could not be read.
    #[error("statistics file {path} unavailable: {source}")]
    DataSourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row could not be parsed while running in abort mode.
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
}

/// Reasons a selection pass leaves the current server untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectError {
    /// The roster handed to the selector was empty.
    #[error("no candidate servers configured")]
    EmptyCandidateSet,

    /// No candidate has a usable score in the current aggregates.
    #[error("no candidate server has usable statistics")]
    NoUsableStatistics,
}

/// Result alias for loader operations.
pub type LoadResult<T> = Result<T, LoadError>;
