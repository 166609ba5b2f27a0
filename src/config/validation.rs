//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (interval within (0, one year], ports valid)
//! - Detect servers whose friendly names collide
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: StrategyConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::StrategyConfig;
use crate::roster::CandidateServer;

/// Upper bound for `refresh.interval_secs` (one year).
pub const MAX_REFRESH_INTERVAL_SECS: u64 = 86_400 * 365;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("refresh.interval_secs must be > 0")]
    ZeroRefreshInterval,

    #[error("refresh.interval_secs must be <= {max}, got {got}")]
    RefreshIntervalTooLong { got: u64, max: u64 },

    #[error("statistics.path must not be empty")]
    EmptyStatisticsPath,

    #[error("server {host} has port 0")]
    ZeroPort { host: String },

    #[error("duplicate server name {name:?}")]
    DuplicateServer { name: String },

    #[error("invalid metrics address {0:?}")]
    InvalidMetricsAddress(String),
}

/// Check a parsed configuration.
pub fn validate_config(config: &StrategyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.refresh.interval_secs {
        0 => errors.push(ValidationError::ZeroRefreshInterval),
        got if got > MAX_REFRESH_INTERVAL_SECS => {
            errors.push(ValidationError::RefreshIntervalTooLong {
                got,
                max: MAX_REFRESH_INTERVAL_SECS,
            })
        }
        _ => {}
    }

    if config.statistics.path.trim().is_empty() {
        errors.push(ValidationError::EmptyStatisticsPath);
    }

    let mut names = HashSet::new();
    for server in &config.servers {
        if server.port == 0 {
            errors.push(ValidationError::ZeroPort {
                host: server.host.clone(),
            });
        }
        let name = CandidateServer::from(server).friendly_name();
        if !names.insert(name.clone()) {
            errors.push(ValidationError::DuplicateServer { name });
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
