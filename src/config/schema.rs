//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the strategy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StrategyConfig {
    /// Probe log location and parsing policy.
    pub statistics: StatisticsConfig,

    /// Periodic re-evaluation settings.
    pub refresh: RefreshConfig,

    /// Candidate servers, in roster order.
    pub servers: Vec<ServerConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// What to do with a probe-log row that cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MalformedRowPolicy {
    /// Log and drop the row, keep loading the rest.
    #[default]
    Skip,
    /// Abandon the whole load and keep the previous statistics.
    Abort,
}

/// Statistics source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StatisticsConfig {
    /// Path of the availability log written by the monitor.
    pub path: String,

    /// Malformed row handling.
    pub malformed_rows: MalformedRowPolicy,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            path: "availability_statistics.csv".to_string(),
            malformed_rows: MalformedRowPolicy::default(),
        }
    }
}

/// Refresh scheduling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// How long a selection is reused before re-evaluating, in seconds.
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60 * 60,
        }
    }
}

/// Upstream server configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Hostname or IP address.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Optional display remarks, part of the friendly name.
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
