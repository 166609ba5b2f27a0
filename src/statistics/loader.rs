//! Probe log loading.
//!
//! # Responsibilities
//! - Read the availability log written by the external monitor
//! - Parse rows and group them into per-server aggregates
//! - Apply the configured malformed-row policy
//!
//! # Design Decisions
//! - A load either yields a complete map or an error; callers keep the
//!   previous map on error
//! - The first line is always a header and is never parsed
//! - File reads go through `tokio::fs` so a slow disk never stalls the runtime

use std::path::{Path, PathBuf};

use crate::config::{MalformedRowPolicy, StatisticsConfig};
use crate::error::{LoadError, LoadResult};
use crate::statistics::aggregate::{AggregateBuilder, AggregateMap};
use crate::statistics::record::RawProbeRecord;

/// Loads probe statistics from a CSV log.
#[derive(Debug, Clone)]
pub struct StatisticsLoader {
    path: PathBuf,
    policy: MalformedRowPolicy,
}

impl StatisticsLoader {
    pub fn new(path: impl Into<PathBuf>, policy: MalformedRowPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
        }
    }

    pub fn from_config(config: &StatisticsConfig) -> Self {
        Self::new(&config.path, config.malformed_rows)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> MalformedRowPolicy {
        self.policy
    }

    /// Read and aggregate the whole log.
    pub async fn load(&self) -> LoadResult<AggregateMap> {
        tracing::debug!(path = %self.path.display(), "Loading statistics");

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| LoadError::DataSourceUnavailable {
                path: self.path.clone(),
                source,
            })?;

        self.parse(&content)
    }

    /// Aggregate already-read log content.
    pub fn parse(&self, content: &str) -> LoadResult<AggregateMap> {
        let mut builder = AggregateBuilder::new();
        let mut skipped = 0usize;

        for (idx, row) in content.lines().enumerate().skip(1) {
            if row.trim().is_empty() {
                continue;
            }
            let line = idx + 1;

            match RawProbeRecord::parse_row(row) {
                Ok(record) => builder.push(record),
                Err(e) => match self.policy {
                    MalformedRowPolicy::Abort => {
                        return Err(LoadError::MalformedRecord {
                            line,
                            reason: e.to_string(),
                        });
                    }
                    MalformedRowPolicy::Skip => {
                        tracing::warn!(line, error = %e, "Skipping malformed statistics row");
                        skipped += 1;
                    }
                },
            }
        }

        let aggregates = builder.build();
        tracing::debug!(
            servers = aggregates.len(),
            skipped,
            "Statistics loaded"
        );
        Ok(aggregates)
    }
}
