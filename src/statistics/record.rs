//! Single probe-log rows.

use std::fmt;

use thiserror::Error;

/// Outcome token recorded by the availability monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    Success,
    TimedOut,
    /// Any other status token; counted as neither success nor timeout.
    Other(String),
}

impl ProbeStatus {
    /// Classify a status token. Matching is exact and case-sensitive.
    pub fn from_token(token: &str) -> Self {
        match token {
            "Success" => ProbeStatus::Success,
            "TimedOut" => ProbeStatus::TimedOut,
            other => ProbeStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::Success => f.write_str("Success"),
            ProbeStatus::TimedOut => f.write_str("TimedOut"),
            ProbeStatus::Other(token) => f.write_str(token),
        }
    }
}

/// One parsed data row of the probe log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProbeRecord {
    pub server_id: String,
    pub status: ProbeStatus,
    pub round_trip_ms: i64,
}

/// Why a row was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("expected at least 4 fields, found {found}")]
    MissingFields { found: usize },

    #[error("round trip time {0:?} is not an integer")]
    InvalidRoundTrip(String),
}

impl RawProbeRecord {
    /// Parse `<index>,<serverID>,<status>,<roundTripMillis>[,...]`.
    ///
    /// Empty fields are dropped before positions are assigned, so `a,,b`
    /// has two fields. Columns past the fourth are ignored.
    pub fn parse_row(row: &str) -> Result<Self, RowError> {
        let fields: Vec<&str> = row
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect();

        if fields.len() < 4 {
            return Err(RowError::MissingFields { found: fields.len() });
        }

        let round_trip_ms = fields[3]
            .parse::<i64>()
            .map_err(|_| RowError::InvalidRoundTrip(fields[3].to_string()))?;

        Ok(Self {
            server_id: fields[1].to_string(),
            status: ProbeStatus::from_token(fields[2]),
            round_trip_ms,
        })
    }
}
