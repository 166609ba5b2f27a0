//! Success-ratio scoring.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::statistics::ServerAggregate;

/// Success ratio of a server, in `[0, 1]`. Higher is better.
///
/// Only constructed from a non-zero denominator, so it is always finite and
/// totally ordered.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// `success / (success + timed_out)`, or `None` when the server has no
/// successful or timed-out probes.
pub fn score(aggregate: &ServerAggregate) -> Option<Score> {
    let total = aggregate.success_count + aggregate.timed_out_count;
    if total == 0 {
        return None;
    }
    Some(Score(aggregate.success_count as f64 / total as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate(success: u64, timed_out: u64) -> ServerAggregate {
        ServerAggregate {
            server_id: "s".into(),
            success_count: success,
            timed_out_count: timed_out,
            avg_rtt: 0,
            min_rtt: 0,
            max_rtt: 0,
        }
    }

    #[test]
    fn test_success_ratio() {
        let s = score(&aggregate(2, 1)).unwrap();
        assert!((s.value() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(score(&aggregate(3, 0)).unwrap().value(), 1.0);
        assert_eq!(score(&aggregate(0, 4)).unwrap().value(), 0.0);
    }

    #[test]
    fn test_no_probes_has_no_score() {
        assert!(score(&aggregate(0, 0)).is_none());
    }

    #[test]
    fn test_ordering() {
        let low = score(&aggregate(1, 1)).unwrap();
        let high = score(&aggregate(9, 1)).unwrap();
        assert!(high > low);
        assert_eq!(score(&aggregate(1, 1)), score(&aggregate(2, 2)));
    }
}
