//! Best-server selection over a roster.

use std::sync::Arc;

use crate::error::SelectError;
use crate::roster::CandidateServer;
use crate::statistics::AggregateMap;
use crate::strategy::score::{score, Score};

/// Outcome of a successful selection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub server: Arc<CandidateServer>,
    pub score: Score,
}

/// Pick the highest scoring candidate.
///
/// Candidates without an aggregate or without a usable score are skipped.
/// On equal scores the one earlier in `roster` wins.
pub fn select(
    roster: &[Arc<CandidateServer>],
    aggregates: &AggregateMap,
) -> Result<Selection, SelectError> {
    if roster.is_empty() {
        return Err(SelectError::EmptyCandidateSet);
    }

    let mut best: Option<Selection> = None;
    for server in roster {
        let name = server.friendly_name();
        let Some(server_score) = aggregates.get(&name).and_then(score) else {
            tracing::trace!(server = %name, "No usable statistics, skipping");
            continue;
        };

        // strictly greater: first seen wins ties
        if best.as_ref().map_or(true, |b| server_score > b.score) {
            best = Some(Selection {
                server: server.clone(),
                score: server_score,
            });
        }
    }

    best.ok_or(SelectError::NoUsableStatistics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::ServerAggregate;

    fn server(remarks: &str) -> Arc<CandidateServer> {
        Arc::new(CandidateServer::new("10.0.0.1", 8388).with_remarks(remarks))
    }

    fn stats(entries: &[(&Arc<CandidateServer>, u64, u64)]) -> AggregateMap {
        entries
            .iter()
            .map(|(s, success, timed_out)| {
                let id = s.friendly_name();
                (
                    id.clone(),
                    ServerAggregate {
                        server_id: id,
                        success_count: *success,
                        timed_out_count: *timed_out,
                        avg_rtt: 0,
                        min_rtt: 0,
                        max_rtt: 0,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_picks_highest_ratio() {
        let a = server("A");
        let b = server("B");
        let map = stats(&[(&a, 2, 1), (&b, 3, 0)]);

        let picked = select(&[a, b.clone()], &map).unwrap();
        assert_eq!(picked.server, b);
        assert_eq!(picked.score.value(), 1.0);
    }

    #[test]
    fn test_tie_goes_to_roster_order() {
        let a = server("A");
        let b = server("B");
        let map = stats(&[(&a, 1, 1), (&b, 5, 5)]);

        assert_eq!(select(&[a.clone(), b.clone()], &map).unwrap().server, a);
        assert_eq!(select(&[b.clone(), a], &map).unwrap().server, b);
    }

    #[test]
    fn test_unscored_and_unknown_servers_excluded() {
        let a = server("A");
        let b = server("B");
        let c = server("C");
        // A has only non-status rows, C is missing from the log.
        let map = stats(&[(&a, 0, 0), (&b, 0, 3)]);

        let picked = select(&[a, b.clone(), c], &map).unwrap();
        assert_eq!(picked.server, b);
        assert_eq!(picked.score.value(), 0.0);
    }

    #[test]
    fn test_empty_inputs() {
        let a = server("A");
        assert_eq!(
            select(&[], &stats(&[(&a, 1, 0)])),
            Err(SelectError::EmptyCandidateSet)
        );
        assert_eq!(
            select(&[a.clone()], &AggregateMap::new()),
            Err(SelectError::NoUsableStatistics)
        );
        assert_eq!(
            select(&[a.clone()], &stats(&[(&a, 0, 0)])),
            Err(SelectError::NoUsableStatistics)
        );
    }
}
