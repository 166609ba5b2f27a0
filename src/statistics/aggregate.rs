//! Per-server summaries built from one load of the probe log.

use std::collections::HashMap;

use serde::Serialize;

use crate::statistics::record::{ProbeStatus, RawProbeRecord};

/// Aggregates keyed by server id (the server's friendly name).
pub type AggregateMap = HashMap<String, ServerAggregate>;

/// Summary statistics over all probe records for one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerAggregate {
    pub server_id: String,
    pub success_count: u64,
    pub timed_out_count: u64,
    /// Mean round trip, rounded half to even.
    pub avg_rtt: i64,
    pub min_rtt: i64,
    pub max_rtt: i64,
}

/// Running totals for one server while a load is in progress.
#[derive(Debug)]
struct Accumulator {
    success: u64,
    timed_out: u64,
    rows: u64,
    rtt_sum: i128,
    min_rtt: i64,
    max_rtt: i64,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            success: 0,
            timed_out: 0,
            rows: 0,
            rtt_sum: 0,
            min_rtt: i64::MAX,
            max_rtt: i64::MIN,
        }
    }

    fn push(&mut self, record: &RawProbeRecord) {
        match record.status {
            ProbeStatus::Success => self.success += 1,
            ProbeStatus::TimedOut => self.timed_out += 1,
            ProbeStatus::Other(_) => {}
        }
        self.rows += 1;
        self.rtt_sum += record.round_trip_ms as i128;
        self.min_rtt = self.min_rtt.min(record.round_trip_ms);
        self.max_rtt = self.max_rtt.max(record.round_trip_ms);
    }

    fn finish(self, server_id: String) -> ServerAggregate {
        let mean = self.rtt_sum as f64 / self.rows as f64;
        ServerAggregate {
            server_id,
            success_count: self.success,
            timed_out_count: self.timed_out,
            avg_rtt: mean.round_ties_even() as i64,
            min_rtt: self.min_rtt,
            max_rtt: self.max_rtt,
        }
    }
}

/// Groups records by server id and folds them into aggregates.
#[derive(Debug, Default)]
pub struct AggregateBuilder {
    groups: HashMap<String, Accumulator>,
}

impl AggregateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: RawProbeRecord) {
        self.groups
            .entry(record.server_id.clone())
            .or_insert_with(Accumulator::new)
            .push(&record);
    }

    pub fn build(self) -> AggregateMap {
        self.groups
            .into_iter()
            .map(|(id, acc)| {
                let aggregate = acc.finish(id.clone());
                (id, aggregate)
            })
            .collect()
    }
}
