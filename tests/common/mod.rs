//! Shared helpers for strategy integration tests.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use statistics_strategy::{CandidateServer, RosterProvider};

pub const HEADER: &str = "Index,ServerName,Status,RoundtripTime,Timestamp\n";

/// Overwrite the probe log with a header and `rows` as `(server, status, rtt)`.
pub fn write_log(path: &Path, rows: &[(&str, &str, &str)]) {
    let mut content = String::from(HEADER);
    for (i, (server, status, rtt)) in rows.iter().enumerate() {
        content.push_str(&format!("{},{},{},{},2024-01-01T00:00:00\n", i + 1, server, status, rtt));
    }
    std::fs::write(path, content).unwrap();
}

/// `ServerA`/`ServerB` from the reference example: B has the better ratio.
pub fn example_rows() -> Vec<(&'static str, &'static str, &'static str)> {
    vec![
        ("ServerA (10.0.0.1:8388)", "Success", "100"),
        ("ServerA (10.0.0.1:8388)", "Success", "200"),
        ("ServerA (10.0.0.1:8388)", "TimedOut", "50"),
        ("ServerB (10.0.0.2:8388)", "Success", "10"),
        ("ServerB (10.0.0.2:8388)", "Success", "20"),
        ("ServerB (10.0.0.2:8388)", "Success", "30"),
    ]
}

pub fn server_a() -> CandidateServer {
    CandidateServer::new("10.0.0.1", 8388).with_remarks("ServerA")
}

pub fn server_b() -> CandidateServer {
    CandidateServer::new("10.0.0.2", 8388).with_remarks("ServerB")
}

/// Roster that counts how often it has been read.
#[allow(dead_code)]
pub struct CountingRoster {
    servers: Vec<Arc<CandidateServer>>,
    pub reads: AtomicUsize,
}

#[allow(dead_code)]
impl CountingRoster {
    pub fn new(servers: Vec<CandidateServer>) -> Self {
        Self {
            servers: servers.into_iter().map(Arc::new).collect(),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl RosterProvider for CountingRoster {
    fn servers(&self) -> Vec<Arc<CandidateServer>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.servers.clone()
    }
}

/// Roster that holds each read open briefly and records how many reads
/// were in flight at once.
#[allow(dead_code)]
pub struct OverlapRoster {
    servers: Vec<Arc<CandidateServer>>,
    hold: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    reads: AtomicUsize,
}

#[allow(dead_code)]
impl OverlapRoster {
    pub fn new(servers: Vec<CandidateServer>, hold: Duration) -> Self {
        Self {
            servers: servers.into_iter().map(Arc::new).collect(),
            hold,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl RosterProvider for OverlapRoster {
    fn servers(&self) -> Vec<Arc<CandidateServer>> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        // widen the window a second cycle would have to overlap
        std::thread::sleep(self.hold);
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.servers.clone()
    }
}

/// Poll `cond` until it holds or `timeout` elapses.
#[allow(dead_code)]
pub async fn wait_for<F>(timeout: Duration, mut cond: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cond()
}
