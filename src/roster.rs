//! Candidate servers and the roster they come from.
//!
//! # Responsibilities
//! - Represent one upstream server and its stable friendly name
//! - Define the provider seam the strategy reads the roster through
//! - Provide a swappable in-memory roster for config hot reload

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Serialize;

use crate::config::ServerConfig;

/// A single upstream server.
///
/// The friendly name doubles as the identity key matched against the
/// server id column of the probe log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CandidateServer {
    pub host: String,
    pub port: u16,
    pub remarks: Option<String>,
}

impl CandidateServer {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            remarks: None,
        }
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    /// `host:port`, bracketing IPv6 literals.
    pub fn address(&self) -> String {
        match self.host.parse::<IpAddr>() {
            Ok(IpAddr::V6(_)) => format!("[{}]:{}", self.host, self.port),
            _ => format!("{}:{}", self.host, self.port),
        }
    }

    /// Human readable name, also used as the statistics lookup key.
    pub fn friendly_name(&self) -> String {
        if self.host.is_empty() {
            return "New server".to_string();
        }
        match self.remarks.as_deref() {
            Some(remarks) if !remarks.is_empty() => format!("{} ({})", remarks, self.address()),
            _ => self.address(),
        }
    }
}

impl fmt::Display for CandidateServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.friendly_name())
    }
}

impl From<&ServerConfig> for CandidateServer {
    fn from(config: &ServerConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            remarks: config.remarks.clone(),
        }
    }
}

/// Supplies the ordered list of candidates for one reload cycle.
pub trait RosterProvider: Send + Sync {
    fn servers(&self) -> Vec<Arc<CandidateServer>>;
}

/// In-memory roster that can be replaced atomically.
#[derive(Debug)]
pub struct SharedRoster {
    servers: ArcSwap<Vec<Arc<CandidateServer>>>,
}

impl SharedRoster {
    pub fn new(servers: Vec<CandidateServer>) -> Self {
        Self {
            servers: ArcSwap::from_pointee(servers.into_iter().map(Arc::new).collect()),
        }
    }

    pub fn from_config(configs: &[ServerConfig]) -> Self {
        Self::new(configs.iter().map(CandidateServer::from).collect())
    }

    /// Atomically replace the roster (e.g. on config reload).
    pub fn replace(&self, servers: Vec<CandidateServer>) {
        tracing::info!(count = servers.len(), "Server roster replaced");
        self.servers
            .store(Arc::new(servers.into_iter().map(Arc::new).collect()));
    }

    pub fn len(&self) -> usize {
        self.servers.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RosterProvider for SharedRoster {
    fn servers(&self) -> Vec<Arc<CandidateServer>> {
        Vec::clone(&self.servers.load())
    }
}
