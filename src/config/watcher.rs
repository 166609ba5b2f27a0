//! Configuration file watcher for roster hot reload.
//!
//! The parent directory is watched instead of the file itself so that
//! editors replacing the file through a rename do not silently end the watch.
//! Only configurations whose server roster differs from the last one seen
//! are forwarded; other edits need a restart.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::{ServerConfig, StrategyConfig};

/// A watcher that monitors the configuration file for roster changes.
pub struct ConfigWatcher {
    path: PathBuf,
    current_servers: Vec<ServerConfig>,
    update_tx: mpsc::UnboundedSender<StrategyConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher seeded with the roster already in use.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(
        path: &Path,
        current_servers: Vec<ServerConfig>,
    ) -> (Self, mpsc::UnboundedReceiver<StrategyConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                current_servers,
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching in a background thread.
    ///
    /// The returned watcher must be kept alive for events to keep flowing.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self {
            path,
            mut current_servers,
            update_tx,
        } = self;

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = path.file_name().map(|n| n.to_os_string());
        let config_path = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !(event.kind.is_modify() || event.kind.is_create()) {
                        return;
                    }
                    let touches_config = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                    if !touches_config {
                        return;
                    }

                    match load_config(&config_path) {
                        Ok(new_config) => {
                            if new_config.servers == current_servers {
                                tracing::debug!("Config changed but roster is identical, ignoring");
                                return;
                            }
                            tracing::info!(
                                servers = new_config.servers.len(),
                                "Config roster changed, reloading"
                            );
                            current_servers = new_config.servers.clone();
                            let _ = update_tx.send(new_config);
                        }
                        Err(e) => {
                            tracing::error!(
                                "Failed to reload config: {}. Keeping current configuration.",
                                e
                            );
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }
}
