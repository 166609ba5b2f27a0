//! Statistics strategy daemon.
//!
//! ```text
//! strategy.toml ──▶ config ──▶ SharedRoster ──┐
//!        │                                   ▼
//!        └─ watcher (roster edits) ──▶ StatisticsStrategy ◀── availability log
//!                                            │
//!                               RefreshScheduler (interval | on demand)
//! ```
//!
//! `run` keeps the strategy fresh until interrupted; `inspect` performs a
//! single reload and prints the result as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;

use statistics_strategy::config::{load_config, watcher::ConfigWatcher, StrategyConfig};
use statistics_strategy::observability::{logging, metrics};
use statistics_strategy::strategy::CycleOutcome;
use statistics_strategy::{CandidateServer, SharedRoster, Shutdown, StatisticsStrategy, Strategy};

#[derive(Parser)]
#[command(name = "statistics-strategy")]
#[command(about = "Pick the upstream server with the best probe success ratio", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "strategy.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Keep re-evaluating until interrupted
    Run,
    /// Load statistics once and print the selection
    Inspect,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    logging::init(&config.observability)?;
    tracing::info!(
        config = %cli.config.display(),
        statistics = %config.statistics.path,
        servers = config.servers.len(),
        interval_secs = config.refresh.interval_secs,
        "statistics-strategy v0.1.0 starting"
    );

    match cli.command {
        Commands::Run => run(cli.config, config).await,
        Commands::Inspect => inspect(config).await,
    }
}

async fn run(path: PathBuf, config: StrategyConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let roster = Arc::new(SharedRoster::from_config(&config.servers));
    let (strategy, scheduler) = StatisticsStrategy::from_config(&config, roster.clone());

    let shutdown = Shutdown::new();
    let scheduler_task = tokio::spawn(scheduler.run(shutdown.subscribe()));

    let (watcher, mut updates) = ConfigWatcher::new(&path, config.servers.clone());
    let _watcher = match watcher.run() {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "Config watcher unavailable, roster will not hot reload");
            None
        }
    };

    let signal = shutdown.clone();
    let signal_task = tokio::spawn(async move { signal.trigger_on_signal().await });
    let mut stop = shutdown.subscribe();

    loop {
        tokio::select! {
            Some(new_config) = updates.recv() => {
                roster.replace(new_config.servers.iter().map(CandidateServer::from).collect());
                strategy.reload_servers();
            }
            _ = stop.recv() => break,
        }
    }

    signal_task.abort();
    scheduler_task.await?;

    match strategy.current_server() {
        Some(server) => tracing::info!(server = %server, "Shutdown complete"),
        None => tracing::info!("Shutdown complete, no server was ever selected"),
    }
    Ok(())
}

async fn inspect(config: StrategyConfig) -> Result<(), Box<dyn std::error::Error>> {
    let roster = Arc::new(SharedRoster::from_config(&config.servers));
    let (strategy, _scheduler) = StatisticsStrategy::from_config(&config, roster);

    let outcome = match strategy.reload_now().await {
        CycleOutcome::Selected { .. } => "selected".to_string(),
        CycleOutcome::Retained(reason) => reason.to_string(),
        CycleOutcome::LoadFailed => "statistics could not be loaded".to_string(),
    };

    let snapshot = strategy.snapshot();
    let mut aggregates: Vec<_> = snapshot.aggregates.values().collect();
    aggregates.sort_by(|a, b| a.server_id.cmp(&b.server_id));

    let report = json!({
        "strategy": strategy.id(),
        "outcome": outcome,
        "current_server": snapshot.current_server.as_deref().map(CandidateServer::friendly_name),
        "score": snapshot.score,
        "aggregates": aggregates,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
