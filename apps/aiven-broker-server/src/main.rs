//! Aiven service broker: entry point.
//!
//! # Usage
//!
//! ```bash
//! # Serve the Open Service Broker API
//! aiven-broker-server --config ./config.json
//!
//! # Wire Elasticsearch services to the Prometheus endpoint every interval
//! aiven-broker-server --config ./config.json --process metrics-converger
//! ```

use std::path::PathBuf;

use aiven_broker::AivenBrokerModule;
use aiven_broker::config::{BrokerConfig, LogLevel};
use anyhow::Context;
use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Open Service Broker for Aiven-hosted Elasticsearch, OpenSearch and InfluxDB.
#[derive(Parser, Debug)]
#[command(name = "aiven-broker-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, default_value = "./config.json")]
    config: PathBuf,

    /// Which process to run
    #[arg(long, value_enum, default_value_t = Process::Server)]
    process: Process,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Process {
    Server,
    MetricsConverger,
}

fn init_tracing(level: LogLevel, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter_directive()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn shutdown_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl-C");
            return;
        }
        info!("shutdown requested");
        trigger.cancel();
    });
    token
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let raw = std::fs::read(&cli.config)
        .with_context(|| format!("failed to read config file {}", cli.config.display()))?;
    let config = BrokerConfig::load(&raw, |key| std::env::var(key).ok())?;

    init_tracing(config.log_level, cli.json_logs);
    info!(process = ?cli.process, config = ?config, "starting Aiven broker");

    let module = AivenBrokerModule::new(config)?;
    let shutdown = shutdown_on_ctrl_c();

    match cli.process {
        Process::Server => module.serve(shutdown).await,
        Process::MetricsConverger => {
            module.metrics_converger()?.run(shutdown).await;
            Ok(())
        }
    }
}
