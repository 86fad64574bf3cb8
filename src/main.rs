//! Workforce analytics HTTP server.
//!
//! ```bash
//! workforce-analytics --config-dir ./config/default --data ./snapshot.json
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use workforce_analytics::api::{AppState, create_router};
use workforce_analytics::config::ConfigLoader;
use workforce_analytics::repository::{InMemoryRepository, RecordSnapshot};

/// Serves workforce analytics and reports over HTTP
#[derive(Parser)]
#[command(name = "workforce-analytics")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding scoring.yaml, forecasting.yaml, detection.yaml and payroll.yaml
    #[arg(long, default_value = "./config/default")]
    config_dir: PathBuf,

    /// JSON snapshot of employees, attendance and leave records
    #[arg(long)]
    data: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging();

    let config = ConfigLoader::load(&cli.config_dir)
        .with_context(|| format!("loading configuration from {}", cli.config_dir.display()))?;

    let snapshot = match &cli.data {
        Some(path) => RecordSnapshot::from_json_file(path)
            .with_context(|| format!("loading records from {}", path.display()))?,
        None => RecordSnapshot::default(),
    };
    let repository = InMemoryRepository::new(snapshot);

    let router = create_router(AppState::new(config, repository));
    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("binding {}", cli.bind))?;
    info!(address = %cli.bind, "Workforce analytics listening");

    axum::serve(listener, router).await.context("serving HTTP")?;
    Ok(())
}
