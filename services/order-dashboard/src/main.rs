//! Order dashboard CLI
//!
//! Polls the order API and serves the dashboard view state over HTTP.

use std::path::PathBuf;

use clap::Parser;
use order_dashboard::{load_config, Config, DashboardBuilder};
use tracing::Level;

#[derive(Parser)]
#[command(name = "order-dashboard")]
#[command(about = "Order monitoring dashboard for a storefront order API")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the order API (overrides config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Seconds between automatic refreshes (overrides config file)
    #[arg(long)]
    refresh_interval: Option<u64>,

    /// Dashboard port (overrides config file)
    #[arg(long)]
    dashboard_port: Option<u16>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, base_url={:?}, refresh_interval={:?}, dashboard_port={:?}, log_level={:?}",
        args.config,
        args.base_url,
        args.refresh_interval,
        args.dashboard_port,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(base_url) = args.base_url {
        config.api.base_url = base_url;
    }
    if let Some(refresh_interval) = args.refresh_interval {
        config.api.refresh_interval_seconds = refresh_interval;
    }
    if let Some(dashboard_port) = args.dashboard_port {
        config.dashboard.port = dashboard_port;
    }

    tracing::info!("Starting order dashboard");
    tracing::debug!(
        "Orders: {}, refresh every {}s, dashboard enabled: {}",
        config.api.orders_url(),
        config.api.refresh_interval_seconds,
        config.dashboard.enabled
    );

    DashboardBuilder::new(config).build()?.start().await?;

    Ok(())
}
