//! Lobster Stock Inventory - stock report
//!
//! Loads the facility inventory from the configured source and prints the
//! stock report as JSON.

use lobster_inventory_client::{
    config::{Config, DataSource},
    services::{SnapshotSource, StockReportService},
    SnapshotFile,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "lsi_report=debug,lobster_inventory_client=debug,reqwest=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Lobster Stock Inventory report");
    tracing::info!("Environment: {}", config.environment);

    let source = SnapshotSource::from_config(&config)?;
    let mut service = StockReportService::new(source);
    if config.source == DataSource::Api {
        if let Some(path) = &config.snapshot.path {
            service = service.persist_to(SnapshotFile::new(path));
        }
    }

    let report = service.generate().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
