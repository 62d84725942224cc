use anyhow::Result;
use clap::Parser;
use ielv_sync::config::{Cli, Command};
use ielv_sync::dispatch::Dispatcher;
use ielv_sync::myvr::MyVrClient;
use ielv_sync::source::IelvClient;
use ielv_sync::sync::Reconciler;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Read configuration from flags and environment
    let cli = Cli::parse();
    let config = cli.config;

    info!("🏝️  IELV -> MyVR sync");
    info!("==========================================");

    // Create feed and MyVR clients
    let source = IelvClient::new(
        &config.ielv_base_url,
        config.ielv_api_key.as_deref(),
        config.timeout(),
    )?;
    let api = MyVrClient::new(&config.myvr_base_url, &config.myvr_api_key, config.timeout())?;
    let reconciler = Reconciler::new(Arc::new(api), config.sync_settings());
    let (dispatcher, mut queue) = Dispatcher::new(Arc::new(source), reconciler);

    // Queue the requested properties
    match cli.command {
        Command::All { stage } => dispatcher.start_all(stage).await?,
        Command::Property { ids, stage } => dispatcher.start(ids, stage)?,
    }

    // Work through the queue
    let summary = dispatcher.run(&mut queue).await?;
    info!(
        "✅ Synced {} properties ({} failed)",
        summary.succeeded.len(),
        summary.failed.len()
    );

    Ok(())
}
