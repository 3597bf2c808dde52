mod config;
mod device;
mod hub;
mod simulator;
mod telemetry;

use anyhow::Result;
use config::SimulatorConfig;
use device::Device;
use hub::HubClient;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    if let Err(e) = run().await {
        error!("Unexpected error: {:#}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run() -> Result<()> {
    let config = SimulatorConfig::from_env()?;

    info!("Device simulator starting: {}", config.device_id);
    info!("  hub: {}", config.hub_addr);

    let publisher = Arc::new(
        HubClient::connect(
            &config.hub_addr,
            &config.device_id,
            &config.device_key,
            config.connect_timeout,
        )
        .await?,
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        }
    });

    Device::new(config, publisher).run(shutdown_rx).await
}
