use std::path::PathBuf;

use bike_planner::config::load_config;
use bike_planner::lifecycle::launch;
use bike_planner::observability::logging::init_logging;
use clap::Parser;

#[derive(Parser)]
#[command(name = "bike-planner")]
#[command(about = "Bike route planner backed by GraphHopper or Mapbox", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config/planner.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logging depends on the config, so config errors go straight to stderr.
    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {}", cli.config.display(), e);
            return Err(e.into());
        }
    };

    init_logging(&config.observability)?;
    tracing::info!("bike-planner v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        provider = %config.provider.kind,
        request_timeout_secs = config.timeouts.request_secs,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    launch(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
