//! botdash - trading bot dashboard entry point

use anyhow::Result;
use botdash::{AppConfig, Application, Cli};
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Determine config path: CLI arg > BOTDASH_CONFIG env var > default
    let config_path = AppConfig::resolve_path(cli.config.clone());
    let config = AppConfig::from_file_or_default(&config_path)?;

    // Initialize logging
    botdash_telemetry::init_logging(&config.logging.filter)?;

    info!("Starting botdash v{}", env!("CARGO_PKG_VERSION"));
    info!(
        config_path = %config_path,
        found = std::path::Path::new(&config_path).exists(),
        "Configuration loaded"
    );

    let app = Application::new(config)?;
    app.run(cli.command, &mut std::io::stdout()).await?;

    Ok(())
}
