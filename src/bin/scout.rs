//! CLI binary for scout.

use clap::Parser;
use scout::cli::{self, Cli};
use scout::ScoutConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ScoutConfig::load(cli.config.as_deref())?;

    // RUST_LOG wins over the configured filter. Logs go to stderr so stdout
    // carries results only.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout().lock();
    cli::run(&cli, config.search_config(), &mut stdout).await?;
    Ok(())
}
