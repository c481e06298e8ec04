use crate::config::Config;
use crate::error::Result;
use crate::processor::Processor;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod dataset;
mod error;
mod extract;
mod fetcher;
mod processor;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.args.log_level)),
        )
        .init();

    config.ensure_directories()?;

    let processor = Processor::new(config)?;
    processor.run().await?;

    info!("ESG scrape completed successfully!");
    Ok(())
}
