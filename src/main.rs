use clap::Parser;
use tracing::{error, info};

mod config;
mod db;
mod error;
mod extract;
mod load;
mod pipeline;
mod transform;

use config::Config;

#[tokio::main]
async fn main() {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // The env file has to be in place before clap reads the environment
    let mode = config::load_env_file(std::env::args());
    info!("Loaded environment for {} mode", mode.as_str());

    let config = Config::parse();
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {:#}", e);
        std::process::exit(1);
    }

    if let Err(e) = pipeline::run(&config).await {
        error!("ETL pipeline failed: {:#}", e);
        std::process::exit(1);
    }
}
