mod auth;
mod cli;
mod error;
mod probe;
mod providers;
mod report;

use clap::Parser;
use cli::Cli;
use log::{error, info};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    info!("Starting MarketLens - Market Data API Insights Tool");

    match cli.execute().await {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
