use clap::Parser;
use prompthub::cli::Cli;
use prompthub::commands;
use prompthub::core::config::HubConfig;
use prompthub::core::logging;
use prompthub::{HubError, PromptHub};

#[tokio::main]
async fn main() {
    logging::init();
    if let Err(e) = run().await {
        eprintln!("• {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), HubError> {
    let cli = Cli::parse();
    let config = HubConfig::load(cli.home.as_deref())?;
    let hub = PromptHub::open(config)?;
    commands::dispatch(cli.command, &hub).await
}
