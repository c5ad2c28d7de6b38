use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use metrics_probe::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = cli::Cli::parse();

    init_tracing();

    let probe = commands::build_probe(&args)?;

    // Dispatch to appropriate command handler
    match args.command {
        cli::Commands::Value {
            endpoint,
            family,
            labels,
        } => {
            commands::value::execute(&probe, &endpoint, &family, &labels).await?;
        }
        cli::Commands::Labels {
            endpoint,
            family,
            json,
        } => {
            commands::labels::execute(&probe, &endpoint, &family, json).await?;
        }
        cli::Commands::Families { endpoint } => {
            commands::families::execute(&probe, &endpoint).await?;
        }
    }

    Ok(())
}
