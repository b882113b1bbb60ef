// perfload CLI
//
// Design Decision: Use clap derive for ergonomic argument parsing.
// Design Decision: One binary with two subcommands mirroring the two harness
// programs: `drive` (rate-controlled request stream) and `seed` (entity
// chain plus calculation timing).

mod charts;
mod commands;
mod report;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "perfload")]
#[command(about = "Load and workload harness for the Investment Performance Calculator API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drive a rate-controlled request stream and report latency statistics
    Drive(commands::drive::DriveArgs),

    /// Seed a portfolio/item/transaction chain and time the calculation
    /// endpoints
    Seed(commands::seed::SeedArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Drive(args) => commands::drive::run(args).await,
        Commands::Seed(args) => commands::seed::run(args).await,
    }
}
