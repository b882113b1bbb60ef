// `perfload seed`: synthesize the entity chain and time the calculations

use std::path::PathBuf;

use clap::Args;

use perfload_client::{run_seed, ApiClient, SeedConfig};

use crate::report;

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// API base URL
    #[arg(long, env = "PERFLOAD_API_URL")]
    pub api_url: String,

    /// Bearer token sent with every request
    #[arg(long, env = "PERFLOAD_TOKEN")]
    pub token: String,

    /// Number of portfolios to create
    #[arg(long, default_value_t = 5)]
    pub portfolios: u32,

    /// Number of items per portfolio
    #[arg(long, default_value_t = 3)]
    pub items: u32,

    /// Number of transactions per item
    #[arg(long, default_value_t = 10)]
    pub transactions: u32,

    /// Concurrency level (simultaneous in-flight requests per phase)
    #[arg(long, default_value_t = 5)]
    pub concurrency: usize,

    /// Output file for the results (JSON)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub async fn run(args: SeedArgs) -> anyhow::Result<()> {
    let client = ApiClient::new(&args.api_url, &args.token)?;
    let config = SeedConfig {
        portfolios: args.portfolios,
        items_per_portfolio: args.items,
        transactions_per_item: args.transactions,
        concurrency: args.concurrency,
    };

    println!(
        "Running performance test with {} portfolios, {} items per portfolio, {} transactions per item",
        args.portfolios, args.items, args.transactions
    );

    let seed_report = run_seed(&client, &config).await;

    report::print_seed_report(&seed_report);

    if let Some(path) = &args.output {
        report::write_json(&seed_report, path)?;
        println!("\nResults saved to {}", path.display());
    }

    Ok(())
}
