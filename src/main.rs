//! Bounty scorer CLI entry point.

use clap::Parser;

use bounty_scorer::cli::{self, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = cli::execute(cli).await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
