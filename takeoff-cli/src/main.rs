//! takeoff CLI: generate, stream and embed against a Titan Takeoff server.
//! Config from env (.env loaded first) with CLI flags taking precedence.

use anyhow::Result;
use clap::Parser;
use takeoff_cli::{cli, init_tracing, run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli::log_file(&cli))?;

    run(cli).await
}
