use clap::Parser;
use tropomi_extractor::cli::{run, Cli};
use tropomi_extractor::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
