use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = washbook::cli::Cli::parse();
    washbook::cli::run(args).await
}
