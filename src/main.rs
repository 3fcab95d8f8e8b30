use clap::Parser;
use clipvault_lib::bootstrap;
use clipvault_lib::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    bootstrap::run_cli(cli).await
}
