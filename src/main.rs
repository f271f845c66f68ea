//! `tubesnap`: read YouTube resources through a per-owner snapshot cache.

mod cli;
mod commands;
mod logging;

use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    let cli = cli::Cli::parse();
    logging::init(cli.verbose);
    let output = commands::run(&cli).await?;
    println!("{output}");
    Ok(())
}
