//! UAD harness CLI
//!
//! Exercises simulated IP block instances through their command-line
//! register protocol and reports CSR, datapath and register behaviour.

use clap::Parser;
use std::path::PathBuf;

use uad::commands::Commands;
use uad::common::config::Config;
use uad::common::logging;
use uad::{cli, Result};

#[derive(Parser)]
#[command(name = "uad", about = "Register protocol test harness for simulated IP blocks")]
#[command(version, long_about = None)]
struct Cli {
    /// Configuration file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init_cli(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli::dispatch(cli.command, config).await
}
