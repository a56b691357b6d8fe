//! PANEM CLI - Command-line interface
//!
//! Commands:
//! - run: Play a tournament from a setup file
//! - tree: Inspect the elimination tree after admission

mod run_cmd;
mod tree_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "panem")]
#[command(about = "District elimination tournament simulator")]
struct Cli {
    /// Seed for the shared random stream (default 2023)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a tournament to completion
    Run(run_cmd::RunArgs),
    /// Print the elimination tree built from a setup file
    Tree(tree_cmd::TreeArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so reports on stdout stay machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_cmd::run(args, cli.seed),
        Commands::Tree(args) => tree_cmd::run(args),
    }
}
