//! winget-indexer CLI — inventories in, winget commands out.

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "winget-indexer",
    version,
    about = "Parse installed-application inventories and synthesize reproducible winget commands"
)]
struct Cli {
    #[command(subcommand)]
    command: winget_indexer::cli::Commands,
}

fn main() {
    // Diagnostics go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    if let Err(e) = winget_indexer::cli::dispatch(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
