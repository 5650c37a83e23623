//! docplace CLI - documentation page placement.
//!
//! Provides commands for:
//! - `add`: Place a new documentation page into the menu, catalog, and views
//! - `list`: Show the flattened menu leaves with their ancestor paths

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AddArgs, ListArgs};
use output::Output;

/// docplace - documentation page placement.
#[derive(Parser)]
#[command(name = "docplace", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place a new documentation page after a chosen anchor.
    Add(AddArgs),
    /// List the menu's documentation pages in placement order.
    List(ListArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Add(args) => args.verbose,
        Commands::List(args) => args.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Add(args) => args.execute(),
        Commands::List(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
