//! Singlish E2E - Main Entry Point
//!
//! Runs the declarative transliteration cases against the target page and
//! exits 0 when every case passed, 1 when any failed and 2 when the run
//! could not start.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod output;

use commands::{check, list, run, script};

/// Singlish E2E - Playwright case runner for swifttranslator.com
#[derive(Parser)]
#[command(name = "singlish-e2e")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Runner configuration file (TOML); missing file means defaults
    #[arg(long, default_value = "singlish-e2e.toml", global = true)]
    config: PathBuf,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the selected cases
    Run(run::RunArgs),

    /// List the selected cases without running them
    List(list::ListArgs),

    /// Print the generated Playwright script for one case
    Script(script::ScriptArgs),

    /// Check node, Playwright and target reachability
    Check(check::CheckArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Run(args) => run::execute(args, &cli.config, cli.format).await,
        Commands::List(args) => list::execute(args, &cli.config, cli.format).map(|_| 0),
        Commands::Script(args) => script::execute(args, &cli.config).map(|_| 0),
        Commands::Check(args) => check::execute(args, &cli.config).await.map(|_| 0),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            std::process::exit(2);
        }
    }
}
