mod cmd;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "signals",
    about = "Run traffic light scenarios against a fresh in-memory registry",
    version,
    propagate_version = true
)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a scenario file to a new registry and show each step's result
    Run {
        /// Path to the scenario YAML
        file: PathBuf,
    },

    /// Check a scenario file for steps that are bound to fail
    Validate {
        /// Path to the scenario YAML
        file: PathBuf,
    },

    /// Print the impact analysis report for an impact id
    Analyze { impact_id: String },

    /// Print how a traffic light with the given values describes itself
    Describe {
        signal_id: String,
        #[arg(allow_negative_numbers = true)]
        timing: i64,
        /// Describe the light in its deactivated state
        #[arg(long)]
        inactive: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG, when set, replaces the default level entirely.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Run { file } => cmd::run::run(&file, cli.json),
        Commands::Validate { file } => cmd::validate::run(&file, cli.json),
        Commands::Analyze { impact_id } => cmd::analyze::run(&impact_id, cli.json),
        Commands::Describe {
            signal_id,
            timing,
            inactive,
        } => cmd::describe::run(&signal_id, timing, inactive, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
