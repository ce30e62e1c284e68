//! Decree CLI - drives a file-backed governance ledger.
//!
//! ```text
//! decree init                       # empty ledger
//! decree seed world.json            # vaults, documents, capabilities
//! decree propose proposal.json      # create + register intents
//! decree resolve 1 --winner 1 --twap 100,150
//! decree dispatch 1
//! ```
//!
//! Every command loads the ledger snapshot, applies one engine operation and
//! writes the snapshot back atomically only when the operation succeeded.

mod commands;
mod store;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use decree_config::DecreeConfig;
use decree_engine::EngineLimits;

#[derive(Parser)]
#[command(name = "decree")]
#[command(about = "Outcome-conditional governance execution engine")]
struct Cli {
    /// Ledger snapshot file (default: config `ledger.path`, else ~/.decree/ledger.json)
    #[arg(long, global = true)]
    ledger: Option<PathBuf>,

    /// Config file (default: ~/.decree/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an empty ledger
    Init {
        /// Overwrite an existing ledger
        #[arg(long)]
        force: bool,
    },
    /// Replace the resource state of a ledger that has no proposals yet
    Seed { world: PathBuf },
    /// Create a proposal and register one intent per outcome
    Propose { proposal: PathBuf },
    /// Record the market resolution of a proposal
    Resolve {
        id: u64,
        /// Winning outcome index (0 = reject)
        #[arg(long)]
        winner: u32,
        /// Per-outcome TWAPs, outcome 0 first
        #[arg(long, value_delimiter = ',', required = true)]
        twap: Vec<u64>,
        /// Record a provisional, not yet finalized, resolution
        #[arg(long)]
        pending: bool,
    },
    /// Execute the winning outcome of a resolved proposal
    Dispatch { id: u64 },
    /// Print a proposal's state and its described intents
    Show { id: u64 },
    /// Print the event log as JSON lines
    Events,
}

fn init_tracing(config: &DecreeConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log.filter.as_deref().unwrap_or("warn")))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn load_config(explicit: Option<&PathBuf>) -> Result<DecreeConfig> {
    let config = match explicit {
        Some(path) => Some(DecreeConfig::load_from(path)?),
        None => DecreeConfig::load()?,
    };
    Ok(config.unwrap_or_default())
}

fn run(cli: Cli, config: &DecreeConfig) -> Result<String> {
    let ledger = cli
        .ledger
        .or_else(|| config.ledger_path())
        .context("cannot determine the ledger path; pass --ledger")?;
    let limits = EngineLimits {
        max_outcomes: config.engine.max_outcomes,
        max_actions_per_intent: config.engine.max_actions_per_intent,
    };

    match cli.command {
        Commands::Init { force } => commands::init(&ledger, limits, force),
        Commands::Seed { world } => commands::seed(&ledger, limits, &world),
        Commands::Propose { proposal } => commands::propose(&ledger, limits, &proposal),
        Commands::Resolve {
            id,
            winner,
            twap,
            pending,
        } => commands::resolve(&ledger, limits, id, winner, twap, pending),
        Commands::Dispatch { id } => commands::dispatch(&ledger, limits, id),
        Commands::Show { id } => commands::show(&ledger, limits, id),
        Commands::Events => commands::events(&ledger, limits),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config);

    match run(cli, &config) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::debug!(error = ?err, "Command failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
