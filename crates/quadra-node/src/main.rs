//! Quadra Node - Host binary for the governance engine.
//!
//! Loads configuration, opens the persistent ledger, applies batches of signed
//! transactions and prints governance records.

pub mod config;
pub mod node;
pub mod telemetry;

use clap::{Parser, Subcommand};
use quadra_types::Pubkey;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "quadra-node")]
#[command(about = "Quadra Node - quadratic voting governance")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Config file path
    #[arg(short, long, value_name = "FILE", env = "QUADRA_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Token account snapshot (JSON)
    #[arg(long, value_name = "FILE")]
    tokens: Option<PathBuf>,

    /// Log level
    #[arg(short, long)]
    log_level: Option<String>,

    /// Emit JSON logs
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default configuration file
    InitConfig {
        #[arg(value_name = "FILE", default_value = "quadra.toml")]
        path: PathBuf,
    },
    /// Apply a JSON array of signed transactions
    Apply {
        #[arg(value_name = "FILE")]
        transactions: PathBuf,
    },
    /// Show the DAO an authority created under a name
    ShowDao {
        #[arg(long)]
        authority: Pubkey,
        #[arg(long)]
        name: String,
    },
    /// Show a proposal by DAO and index
    ShowProposal {
        #[arg(long)]
        dao: Pubkey,
        #[arg(long)]
        index: u64,
    },
    /// Show a voter's ballot on a proposal
    ShowVote {
        #[arg(long)]
        proposal: Pubkey,
        #[arg(long)]
        voter: Pubkey,
    },
    /// Sum the credits cast on each side of a proposal
    Tally {
        #[arg(long)]
        proposal: Pubkey,
    },
}

#[derive(Serialize)]
struct Lookup<T> {
    address: Pubkey,
    record: Option<T>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => config::NodeConfig::from_file(path)?,
        None => config::NodeConfig::default(),
    };

    // Override with CLI args
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(tokens) = args.tokens {
        config.tokens_file = Some(tokens);
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }

    match &config.logging.log_file {
        Some(file) => telemetry::init_telemetry_with_file(&config.logging.level, config.logging.is_json(), file)?,
        None => telemetry::init_telemetry(&config.logging.level, config.logging.is_json())?,
    }

    if let Err(e) = run(args.command, config) {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

fn run(command: Command, config: config::NodeConfig) -> anyhow::Result<()> {
    if let Command::InitConfig { path } = &command {
        config.validate()?;
        config.to_file(path)?;
        info!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    info!("Configuration:");
    info!("  Name: {}", config.name);
    info!("  Data dir: {:?}", config.data_dir);
    info!("  Program id: {}", config.governance.program_id);

    let node = node::QuadraNode::open(config)?;
    match command {
        Command::InitConfig { .. } => Ok(()),
        Command::Apply { transactions } => {
            let report = node.apply_file(&transactions)?;
            print_json(&report)
        }
        Command::ShowDao { authority, name } => {
            let (address, record) = node.dao(&authority, &name)?;
            print_json(&Lookup { address, record })
        }
        Command::ShowProposal { dao, index } => {
            let (address, record) = node.proposal(&dao, index)?;
            print_json(&Lookup { address, record })
        }
        Command::ShowVote { proposal, voter } => {
            let (address, record) = node.vote(&proposal, &voter)?;
            print_json(&Lookup { address, record })
        }
        Command::Tally { proposal } => print_json(&node.tally(&proposal)?),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
