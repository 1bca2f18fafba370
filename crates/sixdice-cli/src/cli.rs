use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sixdice_server::SimulationConfig;

pub const DEFAULT_LEDGER: &str = "sixdice.ledger";

#[derive(Parser)]
#[command(name = "sixdice", about = "SixDice: bet on six dice against a persistent ledger", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Show the current balance
    Balance(LedgerArgs),
    /// Place a bet and roll six dice
    Roll(RollArgs),
    /// Discard history and restore the initial balance
    Reset(LedgerArgs),
    /// List ledger entries
    History(HistoryArgs),
    /// Estimate return-to-player without touching the ledger
    Simulate(SimulateArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Overrides `bind_addr` from the config
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Overrides `ledger_path` from the config
    #[arg(long)]
    pub ledger: Option<PathBuf>,
}

#[derive(Args)]
pub struct LedgerArgs {
    #[arg(long, default_value = DEFAULT_LEDGER)]
    pub ledger: PathBuf,
}

#[derive(Args)]
pub struct RollArgs {
    pub bet: i64,
    #[command(flatten)]
    pub ledger: LedgerArgs,
    /// Seed the dice for a reproducible roll
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub ledger: LedgerArgs,
    /// Show only the most recent entries
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct SimulateArgs {
    #[arg(short = 'n', long, default_value_t = sixdice_game::DEFAULT_ITERATIONS)]
    pub iterations: i64,
    #[arg(long, default_value_t = sixdice_game::DEFAULT_BET)]
    pub bet: i64,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Reject runs longer than this many rolls
    #[arg(long, default_value_t = SimulationConfig::default().max_iterations)]
    pub max_iterations: u64,
}
