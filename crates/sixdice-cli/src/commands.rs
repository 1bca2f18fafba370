use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use sixdice_game::{GameResult, GameTable, RngDice, RollOutcome, Simulation, SimulationReport};
use sixdice_ledger::{FileLedger, LedgerEntry, SyncMode};
use sixdice_server::{ServerConfig, SixDiceServer};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Balance(args) => cmd_balance(args, format),
        Command::Roll(args) => cmd_roll(args, format),
        Command::Reset(args) => cmd_reset(args, format),
        Command::History(args) => cmd_history(args, format),
        Command::Simulate(args) => cmd_simulate(args, format),
    }
}

/// Open a table over a ledger file. Local play syncs every write.
fn open_table(path: &Path, dice: RngDice) -> anyhow::Result<GameTable> {
    let ledger = FileLedger::open(path, SyncMode::EveryWrite)
        .with_context(|| format!("opening ledger {}", path.display()))?;
    Ok(GameTable::open(ledger, dice)?)
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(ledger) = args.ledger {
        config.ledger_path = Some(ledger);
    }

    println!("SixDice server on {}", config.bind_addr.to_string().bold());
    match &config.ledger_path {
        Some(path) => println!("  Ledger: {}", path.display().to_string().cyan()),
        None => println!("  Ledger: {}", "in memory".yellow()),
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(SixDiceServer::new(config).serve())?;
    Ok(())
}

fn cmd_balance(args: LedgerArgs, format: OutputFormat) -> anyhow::Result<()> {
    let balance = open_table(&args.ledger, RngDice::from_entropy())?.balance()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "balance": balance })),
        OutputFormat::Text => println!("Balance: {}", balance.to_string().bold()),
    }
    Ok(())
}

fn cmd_roll(args: RollArgs, format: OutputFormat) -> anyhow::Result<()> {
    let dice = match args.seed {
        Some(seed) => RngDice::seeded(seed),
        None => RngDice::from_entropy(),
    };
    let outcome = open_table(&args.ledger.ledger, dice)?.roll(args.bet)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Text => print_outcome(args.bet, &outcome),
    }
    Ok(())
}

fn print_outcome(bet: i64, outcome: &RollOutcome) {
    println!("Dice: {}", outcome.dice.to_string().bold());
    match &outcome.combination {
        Some(name) => println!("{} {} wins {}", "✓".green().bold(), name.yellow(), outcome.win.to_string().green()),
        None => println!("{} No combination, lost {}", "✗".red(), bet.to_string().red()),
    }
    println!("Balance: {}", outcome.balance.to_string().bold());
}

fn cmd_reset(args: LedgerArgs, format: OutputFormat) -> anyhow::Result<()> {
    let balance = open_table(&args.ledger, RngDice::from_entropy())?.reset()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "balance": balance })),
        OutputFormat::Text => println!("{} Ledger reset. Balance: {}", "✓".green().bold(), balance.to_string().bold()),
    }
    Ok(())
}

fn cmd_history(args: HistoryArgs, format: OutputFormat) -> anyhow::Result<()> {
    let entries = open_table(&args.ledger.ledger, RngDice::from_entropy())?.history()?;
    let shown = tail(&entries, args.limit);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(shown)?),
        OutputFormat::Text => {
            for entry in shown {
                let value = format!("{:+}", entry.value);
                let value = if entry.value < 0 { value.red() } else { value.green() };
                println!("{:>6}  {:<4}  {}", entry.id.to_string().dimmed(), entry.kind, value);
            }
        }
    }
    Ok(())
}

fn tail(entries: &[LedgerEntry], limit: Option<usize>) -> &[LedgerEntry] {
    match limit {
        Some(n) if n < entries.len() => &entries[entries.len() - n..],
        _ => entries,
    }
}

fn simulate(args: &SimulateArgs) -> GameResult<SimulationReport> {
    let mut simulation =
        Simulation::new(args.iterations, args.bet).with_max_iterations(args.max_iterations);
    if let Some(seed) = args.seed {
        simulation = simulation.with_seed(seed);
    }
    simulation.run()
}

fn cmd_simulate(args: SimulateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let report = simulate(&args)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report),
    }
    Ok(())
}

fn print_report(report: &SimulationReport) {
    println!("Simulated rolls: {}", report.simulated_rolls.to_string().bold());
    println!("  Total bet: {}", report.total_bet);
    println!("  Total win: {}", report.total_win);
    println!("  RTP: {}", report.rtp.yellow().bold());
    for (name, hits) in &report.hits {
        println!("  {:<12} {}", name, hits);
    }
    println!("  Seed: {}", report.seed.to_string().dimmed());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use sixdice_game::GameError;
    use sixdice_ledger::EntryKind;

    #[test]
    fn file_ledger_survives_between_commands() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("play.ledger");

        let outcome = open_table(&path, RngDice::seeded(3)).unwrap().roll(10).unwrap();
        let table = open_table(&path, RngDice::seeded(3)).unwrap();
        assert_eq!(table.balance().unwrap(), outcome.balance);
        assert_eq!(table.history().unwrap()[1].kind, EntryKind::Bet);

        assert_eq!(table.reset().unwrap(), 100);
        drop(table);
        let table = open_table(&path, RngDice::seeded(3)).unwrap();
        assert_eq!(table.history().unwrap().len(), 1);
    }

    #[test]
    fn tail_limits_to_most_recent() {
        let entries: Vec<LedgerEntry> = (1..=4)
            .map(|id| LedgerEntry { id, value: -1, kind: EntryKind::Bet })
            .collect();
        assert_eq!(tail(&entries, Some(2)).iter().map(|e| e.id).collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(tail(&entries, Some(10)).len(), 4);
        assert_eq!(tail(&entries, None).len(), 4);
    }

    #[test]
    fn run_simulate_command() {
        let cli = Cli::try_parse_from(["sixdice", "simulate", "-n", "100", "--seed", "1", "--format", "json"]).unwrap();
        assert!(run_command(cli).is_ok());
    }

    fn simulate_args(argv: &[&str]) -> SimulateArgs {
        let mut full = vec!["sixdice", "simulate"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Simulate(args) => args,
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn simulate_applies_iteration_ceiling() {
        let args = simulate_args(&["-n", "10000001"]);
        assert!(matches!(
            simulate(&args),
            Err(GameError::InvalidIterationCount { .. })
        ));

        let args = simulate_args(&["-n", "600", "--max-iterations", "500"]);
        assert!(simulate(&args).is_err());

        let args = simulate_args(&["-n", "500", "--max-iterations", "500", "--seed", "2"]);
        assert_eq!(simulate(&args).unwrap().simulated_rolls, 500);
    }

    #[test]
    fn run_roll_rejects_bad_bet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ledger");
        let path_arg = path.to_str().unwrap();
        let cli = Cli::try_parse_from(["sixdice", "roll", "0", "--ledger", path_arg]).unwrap();
        assert!(run_command(cli).is_err());
    }
}
