//! Headless duel runner.
//!
//! # Usage
//!
//! ```bash
//! # One pairing, 1000 battles
//! cargo run -p duel_headless -- run --roster units.json "Atlas AS7-D" "Demolisher"
//!
//! # Every pairing named in a settings file
//! cargo run -p duel_headless -- batch --settings sims/pv32.ron --count 5000
//!
//! # Verify determinism
//! cargo run -p duel_headless -- verify --roster units.json "Atlas AS7-D" "Demolisher"
//! ```
//!
//! Logs go to stderr. Set `RUST_LOG` to override the level.

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use duel_core::battle::BattleConfig;
use duel_core::blueprint::UnitProfile;
use duel_core::range::RangeMode;
use duel_headless::{
    batch::{run_batch, run_pairing, verify_determinism},
    metrics::PairingSummary,
    roster::{Roster, RosterError},
    settings::SimulationSettings,
    BatchResults,
};

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "duel_headless")]
#[command(about = "Monte Carlo duel simulator for tabletop combat units")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run battles between two roster units
    Run {
        /// Roster JSON file
        #[arg(short, long)]
        roster: PathBuf,

        /// First unit (attacker)
        attacker: String,

        /// Second unit (defender)
        defender: String,

        /// Number of battles
        #[arg(short, long, default_value = "1000")]
        count: u32,

        /// Starting random seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Range mode (short, medium, long, random, fast_approach, min_damage)
        #[arg(long)]
        range_mode: Option<String>,

        /// Maximum rounds per battle
        #[arg(long)]
        round_cap: Option<u32>,
    },

    /// Run every pairing named in a settings file
    Batch {
        /// Settings RON file
        #[arg(short, long)]
        settings: PathBuf,

        /// Battles per pairing
        #[arg(short, long)]
        count: Option<u32>,

        /// Starting random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Worker threads (0 = auto)
        #[arg(short, long)]
        parallel: Option<u32>,

        /// Output directory for results
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Range mode override
        #[arg(long)]
        range_mode: Option<String>,
    },

    /// Verify determinism by running same seed multiple times
    Verify {
        /// Roster JSON file
        #[arg(short, long)]
        roster: PathBuf,

        /// First unit (attacker)
        attacker: String,

        /// Second unit (defender)
        defender: String,

        /// Seed to verify
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Number of verification runs
        #[arg(short, long, default_value = "5")]
        runs: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(filter)
        .init();

    let result = match cli.command {
        Commands::Run {
            roster,
            attacker,
            defender,
            count,
            seed,
            range_mode,
            round_cap,
        } => cmd_run(&roster, &attacker, &defender, count, seed, range_mode, round_cap),
        Commands::Batch {
            settings,
            count,
            seed,
            parallel,
            output,
            range_mode,
        } => cmd_batch(&settings, count, seed, parallel, output, range_mode),
        Commands::Verify {
            roster,
            attacker,
            defender,
            seed,
            runs,
        } => cmd_verify(&roster, &attacker, &defender, seed, runs),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Command failed");
        eprintln!("FATAL: {}", e);
        std::process::exit(1);
    }
}

/// Validated profiles for two roster units
fn load_pair(
    roster: &Path,
    attacker: &str,
    defender: &str,
) -> Result<(UnitProfile, UnitProfile), Box<dyn Error>> {
    let roster = Roster::load(roster)?;
    let lookup = |name: &str| {
        roster
            .get(name)
            .ok_or_else(|| RosterError::UnknownUnit(name.to_string()))
    };
    let first = lookup(attacker)?.validate()?;
    let second = lookup(defender)?.validate()?;
    Ok((first, second))
}

/// Run battles for a single pairing and print the tally
fn cmd_run(
    roster: &Path,
    attacker: &str,
    defender: &str,
    count: u32,
    seed: u64,
    range_mode: Option<String>,
    round_cap: Option<u32>,
) -> CliResult {
    let (first, second) = load_pair(roster, attacker, defender)?;

    let mut battle = BattleConfig::default();
    if let Some(mode) = range_mode {
        battle = battle.with_range_mode(RangeMode::from_name(&mode));
    }
    if let Some(cap) = round_cap {
        battle = battle.with_round_cap(cap);
    }
    battle.validate()?;

    tracing::info!(
        attacker = first.name(),
        defender = second.name(),
        count = count,
        seed = seed,
        range_mode = %battle.range_mode,
        "Running pairing"
    );

    let outcomes = run_pairing(&first, &second, &battle, count, seed);
    let summary = PairingSummary::from_outcomes(first.name(), second.name(), &outcomes);
    print_pairing(&summary);
    Ok(())
}

/// Run every pairing from a settings file and write JSON and CSV results
fn cmd_batch(
    settings_path: &Path,
    count: Option<u32>,
    seed: Option<u64>,
    parallel: Option<u32>,
    output: Option<PathBuf>,
    range_mode: Option<String>,
) -> CliResult {
    let base = settings_path.parent().unwrap_or_else(|| Path::new("."));
    let mut settings = SimulationSettings::load(settings_path)?.relative_to(base);

    if let Some(count) = count {
        settings.battles_per_pairing = count;
    }
    if let Some(seed) = seed {
        settings.seed_start = seed;
    }
    if let Some(parallel) = parallel {
        settings.parallel = parallel;
    }
    if let Some(output) = output {
        settings.output_dir = output;
    }
    if let Some(mode) = range_mode {
        settings.battle.range_mode = RangeMode::from_name(&mode);
    }

    let config = settings.batch_config()?;
    std::fs::create_dir_all(&config.output_dir)?;

    tracing::info!(
        pairings = config.pairing_count(),
        battles = config.battles_per_pairing,
        seed = config.seed_start,
        parallel = config.parallel,
        output = %config.output_dir.display(),
        "Batch configuration"
    );

    let results = run_batch(&config);

    let json_path = config.output_dir.join("batch_results.json");
    results.save(&json_path)?;
    let csv_path = config.output_dir.join("batch_results.csv");
    results.save_csv(&csv_path)?;

    print_batch(&results);
    eprintln!("Results saved to: {}", json_path.display());
    eprintln!("CSV saved to: {}", csv_path.display());
    Ok(())
}

/// Verify that a seed always produces the same outcome
fn cmd_verify(roster: &Path, attacker: &str, defender: &str, seed: u64, runs: u32) -> CliResult {
    let (first, second) = load_pair(roster, attacker, defender)?;
    tracing::info!(
        "Verifying determinism: {} vs {} with seed {} ({} runs)",
        first.name(),
        second.name(),
        seed,
        runs
    );

    if verify_determinism(&first, &second, &BattleConfig::default(), seed, runs) {
        eprintln!("PASS: All {} runs produced identical results", runs);
        Ok(())
    } else {
        Err("non-determinism detected".into())
    }
}

fn print_pairing(summary: &PairingSummary) {
    eprintln!("\n{}", "=".repeat(50));
    eprintln!("{} vs {}", summary.attacker, summary.defender);
    eprintln!("{}", "=".repeat(50));
    eprintln!("Battles:       {}", summary.battles);
    eprintln!(
        "{:<14} {} ({:.1}%)",
        "Attacker wins:",
        summary.attacker_wins,
        summary.attacker_win_rate() * 100.0
    );
    eprintln!(
        "{:<14} {} ({:.1}%)",
        "Defender wins:",
        summary.defender_wins,
        summary.defender_win_rate() * 100.0
    );
    eprintln!(
        "{:<14} {} ({} timeouts, {} mutual kills)",
        "Ties:", summary.ties, summary.timeouts, summary.mutual_kills
    );
    eprintln!(
        "Rounds:        avg {:.2}, min {}, max {}",
        summary.avg_rounds, summary.min_rounds, summary.max_rounds
    );
}

fn print_batch(results: &BatchResults) {
    let summary = &results.summary;
    eprintln!("\n{}", "=".repeat(50));
    eprintln!("BATCH COMPLETE");
    eprintln!("{}", "=".repeat(50));
    eprintln!("Pairings:      {}", summary.pairings);
    eprintln!("Battles:       {}", summary.total_battles);
    eprintln!(
        "Attacker wins: {:.1}%",
        summary.attacker_win_rate() * 100.0
    );
    eprintln!("Ties:          {} ({} timeouts)", summary.ties, summary.timeouts);
    eprintln!("Avg rounds:    {:.2}", summary.avg_rounds);
    eprintln!("Duration:      {:.1}s", results.duration_seconds);
    if !results.errors.is_empty() {
        eprintln!("Skipped pairings: {}", results.errors.len());
        for error in &results.errors {
            eprintln!("  {} vs {}: {}", error.attacker, error.defender, error.message);
        }
    }
}
