//! Duel simulator development tools.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use duel_headless::settings::SimulationSettings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "duel-tools")]
#[command(about = "Development tools for the duel simulator")]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate roster files
    Validate {
        /// Roster file or directory of roster files
        #[arg(default_value = "rosters")]
        path: PathBuf,
    },

    /// Write a settings file pairing every unit of one point value
    MakeSettings {
        /// Roster JSON file (attackers, and defenders unless overridden)
        #[arg(short, long)]
        roster: PathBuf,

        /// Separate roster JSON file for the defenders
        #[arg(long)]
        defender_roster: Option<PathBuf>,

        /// Point value to select
        #[arg(long)]
        pv: u32,

        /// Settings file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Existing settings to copy the remaining fields from
        #[arg(long)]
        template: Option<PathBuf>,

        /// Battles per pairing
        #[arg(short, long)]
        count: Option<u32>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match cli.command {
        Commands::Validate { path } => {
            tracing::info!("Validating rosters in: {}", path.display());
            match duel_tools::validate::validate_path(&path) {
                Ok(reports) => {
                    let mut failed = 0;
                    for report in &reports {
                        if report.is_valid() {
                            tracing::info!("{}: {} units OK", report.path.display(), report.units);
                        } else {
                            failed += report.failures.len();
                            for failure in &report.failures {
                                eprintln!("{}: {}", report.path.display(), failure);
                            }
                        }
                    }
                    if failed > 0 {
                        tracing::error!("Validation failed: {failed} invalid blueprints");
                        std::process::exit(1);
                    }
                    tracing::info!("Validation passed");
                }
                Err(e) => {
                    tracing::error!("Validation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::MakeSettings {
            roster,
            defender_roster,
            pv,
            output,
            template,
            count,
        } => {
            let template = match template {
                Some(path) => match SimulationSettings::load(&path) {
                    Ok(settings) => settings,
                    Err(e) => {
                        tracing::error!("Failed to load template: {e}");
                        std::process::exit(1);
                    }
                },
                None => SimulationSettings::default(),
            };
            let template = SimulationSettings {
                battles_per_pairing: count.unwrap_or(template.battles_per_pairing),
                ..template
            };

            if let Err(e) = duel_tools::make_settings::write_settings(
                &roster,
                defender_roster.as_deref(),
                pv,
                template,
                &output,
            ) {
                tracing::error!("Failed to write settings: {e}");
                std::process::exit(1);
            }
        }
    }
}
