//! Batch duel runner for Monte Carlo estimates.
//!
//! Runs every attacker against every defender many times in parallel
//! using rayon. Battle `i` of a pairing always uses seed
//! `seed_start + i`, so results do not depend on the thread count.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use duel_core::battle::{run_battle, BattleConfig, BattleOutcome};
use duel_core::blueprint::{Blueprint, UnitProfile};
use duel_core::dice::SeededDice;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::metrics::{BatchSummary, PairingSummary, CSV_HEADER};

/// Configuration for a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Rules configuration for every battle
    pub battle: BattleConfig,
    /// Battles per pairing
    pub battles_per_pairing: u32,
    /// Starting seed for deterministic runs
    pub seed_start: u64,
    /// Worker threads (0 = use rayon default)
    pub parallel: u32,
    /// Units fighting as the first side
    pub attackers: Vec<Blueprint>,
    /// Units fighting as the second side
    pub defenders: Vec<Blueprint>,
    /// Output directory for results
    pub output_dir: PathBuf,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            battle: BattleConfig::default(),
            battles_per_pairing: 1000,
            seed_start: 0,
            parallel: 0,
            attackers: Vec::new(),
            defenders: Vec::new(),
            output_dir: PathBuf::from("results"),
        }
    }
}

impl BatchConfig {
    /// Create config for the given sides
    pub fn new(
        attackers: Vec<Blueprint>,
        defenders: Vec<Blueprint>,
        battles_per_pairing: u32,
    ) -> Self {
        Self {
            attackers,
            defenders,
            battles_per_pairing,
            ..Default::default()
        }
    }

    /// Set rules configuration
    pub fn with_battle(mut self, battle: BattleConfig) -> Self {
        self.battle = battle;
        self
    }

    /// Set output directory
    pub fn with_output(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    /// Set seed start
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed_start = seed;
        self
    }

    /// Set worker thread count
    pub fn with_parallel(mut self, threads: u32) -> Self {
        self.parallel = threads;
        self
    }

    /// Number of attacker/defender pairings
    pub fn pairing_count(&self) -> usize {
        self.attackers.len() * self.defenders.len()
    }
}

/// Results from a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResults {
    /// Configuration used
    pub config: BatchConfig,
    /// One summary per successfully simulated pairing
    pub pairings: Vec<PairingSummary>,
    /// Aggregate summary
    pub summary: BatchSummary,
    /// Total runtime
    pub duration_seconds: f64,
    /// Pairings that could not be simulated
    pub errors: Vec<BatchError>,
}

impl BatchResults {
    /// Save results to JSON file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Load results from JSON file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(std::io::Error::other)
    }

    /// Pairing table as CSV, one row per pairing
    pub fn to_csv(&self) -> String {
        let mut csv = String::from(CSV_HEADER);
        csv.push('\n');
        for pairing in &self.pairings {
            csv.push_str(&pairing.to_csv_row());
            csv.push('\n');
        }
        csv
    }

    /// Save the pairing table as CSV
    pub fn save_csv(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_csv())
    }

    /// Summary for a pairing, if it was simulated
    pub fn pairing(&self, attacker: &str, defender: &str) -> Option<&PairingSummary> {
        self.pairings
            .iter()
            .find(|p| p.attacker == attacker && p.defender == defender)
    }
}

/// Pairing that could not be simulated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchError {
    /// Attacker name
    pub attacker: String,
    /// Defender name
    pub defender: String,
    /// Error message
    pub message: String,
}

/// Progress tracking for batch runs
#[derive(Debug)]
pub struct BatchProgress {
    /// Total battles
    pub total: u64,
    /// Completed battles
    completed: AtomicU64,
    start_time: Instant,
}

impl BatchProgress {
    /// Create new progress tracker
    pub fn new(total: u64) -> Self {
        Self {
            total,
            completed: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record completed battles
    pub fn record(&self, battles: u64) {
        self.completed.fetch_add(battles, Ordering::Relaxed);
    }

    /// Get current completion count
    pub fn current(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Get completion percentage
    pub fn percentage(&self) -> f64 {
        self.current() as f64 / self.total.max(1) as f64 * 100.0
    }

    /// Get estimated time remaining
    pub fn eta(&self) -> Duration {
        let completed = self.current();
        if completed == 0 {
            return Duration::from_secs(0);
        }

        let elapsed = self.start_time.elapsed();
        let per_battle = elapsed.as_secs_f64() / completed as f64;
        let remaining = self.total.saturating_sub(completed);
        Duration::from_secs_f64(per_battle * remaining as f64)
    }
}

/// Run every battle of one pairing in parallel
pub fn run_pairing(
    attacker: &UnitProfile,
    defender: &UnitProfile,
    battle: &BattleConfig,
    battles: u32,
    seed_start: u64,
) -> Vec<BattleOutcome> {
    (0..battles)
        .into_par_iter()
        .map(|i| {
            let seed = seed_start.wrapping_add(u64::from(i));
            let mut dice = SeededDice::new(seed);
            run_battle(attacker, defender, battle, &mut dice)
        })
        .collect()
}

fn validate_pair(
    attacker: &Blueprint,
    defender: &Blueprint,
) -> Result<(UnitProfile, UnitProfile), BatchError> {
    let to_error = |e: duel_core::error::ConfigError| BatchError {
        attacker: attacker.name.clone(),
        defender: defender.name.clone(),
        message: e.to_string(),
    };
    let first = attacker.validate().map_err(to_error)?;
    let second = defender.validate().map_err(to_error)?;
    Ok((first, second))
}

fn run_pairings(
    config: &BatchConfig,
    progress: &BatchProgress,
) -> (Vec<PairingSummary>, Vec<BatchError>) {
    let mut pairings = Vec::with_capacity(config.pairing_count());
    let mut errors = Vec::new();

    for attacker in &config.attackers {
        for defender in &config.defenders {
            let (first, second) = match validate_pair(attacker, defender) {
                Ok(profiles) => profiles,
                Err(e) => {
                    warn!("Pairing {} vs {} skipped: {}", e.attacker, e.defender, e.message);
                    errors.push(e);
                    continue;
                }
            };

            let outcomes = run_pairing(
                &first,
                &second,
                &config.battle,
                config.battles_per_pairing,
                config.seed_start,
            );
            let summary = PairingSummary::from_outcomes(first.name(), second.name(), &outcomes);
            progress.record(u64::from(config.battles_per_pairing));
            debug!(
                "{} vs {}: {:.1}% / {:.1}% ({:.1}% done, ~{}s left)",
                summary.attacker,
                summary.defender,
                summary.attacker_win_rate() * 100.0,
                summary.defender_win_rate() * 100.0,
                progress.percentage(),
                progress.eta().as_secs()
            );
            pairings.push(summary);
        }
    }
    (pairings, errors)
}

/// Run a batch of duels
pub fn run_batch(config: &BatchConfig) -> BatchResults {
    let start = Instant::now();
    let total = config.pairing_count() as u64 * u64::from(config.battles_per_pairing);
    let progress = BatchProgress::new(total);

    info!(
        "Starting batch run: {} pairings x {} battles",
        config.pairing_count(),
        config.battles_per_pairing
    );

    // Dedicated pool so repeated batches can use different thread counts
    let pool = if config.parallel > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.parallel as usize)
            .build()
            .map_err(|e| warn!("Failed to build thread pool: {}, using default", e))
            .ok()
    } else {
        None
    };

    let (pairings, errors) = match &pool {
        Some(pool) => pool.install(|| run_pairings(config, &progress)),
        None => run_pairings(config, &progress),
    };

    let summary = BatchSummary::from_pairings(&pairings);
    let duration_seconds = start.elapsed().as_secs_f64();

    info!(
        "Batch complete: {} battles in {:.1}s ({:.1} battles/sec)",
        summary.total_battles,
        duration_seconds,
        summary.total_battles as f64 / duration_seconds.max(f64::EPSILON)
    );

    BatchResults {
        config: config.clone(),
        pairings,
        summary,
        duration_seconds,
        errors,
    }
}

/// Verify determinism by running the same seed multiple times
pub fn verify_determinism(
    attacker: &UnitProfile,
    defender: &UnitProfile,
    battle: &BattleConfig,
    seed: u64,
    runs: u32,
) -> bool {
    let outcomes: Vec<BattleOutcome> = (0..runs)
        .into_par_iter()
        .map(|_| run_battle(attacker, defender, battle, &mut SeededDice::new(seed)))
        .collect();

    // All runs should have same outcome
    outcomes.windows(2).all(|w| w[0] == w[1])
}
