//! Simulation settings loading.
//!
//! Settings are stored as RON and name the rosters, the units to pair up,
//! the rules configuration and the batch size.
//!
//! # Example
//!
//! ```ron
//! (
//!     battle: (
//!         max_tolerable_heat: 3,
//!         range_mode: "fast_approach",
//!         woods_percent: (20, 30, 40),
//!         cover_percent: (10, 10, 10),
//!         round_cap: 100,
//!     ),
//!     battles_per_pairing: 1000,
//!     seed_start: 0,
//!     attacker_roster: "rosters/mechs.json",
//!     attackers: ["Catapult CPLT-C1"],
//!     defenders: [],
//! )
//! ```

use std::path::{Path, PathBuf};

use duel_core::battle::BattleConfig;
use duel_core::error::ConfigError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::batch::BatchConfig;
use crate::roster::{Roster, RosterError};

/// Error type for settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// File not found.
    #[error("Settings file not found: {0}")]
    FileNotFound(String),
    /// Failed to read or write file.
    #[error("Failed to access settings file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse settings: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// Failed to serialize RON.
    #[error("Failed to serialize settings: {0}")]
    SerializeError(#[from] ron::Error),
    /// Settings values out of range.
    #[error("Invalid settings: {0}")]
    Invalid(#[from] ConfigError),
    /// A roster could not be loaded or a unit was missing.
    #[error(transparent)]
    Roster(#[from] RosterError),
}

/// Complete settings for a simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Rules configuration.
    pub battle: BattleConfig,
    /// Battles per attacker/defender pairing.
    pub battles_per_pairing: u32,
    /// Seed of the first battle in each pairing.
    pub seed_start: u64,
    /// Worker threads (0 = rayon default).
    pub parallel: u32,
    /// Roster the attackers come from.
    pub attacker_roster: PathBuf,
    /// Roster the defenders come from (defaults to the attacker roster).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defender_roster: Option<PathBuf>,
    /// Attacker names (empty = whole roster).
    pub attackers: Vec<String>,
    /// Defender names (empty = whole roster).
    pub defenders: Vec<String>,
    /// Directory results are written to.
    pub output_dir: PathBuf,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            battle: BattleConfig::default(),
            battles_per_pairing: 1000,
            seed_start: 0,
            parallel: 0,
            attacker_roster: PathBuf::from("roster.json"),
            defender_roster: None,
            attackers: Vec::new(),
            defenders: Vec::new(),
            output_dir: PathBuf::from("results"),
        }
    }
}

impl SimulationSettings {
    /// Load settings from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self, SettingsError> {
        let settings: SimulationSettings = ron::from_str(ron)?;
        Ok(settings)
    }

    /// Serialize to pretty RON.
    pub fn to_ron_string(&self) -> Result<String, SettingsError> {
        let ron = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        Ok(ron)
    }

    /// Save settings as a RON file.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.battle.validate()?;
        if self.battles_per_pairing == 0 {
            return Err(ConfigError::InvalidBattleConfig {
                field: "battles_per_pairing",
                value: 0,
                reason: "must be at least 1",
            }
            .into());
        }
        Ok(())
    }

    /// Resolve relative roster paths against `base`.
    #[must_use]
    pub fn relative_to(mut self, base: &Path) -> Self {
        if self.attacker_roster.is_relative() {
            self.attacker_roster = base.join(&self.attacker_roster);
        }
        if let Some(defenders) = &self.defender_roster {
            if defenders.is_relative() {
                self.defender_roster = Some(base.join(defenders));
            }
        }
        self
    }

    /// Load the rosters and build the batch this file describes.
    pub fn batch_config(&self) -> Result<BatchConfig, SettingsError> {
        self.validate()?;

        let attacker_roster = Roster::load(&self.attacker_roster)?;
        let defender_roster = match &self.defender_roster {
            Some(path) => Roster::load(path)?,
            None => attacker_roster.clone(),
        };
        let attackers = attacker_roster.select(&self.attackers)?;
        let defenders = defender_roster.select(&self.defenders)?;
        info!(
            attackers = attackers.len(),
            defenders = defenders.len(),
            battles = self.battles_per_pairing,
            "Resolved batch from settings"
        );

        Ok(BatchConfig {
            battle: self.battle,
            battles_per_pairing: self.battles_per_pairing,
            seed_start: self.seed_start,
            parallel: self.parallel,
            attackers,
            defenders,
            output_dir: self.output_dir.clone(),
        })
    }
}
