//! Roster validation.

use std::path::{Path, PathBuf};

use duel_core::error::ConfigError;
use duel_headless::roster::{Roster, RosterError};
use tracing::{debug, warn};

/// Validation outcome for one roster file.
#[derive(Debug)]
pub struct RosterReport {
    /// File that was checked.
    pub path: PathBuf,
    /// Blueprints in the file.
    pub units: usize,
    /// Blueprints that failed validation.
    pub failures: Vec<ConfigError>,
}

impl RosterReport {
    /// Whether every blueprint validated.
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Validate every blueprint in a roster file.
pub fn validate_roster(path: &Path) -> Result<RosterReport, RosterError> {
    let roster = Roster::load(path)?;
    let failures = roster.validation_errors();
    for failure in &failures {
        warn!(path = %path.display(), "{failure}");
    }
    Ok(RosterReport {
        path: path.to_path_buf(),
        units: roster.len(),
        failures,
    })
}

/// Validate a roster file, or every `.json` file in a directory.
///
/// # Errors
///
/// Returns the first roster that cannot be read or parsed.
pub fn validate_path(path: &Path) -> Result<Vec<RosterReport>, RosterError> {
    if !path.is_dir() {
        return Ok(vec![validate_roster(path)?]);
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(path)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    debug!(dir = %path.display(), files = files.len(), "Validating roster directory");

    files.iter().map(|file| validate_roster(file)).collect()
}
