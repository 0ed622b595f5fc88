//! Settings generation from a roster's point values.
//!
//! Writes a settings file that pits every unit of one point value against
//! every unit of the same value, either from the same roster or from a
//! separate defender roster (e.g. the same units at a better skill).

use std::path::{Path, PathBuf};

use duel_headless::roster::{Roster, RosterError};
use duel_headless::settings::{SettingsError, SimulationSettings};
use thiserror::Error;
use tracing::info;

/// Error type for settings generation.
#[derive(Error, Debug)]
pub enum MakeSettingsError {
    /// Roster could not be loaded.
    #[error(transparent)]
    Roster(#[from] RosterError),
    /// Settings could not be written.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// No unit on one side has the requested point value.
    #[error("No {side} units with {points} points in roster")]
    NoUnits {
        /// `"attacker"` or `"defender"`.
        side: &'static str,
        /// Requested point value.
        points: u32,
    },
}

fn names_worth(
    roster: &Roster,
    points: u32,
    side: &'static str,
) -> Result<Vec<String>, MakeSettingsError> {
    let names: Vec<String> = roster
        .filter_by_points(points)
        .into_iter()
        .map(|unit| unit.name.clone())
        .collect();
    if names.is_empty() {
        return Err(MakeSettingsError::NoUnits { side, points });
    }
    Ok(names)
}

/// Build settings whose attacker list holds every unit in `attackers` worth
/// exactly `points`, and whose defender list does the same for `defenders`
/// (or `attackers` again when there is no defender roster).
///
/// All other fields, including the roster paths, come from `template`.
pub fn settings_for_points(
    attackers: &Roster,
    defenders: Option<&Roster>,
    points: u32,
    template: SimulationSettings,
) -> Result<SimulationSettings, MakeSettingsError> {
    let attacker_names = names_worth(attackers, points, "attacker")?;
    let defender_names = match defenders {
        Some(roster) => names_worth(roster, points, "defender")?,
        None => attacker_names.clone(),
    };

    Ok(SimulationSettings {
        attackers: attacker_names,
        defenders: defender_names,
        ..template
    })
}

fn load_canonical(path: &Path) -> Result<(Roster, PathBuf), MakeSettingsError> {
    let roster = Roster::load(path)?;
    let path = std::fs::canonicalize(path).map_err(RosterError::from)?;
    Ok((roster, path))
}

/// Load the rosters, select units worth `points` and save the settings to
/// `output`.
///
/// Roster paths are stored absolute. Without `defender_roster_path` both
/// sides come from `roster_path`.
pub fn write_settings(
    roster_path: &Path,
    defender_roster_path: Option<&Path>,
    points: u32,
    template: SimulationSettings,
    output: &Path,
) -> Result<SimulationSettings, MakeSettingsError> {
    let (attackers, attacker_roster) = load_canonical(roster_path)?;
    let defenders = defender_roster_path.map(load_canonical).transpose()?;
    let (defenders, defender_roster) = match defenders {
        Some((roster, path)) => (Some(roster), Some(path)),
        None => (None, None),
    };

    let settings = settings_for_points(
        &attackers,
        defenders.as_ref(),
        points,
        SimulationSettings {
            attacker_roster,
            defender_roster,
            ..template
        },
    )?;
    settings.save(output)?;
    info!(
        points = points,
        attackers = settings.attackers.len(),
        defenders = settings.defenders.len(),
        output = %output.display(),
        "Wrote settings"
    );
    Ok(settings)
}
