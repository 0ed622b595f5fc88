//! Roster loading and unit selection.
//!
//! A roster is a JSON array of blueprints. Settings files name the units to
//! pit against each other; an empty name list selects the whole roster.

use std::path::Path;

use duel_core::blueprint::Blueprint;
use duel_core::error::ConfigError;
use thiserror::Error;
use tracing::{debug, warn};

/// Error type for roster operations.
#[derive(Error, Debug)]
pub enum RosterError {
    /// File not found.
    #[error("Roster file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read roster file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse JSON.
    #[error("Failed to parse roster: {0}")]
    ParseError(#[from] serde_json::Error),
    /// A requested unit is not in the roster.
    #[error("Unit '{0}' not found in roster")]
    UnknownUnit(String),
}

/// A named collection of blueprints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    units: Vec<Blueprint>,
}

impl Roster {
    /// Create a roster from blueprints.
    #[must_use]
    pub fn new(units: Vec<Blueprint>) -> Self {
        let roster = Self { units };
        roster.warn_duplicates();
        roster
    }

    /// Load a roster from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RosterError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RosterError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let roster = Self::from_json_str(&contents)?;
        debug!(path = %path.display(), units = roster.len(), "Loaded roster");
        Ok(roster)
    }

    /// Parse a roster from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, RosterError> {
        let units: Vec<Blueprint> = serde_json::from_str(json)?;
        Ok(Self::new(units))
    }

    /// Save the roster as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), RosterError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.units)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Number of blueprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// All blueprints in file order.
    #[must_use]
    pub fn units(&self) -> &[Blueprint] {
        &self.units
    }

    /// Look up a blueprint by name. The first entry wins on duplicates.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Blueprint> {
        self.units.iter().find(|unit| unit.name == name)
    }

    /// Blueprints whose point value equals `points`.
    #[must_use]
    pub fn filter_by_points(&self, points: u32) -> Vec<&Blueprint> {
        self.units
            .iter()
            .filter(|unit| unit.points == Some(points))
            .collect()
    }

    /// Resolve a list of names, or the whole roster if `names` is empty.
    pub fn select(&self, names: &[String]) -> Result<Vec<Blueprint>, RosterError> {
        if names.is_empty() {
            return Ok(self.units.clone());
        }
        names
            .iter()
            .map(|name| {
                self.get(name)
                    .cloned()
                    .ok_or_else(|| RosterError::UnknownUnit(name.clone()))
            })
            .collect()
    }

    /// Validate every blueprint, returning the failures.
    #[must_use]
    pub fn validation_errors(&self) -> Vec<ConfigError> {
        self.units
            .iter()
            .filter_map(|unit| unit.validate().err())
            .collect()
    }

    fn warn_duplicates(&self) {
        for (index, unit) in self.units.iter().enumerate() {
            if self.units[..index].iter().any(|other| other.name == unit.name) {
                warn!(name = %unit.name, "Duplicate unit name in roster, first entry is used");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duel_test_utils::fixtures;

    const ROSTER_JSON: &str = r#"[
        {"name": "Catapult CPLT-C1", "type": "Mech", "armor": 5, "structure": 5,
         "damage": [2, 3, 2], "movement": 8, "jump": 8,
         "special": ["IF2", "LRM1/2/2"], "points": 32},
        {"name": "Demolisher", "type": "Vehicle", "motive": "Wheeled", "armor": 6, "structure": 3,
         "damage": [5, 5, 0], "movement": 6, "points": 32},
        {"name": "Locust LCT-1V", "type": "Mech", "armor": 2, "structure": 2,
         "damage": [1, 1, 0], "movement": 16, "points": 18}
    ]"#;

    #[test]
    fn test_from_json() {
        let roster = Roster::from_json_str(ROSTER_JSON).unwrap();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.get("Demolisher").unwrap().armor, 6);
        assert!(roster.get("Atlas").is_none());
        assert!(roster.validation_errors().is_empty());
    }

    #[test]
    fn test_filter_by_points() {
        let roster = Roster::from_json_str(ROSTER_JSON).unwrap();
        let names: Vec<&str> = roster
            .filter_by_points(32)
            .iter()
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(names, vec!["Catapult CPLT-C1", "Demolisher"]);
        assert!(roster.filter_by_points(99).is_empty());
    }

    #[test]
    fn test_select() {
        let roster = Roster::from_json_str(ROSTER_JSON).unwrap();
        assert_eq!(roster.select(&[]).unwrap().len(), 3);

        let picked = roster.select(&["Locust LCT-1V".to_string()]).unwrap();
        assert_eq!(picked[0].movement, Some(16));

        let missing = roster.select(&["Nobody".to_string()]);
        assert!(matches!(missing, Err(RosterError::UnknownUnit(name)) if name == "Nobody"));
    }

    #[test]
    fn test_validation_errors_reported() {
        let json = r#"[{"name": "Legless", "type": "Mech", "damage": [1, 1, 1]}]"#;
        let roster = Roster::from_json_str(json).unwrap();
        assert_eq!(
            roster.validation_errors(),
            vec![ConfigError::MissingMovement("Legless".to_string())]
        );
    }

    #[test]
    fn test_load_missing_file() {
        let result = Roster::load("/definitely/not/here.json");
        assert!(matches!(result, Err(RosterError::FileNotFound(_))));
    }

    #[test]
    fn test_save_load() {
        let roster = Roster::new(fixtures::roster());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rosters").join("units.json");

        roster.save(&path).unwrap();
        let loaded = Roster::load(&path).unwrap();
        assert_eq!(loaded, roster);
    }
}
