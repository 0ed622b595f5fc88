//! Error types for blueprint and configuration validation.
//!
//! Combat itself never fails; these errors are raised before a battle starts.

use thiserror::Error;

/// Result type alias using [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration error reported to the caller before any battle begins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Blueprint has no name.
    #[error("Blueprint is missing a name")]
    MissingName,

    /// Blueprint has no weapon damage values.
    #[error("Blueprint '{0}' is missing weapon damage values")]
    MissingWeapons(String),

    /// Blueprint has no movement value.
    #[error("Blueprint '{0}' is missing a movement value")]
    MissingMovement(String),

    /// Battle configuration value out of range.
    #[error("Invalid battle configuration: {field} = {value} ({reason})")]
    InvalidBattleConfig {
        /// Offending field.
        field: &'static str,
        /// Value supplied.
        value: u32,
        /// What the value must satisfy.
        reason: &'static str,
    },
}
