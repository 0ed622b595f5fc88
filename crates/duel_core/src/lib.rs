//! # Duel Core
//!
//! Round-based combat resolution between two abstracted tabletop units.
//!
//! This crate contains **only** the combat rules:
//! - No IO (blueprints arrive already parsed)
//! - No ambient configuration (every battle receives a [`battle::BattleConfig`])
//! - No system randomness (every roll goes through a [`dice::Dice`])
//!
//! This separation enables:
//! - Reproducible battles from a seed
//! - Parallel Monte Carlo batches without shared state
//! - Scripted-roll tests of individual rules
//!
//! ## Crate Structure
//!
//! - [`blueprint`] - Immutable unit definitions and validation
//! - [`specials`] - Typed special-ability set parsed from tokens
//! - [`unit`] - Per-battle mutable unit state
//! - [`damage`] - Damage mitigation, armor/structure application, motive checks
//! - [`crits`] - Critical-hit effect tables
//! - [`modifiers`] - To-hit modifier engine
//! - [`range`] - Range band selection strategies
//! - [`battle`] - Round engine and battle loop
//! - [`dice`] - Die rollers
//! - [`math`] - Fixed-point hit probabilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod battle;
pub mod blueprint;
pub mod crits;
pub mod damage;
pub mod dice;
pub mod error;
pub mod math;
pub mod modifiers;
pub mod range;
pub mod specials;
pub mod unit;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::battle::{
        run_battle, Battle, BattleConfig, BattleOutcome, BattleState, Side, Winner,
    };
    pub use crate::blueprint::{Blueprint, ByBand, MotiveType, RangeBand, UnitProfile, UnitType};
    pub use crate::crits::CritEffect;
    pub use crate::damage::DamageReport;
    pub use crate::dice::{Dice, ScriptedDice, SeededDice};
    pub use crate::error::{ConfigError, Result};
    pub use crate::math::Fixed;
    pub use crate::range::RangeMode;
    pub use crate::specials::{Special, SpecialSet};
    pub use crate::unit::{CombatUnit, CritFlag};
}
